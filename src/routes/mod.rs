pub mod alerts;
pub mod forecast;
pub mod health;

use axum::{routing::get, Router};

use crate::services::weather::WeatherService;

/// Shared application state for the HTTP endpoints.
#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) weather: WeatherService,
}

/// Routes of the plain HTTP variant.
pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::health_check))
        .route("/alerts/:region", get(alerts::get_alerts))
        .route("/forecast", get(forecast::get_forecast))
        .with_state(state)
}
