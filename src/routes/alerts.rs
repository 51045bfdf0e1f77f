//! GET /alerts/:region: active NWS alerts for a region code.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::errors::{AppError, ErrorResponse};
use crate::routes::AppState;
use crate::services::weather::{Alert, AlertsOutcome};

/// Alerts are active for the region.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActiveAlerts {
    /// Uppercased region code (e.g. "CA")
    pub state: String,
    /// Alerts in NWS order
    pub alerts: Vec<Alert>,
}

/// No alerts are active for the region.
#[derive(Debug, Serialize, ToSchema)]
pub struct NoActiveAlerts {
    /// e.g. "No active alerts for CA"
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum AlertsResponse {
    Active(ActiveAlerts),
    NoneActive(NoActiveAlerts),
}

impl From<AlertsOutcome> for AlertsResponse {
    fn from(outcome: AlertsOutcome) -> Self {
        match outcome {
            AlertsOutcome::Active { region, alerts } => AlertsResponse::Active(ActiveAlerts {
                state: region,
                alerts,
            }),
            AlertsOutcome::NoneActive { region } => AlertsResponse::NoneActive(NoActiveAlerts {
                message: format!("No active alerts for {}", region),
            }),
        }
    }
}

/// Get active weather alerts for a region.
///
/// The region code is case-insensitive and is uppercased before querying NWS.
#[utoipa::path(
    get,
    path = "/alerts/{region}",
    tag = "Alerts",
    params(
        ("region" = String, Path, description = "Region code, e.g. a US state (case-insensitive)"),
    ),
    responses(
        (status = 200, description = "Active alerts, or a message when there are none", body = AlertsResponse),
        (status = 500, description = "NWS request failed", body = ErrorResponse),
    )
)]
pub async fn get_alerts(
    State(state): State<AppState>,
    Path(region): Path<String>,
) -> Result<Json<AlertsResponse>, AppError> {
    let outcome = state.weather.alerts(&region).await?;
    Ok(Json(outcome.into()))
}
