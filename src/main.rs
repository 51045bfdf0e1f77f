// NWS Weather Proxy v0.1
use axum::http::{HeaderName, Method};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod errors;
mod helpers;
mod mcp;
mod routes;
mod services;

use config::{AppConfig, LogFormat};
use routes::AppState;
use services::nws::NwsClient;
use services::weather::WeatherService;

/// NWS Weather Proxy OpenAPI document.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "NWS Weather Proxy",
        version = "0.1.0",
        description = "Simplified forecasts and alerts from the US National Weather Service. \
            Forecasts are resolved in two steps (points lookup, then gridpoint forecast) \
            and flattened into a small schema. The same forecast lookup is also available \
            to MCP clients as the `get-forecast` tool at `/mcp`.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Alerts", description = "Active weather alerts by region"),
        (name = "Forecast", description = "Forecast by coordinates"),
    ),
    paths(
        routes::health::health_check,
        routes::alerts::get_alerts,
        routes::forecast::get_forecast,
    ),
    components(
        schemas(
            routes::health::HealthResponse,
            routes::alerts::AlertsResponse,
            routes::alerts::ActiveAlerts,
            routes::alerts::NoActiveAlerts,
            routes::forecast::ForecastResponse,
            services::weather::Alert,
            services::weather::ForecastPeriod,
            services::weather::LocationQuery,
            errors::ErrorResponse,
        )
    )
)]
struct ApiDoc;

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nws_weather_proxy=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    let nws = NwsClient::new(&config.nws_api_base, &config.nws_user_agent)?;
    let weather = WeatherService::new(nws);
    tracing::info!("Using NWS API at {}", config.nws_api_base);

    // CORS: MCP clients POST to /mcp and need the session header back
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any)
        .expose_headers([HeaderName::from_static("mcp-session-id")]);

    let app = Router::new()
        .merge(routes::router(AppState {
            weather: weather.clone(),
        }))
        .nest_service("/mcp", mcp::streamable_http_service(weather))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Weather API running on port {}", config.port);
    tracing::info!("MCP endpoint available at http://localhost:{}/mcp", config.port);
    tracing::info!(
        "Swagger UI available at http://localhost:{}/swagger-ui/",
        config.port
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
