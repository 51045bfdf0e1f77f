//! MCP server exposing the `get-forecast` tool.
//!
//! Served over rmcp's streamable HTTP transport at `/mcp`. Each MCP session
//! gets its own `WeatherTools` instance; all of them share the same
//! `WeatherService`.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::StreamableHttpService;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::Deserialize;

use crate::services::weather::{
    ForecastPeriod, LocationQuery, LookupError, WeatherService, TOOL_FORECAST_PERIODS,
};

/// Input of the `get-forecast` tool.
#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ForecastArgs {
    /// Latitude of the location
    pub latitude: f64,
    /// Longitude of the location
    pub longitude: f64,
}

#[derive(Clone)]
pub struct WeatherTools {
    weather: WeatherService,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl WeatherTools {
    pub fn new(weather: WeatherService) -> Self {
        Self {
            weather,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "get-forecast",
        description = "Get weather forecast for a location (US only)"
    )]
    async fn get_forecast(
        &self,
        Parameters(args): Parameters<ForecastArgs>,
    ) -> Result<CallToolResult, McpError> {
        let location = LocationQuery {
            latitude: args.latitude,
            longitude: args.longitude,
        };

        match self.weather.forecast(location).await {
            Ok(periods) => {
                let text = forecast_text(&periods).map_err(|e| {
                    McpError::internal_error(format!("Failed to serialize forecast: {}", e), None)
                })?;
                Ok(CallToolResult::success(vec![Content::text(text)]))
            }
            Err(LookupError::UnsupportedLocation) => Ok(CallToolResult::success(vec![
                Content::text("Location not supported"),
            ])),
            Err(err) => Ok(CallToolResult::error(vec![Content::text(err.to_string())])),
        }
    }
}

#[tool_handler]
impl ServerHandler for WeatherTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Weather forecasts from the US National Weather Service. \
                 Call get-forecast with a latitude and longitude inside the United States."
                    .to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Pretty-printed JSON of the first `TOOL_FORECAST_PERIODS` periods.
fn forecast_text(periods: &[ForecastPeriod]) -> Result<String, serde_json::Error> {
    let shown = &periods[..periods.len().min(TOOL_FORECAST_PERIODS)];
    serde_json::to_string_pretty(shown)
}

/// Tower service for the streamable HTTP transport, ready to nest under `/mcp`.
///
/// The local session manager issues a random session id on `initialize` and
/// routes later requests carrying that id to the same `WeatherTools`.
pub fn streamable_http_service(
    weather: WeatherService,
) -> StreamableHttpService<WeatherTools, LocalSessionManager> {
    StreamableHttpService::new(
        move || Ok(WeatherTools::new(weather.clone())),
        LocalSessionManager::default().into(),
        Default::default(),
    )
}
