//! Forecast and alert lookups.
//!
//! Chains NWS requests and projects the nested GeoJSON documents onto the
//! flat caller-facing schema. Presence is checked at each hop; fields that
//! NWS leaves out stay out of the output.

use serde::Serialize;
use utoipa::ToSchema;

use crate::helpers::{format_temperature, format_wind};
use crate::services::nws::{
    AlertFeature, AlertsResponse, ForecastResponse, NwsClient, NwsPeriod, PointsResponse,
};

/// Number of periods returned by the `get-forecast` agent tool.
pub const TOOL_FORECAST_PERIODS: usize = 5;

/// A coordinate pair in decimal degrees. Not range-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
pub struct LocationQuery {
    pub latitude: f64,
    pub longitude: f64,
}

/// One forecast period in the simplified schema.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ForecastPeriod {
    /// Period label (e.g. "Tonight", "Wednesday")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Temperature with unit (e.g. "72°F")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<String>,
    /// Wind speed and direction (e.g. "10 mph NW")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind: Option<String>,
    /// Short forecast text (e.g. "Partly Cloudy")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forecast: Option<String>,
}

impl From<&NwsPeriod> for ForecastPeriod {
    fn from(p: &NwsPeriod) -> Self {
        Self {
            name: p.name.clone(),
            temperature: format_temperature(p.temperature, p.temperature_unit.as_deref()),
            wind: format_wind(p.wind_speed.as_deref(), p.wind_direction.as_deref()),
            forecast: p.short_forecast.clone(),
        }
    }
}

/// One active alert in the simplified schema.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Alert {
    /// Alert category (e.g. "Flood Warning")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Affected area description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// NWS severity ("Extreme", "Severe", "Moderate", "Minor", "Unknown")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// One-line summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<String>,
}

impl From<&AlertFeature> for Alert {
    fn from(f: &AlertFeature) -> Self {
        match &f.properties {
            Some(p) => Self {
                event: p.event.clone(),
                area: p.area_desc.clone(),
                severity: p.severity.clone(),
                headline: p.headline.clone(),
            },
            None => Self {
                event: None,
                area: None,
                severity: None,
                headline: None,
            },
        }
    }
}

/// Successful alerts lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertsOutcome {
    Active { region: String, alerts: Vec<Alert> },
    NoneActive { region: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// Points lookup failed or has no forecast URL (outside NWS coverage).
    #[error("Invalid location or unsupported by NWS (US only)")]
    UnsupportedLocation,

    #[error("Failed to retrieve forecast data")]
    ForecastUnavailable,

    #[error("Failed to retrieve alerts data")]
    AlertsUnavailable,
}

/// Stateless lookup service over an `NwsClient`.
#[derive(Debug, Clone)]
pub struct WeatherService {
    nws: NwsClient,
}

impl WeatherService {
    pub fn new(nws: NwsClient) -> Self {
        Self { nws }
    }

    /// Resolve the gridpoint forecast for a location.
    ///
    /// Two sequential requests: the points lookup yields the forecast URL,
    /// which is then fetched. Periods keep upstream order and are not capped.
    pub async fn forecast(
        &self,
        location: LocationQuery,
    ) -> Result<Vec<ForecastPeriod>, LookupError> {
        let points_url = self.nws.points_url(location.latitude, location.longitude);
        let forecast_url = self
            .nws
            .get_json::<PointsResponse>(&points_url)
            .await
            .ok()
            .and_then(|doc| doc.properties)
            .and_then(|props| props.forecast)
            .ok_or_else(|| {
                tracing::warn!(
                    "No NWS forecast URL for {},{}",
                    location.latitude,
                    location.longitude
                );
                LookupError::UnsupportedLocation
            })?;

        let periods = self
            .nws
            .get_json::<ForecastResponse>(&forecast_url)
            .await
            .ok()
            .and_then(|doc| doc.properties)
            .and_then(|props| props.periods)
            .ok_or(LookupError::ForecastUnavailable)?;

        Ok(periods.iter().map(ForecastPeriod::from).collect())
    }

    /// Active alerts for a region code (e.g. a US state), matched case-insensitively.
    pub async fn alerts(&self, region: &str) -> Result<AlertsOutcome, LookupError> {
        let region = region.to_uppercase();
        let doc = self
            .nws
            .get_json::<AlertsResponse>(&self.nws.alerts_url(&region))
            .await
            .map_err(|_| LookupError::AlertsUnavailable)?;

        match doc.features {
            Some(features) if !features.is_empty() => Ok(AlertsOutcome::Active {
                alerts: features.iter().map(Alert::from).collect(),
                region,
            }),
            _ => Ok(AlertsOutcome::NoneActive { region }),
        }
    }
}
