//! GET /forecast?latitude=&longitude=: gridpoint forecast for a US location.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::errors::{AppError, ErrorResponse};
use crate::helpers::parse_coordinate;
use crate::routes::AppState;
use crate::services::weather::{ForecastPeriod, LocationQuery};

/// Raw query parameters. Kept as strings so a missing or non-numeric value
/// gets its own error message.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ForecastQuery {
    /// Latitude in decimal degrees (e.g. 47.6)
    pub latitude: Option<String>,
    /// Longitude in decimal degrees (e.g. -122.3)
    pub longitude: Option<String>,
}

impl ForecastQuery {
    fn location(&self) -> Result<LocationQuery, AppError> {
        let (Some(lat), Some(lon)) = (
            self.latitude.as_deref().filter(|s| !s.is_empty()),
            self.longitude.as_deref().filter(|s| !s.is_empty()),
        ) else {
            return Err(AppError::BadRequest(
                "Please provide latitude and longitude query parameters".to_string(),
            ));
        };

        match (parse_coordinate(lat), parse_coordinate(lon)) {
            (Some(latitude), Some(longitude)) => Ok(LocationQuery {
                latitude,
                longitude,
            }),
            _ => Err(AppError::BadRequest(
                "latitude and longitude must be numeric".to_string(),
            )),
        }
    }
}

/// Forecast response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ForecastResponse {
    /// The coordinates that were looked up
    pub location: LocationQuery,
    /// All forecast periods, in NWS order
    pub forecast: Vec<ForecastPeriod>,
}

/// Get the forecast for a location.
///
/// Resolves the NWS gridpoint for the coordinates, then fetches its forecast.
/// NWS only covers the United States; other coordinates return 400.
#[utoipa::path(
    get,
    path = "/forecast",
    tag = "Forecast",
    params(ForecastQuery),
    responses(
        (status = 200, description = "Forecast periods for the location", body = ForecastResponse),
        (status = 400, description = "Missing, malformed or non-numeric coordinates, or location not covered by NWS", body = ErrorResponse),
        (status = 500, description = "NWS forecast request failed", body = ErrorResponse),
    )
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    query: Result<Query<ForecastQuery>, QueryRejection>,
) -> Result<Json<ForecastResponse>, AppError> {
    let Query(params) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let location = params.location()?;
    let forecast = state.weather.forecast(location).await?;

    Ok(Json(ForecastResponse { location, forecast }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(latitude: Option<&str>, longitude: Option<&str>) -> ForecastQuery {
        ForecastQuery {
            latitude: latitude.map(str::to_string),
            longitude: longitude.map(str::to_string),
        }
    }

    #[test]
    fn test_location_parsed() {
        let location = query(Some("47.6"), Some("-122.3")).location().unwrap();
        assert_eq!(location.latitude, 47.6);
        assert_eq!(location.longitude, -122.3);
    }

    #[test]
    fn test_location_missing_or_empty() {
        for q in [
            query(None, Some("-122.3")),
            query(Some("47.6"), None),
            query(Some(""), Some("-122.3")),
        ] {
            let err = q.location().unwrap_err();
            assert!(
                matches!(err, AppError::BadRequest(ref m) if m.starts_with("Please provide")),
                "unexpected error: {:?}",
                err
            );
        }
    }

    #[test]
    fn test_location_non_numeric() {
        let err = query(Some("north"), Some("west")).location().unwrap_err();
        assert!(matches!(err, AppError::BadRequest(ref m) if m.contains("numeric")));
    }
}
