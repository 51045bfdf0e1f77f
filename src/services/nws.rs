//! National Weather Service API client.
//!
//! Issues single GET requests against api.weather.gov and decodes the
//! GeoJSON bodies into optional-field document types. Every failure mode
//! (transport, HTTP status, body decode) collapses into `UpstreamUnavailable`;
//! the cause is logged here and not passed on.
//! See: https://www.weather.gov/documentation/services-web-api

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

const GEO_JSON: &str = "application/geo+json";

/// The upstream request produced no usable document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("NWS request failed")]
pub struct UpstreamUnavailable;

/// Client for the NWS API.
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: reqwest::Client,
    base_url: String,
}

// --- NWS JSON response types ---
//
// NWS omits properties freely, so every field is optional. Fields go through
// `lenient`: a value of the wrong JSON type decodes as `None` instead of
// failing the whole document.

/// Decode `T`, mapping null or a mistyped value to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).ok())
}

/// `GET /points/{lat},{lon}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PointsResponse {
    #[serde(deserialize_with = "lenient")]
    pub properties: Option<PointsProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PointsProperties {
    /// Absolute URL of the gridpoint forecast document.
    #[serde(deserialize_with = "lenient")]
    pub forecast: Option<String>,
}

/// Gridpoint forecast document, fetched from `PointsProperties::forecast`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastResponse {
    #[serde(deserialize_with = "lenient")]
    pub properties: Option<ForecastProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ForecastProperties {
    #[serde(deserialize_with = "lenient")]
    pub periods: Option<Vec<NwsPeriod>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NwsPeriod {
    #[serde(deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub temperature: Option<f64>,
    #[serde(deserialize_with = "lenient")]
    pub temperature_unit: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub wind_speed: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub wind_direction: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub short_forecast: Option<String>,
}

/// `GET /alerts?area={region}`
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlertsResponse {
    #[serde(deserialize_with = "lenient")]
    pub features: Option<Vec<AlertFeature>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AlertFeature {
    #[serde(deserialize_with = "lenient")]
    pub properties: Option<AlertProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AlertProperties {
    #[serde(deserialize_with = "lenient")]
    pub event: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub area_desc: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub headline: Option<String>,
}

impl NwsClient {
    /// Build a client that sends `user_agent` and `Accept: application/geo+json`
    /// with every request.
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL of the points lookup for a coordinate pair.
    pub fn points_url(&self, latitude: f64, longitude: f64) -> String {
        format!("{}/points/{},{}", self.base_url, latitude, longitude)
    }

    /// URL of the alerts query for a region code, query-encoded.
    pub fn alerts_url(&self, region: &str) -> String {
        let base = format!("{}/alerts", self.base_url);
        match Url::parse_with_params(&base, &[("area", region)]) {
            Ok(url) => url.into(),
            // Only reachable with an unparsable base URL; the request will fail and be logged.
            Err(_) => format!("{}?area={}", base, region),
        }
    }

    /// Fetch `url` and decode the body as `T`.
    ///
    /// One request, no retries, no explicit timeout.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, UpstreamUnavailable> {
        tracing::debug!("NWS GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!("NWS request to {} failed: {}", url, e);
            UpstreamUnavailable
        })?;

        let status = response.status();
        if !status.is_success() {
            tracing::error!("NWS request to {} returned HTTP {}", url, status);
            return Err(UpstreamUnavailable);
        }

        let body = response.bytes().await.map_err(|e| {
            tracing::error!("NWS response body from {} could not be read: {}", url, e);
            UpstreamUnavailable
        })?;

        serde_json::from_slice(&body).map_err(|e| {
            tracing::error!("NWS response from {} is not valid JSON: {}", url, e);
            UpstreamUnavailable
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> NwsClient {
        NwsClient::new(&server.uri(), "weather-app/1.0").unwrap()
    }

    #[test]
    fn test_points_url() {
        let client = NwsClient::new("https://api.weather.gov/", "test").unwrap();
        assert_eq!(
            client.points_url(47.6, -122.3),
            "https://api.weather.gov/points/47.6,-122.3"
        );
        assert_eq!(
            client.points_url(39.0, -77.0),
            "https://api.weather.gov/points/39,-77"
        );
    }

    #[test]
    fn test_alerts_url_encodes_region() {
        let client = NwsClient::new("https://api.weather.gov", "test").unwrap();
        assert_eq!(
            client.alerts_url("CA"),
            "https://api.weather.gov/alerts?area=CA"
        );
        assert_eq!(
            client.alerts_url("A&B"),
            "https://api.weather.gov/alerts?area=A%26B"
        );
    }

    #[test]
    fn test_points_response_missing_properties() {
        let doc: PointsResponse = serde_json::from_str(r#"{"type": "Feature"}"#).unwrap();
        assert!(doc.properties.is_none());
    }

    #[test]
    fn test_period_decodes_camel_case() {
        let period: NwsPeriod = serde_json::from_value(serde_json::json!({
            "number": 1,
            "name": "Tonight",
            "temperature": 48,
            "temperatureUnit": "F",
            "windSpeed": "5 mph",
            "windDirection": "S",
            "shortForecast": "Light Rain"
        }))
        .unwrap();

        assert_eq!(period.name.as_deref(), Some("Tonight"));
        assert_eq!(period.temperature, Some(48.0));
        assert_eq!(period.temperature_unit.as_deref(), Some("F"));
        assert_eq!(period.wind_speed.as_deref(), Some("5 mph"));
        assert_eq!(period.wind_direction.as_deref(), Some("S"));
        assert_eq!(period.short_forecast.as_deref(), Some("Light Rain"));
    }

    #[test]
    fn test_alert_null_fields_are_absent() {
        let feature: AlertFeature = serde_json::from_value(serde_json::json!({
            "properties": { "event": "Heat Advisory", "headline": null }
        }))
        .unwrap();

        let props = feature.properties.unwrap();
        assert_eq!(props.event.as_deref(), Some("Heat Advisory"));
        assert!(props.headline.is_none());
        assert!(props.area_desc.is_none());
    }

    #[test]
    fn test_mistyped_fields_decode_as_absent() {
        let doc: ForecastResponse = serde_json::from_value(serde_json::json!({
            "properties": {
                "periods": [
                    { "name": "Today", "temperature": 60, "temperatureUnit": "F" },
                    {
                        "name": "Tonight",
                        "temperature": { "unitCode": "wmoUnit:degF", "value": 48 },
                        "windSpeed": 5
                    }
                ]
            }
        }))
        .unwrap();

        let periods = doc.properties.unwrap().periods.unwrap();
        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].temperature, Some(60.0));
        assert_eq!(periods[1].name.as_deref(), Some("Tonight"));
        assert!(periods[1].temperature.is_none());
        assert!(periods[1].wind_speed.is_none());
    }

    #[test]
    fn test_mistyped_container_decodes_as_absent() {
        let doc: AlertsResponse =
            serde_json::from_value(serde_json::json!({ "features": "none" })).unwrap();
        assert!(doc.features.is_none());

        let doc: PointsResponse =
            serde_json::from_value(serde_json::json!({ "properties": [1, 2] })).unwrap();
        assert!(doc.properties.is_none());
    }

    #[tokio::test]
    async fn test_get_json_sends_identifying_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/alerts"))
            .and(query_param("area", "WA"))
            .and(header("user-agent", "weather-app/1.0"))
            .and(header("accept", "application/geo+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "features": []
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let doc: AlertsResponse = client.get_json(&client.alerts_url("WA")).await.unwrap();
        assert_eq!(doc.features.map(|f| f.len()), Some(0));
    }

    #[tokio::test]
    async fn test_get_json_non_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "title": "Data Unavailable For Requested Point"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result: Result<PointsResponse, _> =
            client.get_json(&client.points_url(51.5, -0.1)).await;
        assert_eq!(result.unwrap_err(), UpstreamUnavailable);
    }

    #[tokio::test]
    async fn test_get_json_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let result: Result<PointsResponse, _> =
            client.get_json(&client.points_url(40.0, -100.0)).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_get_json_unreachable_host() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let client = NwsClient::new("http://127.0.0.1:9", "test").unwrap();
        let result: Result<PointsResponse, _> =
            client.get_json(&client.points_url(40.0, -100.0)).await;
        assert!(result.is_err());
    }
}
