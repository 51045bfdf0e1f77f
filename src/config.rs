/// Upstream origin used when `NWS_API_BASE` is not set.
pub const DEFAULT_NWS_API_BASE: &str = "https://api.weather.gov";
/// Identifying agent string sent with every upstream request.
pub const DEFAULT_NWS_USER_AGENT: &str = "weather-app/1.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16, got '{0}'")]
    InvalidPort(String),
}

/// Log line format, selected with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration, parsed from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Base URL of the NWS API, without trailing slash.
    pub nws_api_base: String,
    pub nws_user_agent: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            None => DEFAULT_PORT,
        };

        let nws_api_base = lookup("NWS_API_BASE")
            .unwrap_or_else(|| DEFAULT_NWS_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let log_format = match lookup("LOG_FORMAT").as_deref() {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            port,
            nws_api_base,
            nws_user_agent: lookup("NWS_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_NWS_USER_AGENT.to_string()),
            log_format,
        })
    }
}
