//! Shared helpers for coordinate parsing and NWS display strings.
//!
//! NWS periods carry temperature and wind as separate value/unit fields; the
//! simplified schema joins them into one display string each. A missing value
//! stays missing rather than being rendered as a placeholder.

/// Parse a coordinate query parameter as a finite decimal degree value.
///
/// Returns `None` for anything that is not a finite number (`"abc"`, `"NaN"`,
/// `"inf"`). No range check: out-of-coverage coordinates are left for NWS to
/// reject.
pub(crate) fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Join a temperature and its unit, e.g. `72°F`.
pub(crate) fn format_temperature(value: Option<f64>, unit: Option<&str>) -> Option<String> {
    let value = value?;
    Some(match unit {
        Some(unit) => format!("{}°{}", value, unit),
        None => value.to_string(),
    })
}

/// Join a wind speed and direction, e.g. `10 mph NW`.
pub(crate) fn format_wind(speed: Option<&str>, direction: Option<&str>) -> Option<String> {
    let speed = speed?;
    Some(match direction {
        Some(direction) => format!("{} {}", speed, direction),
        None => speed.to_string(),
    })
}
