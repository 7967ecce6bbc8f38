//! Utility functions for miniring

/// Validate a server id (non-empty, no separator, no control chars)
pub fn validate_server_id(id: &str, separator: char) -> crate::Result<()> {
    if id.is_empty() {
        return Err(crate::Error::InvalidServerId(
            "server id cannot be empty".into(),
        ));
    }

    if id.contains(separator) {
        return Err(crate::Error::InvalidServerId(format!(
            "server id {:?} contains the virtual node separator {:?}",
            id, separator
        )));
    }

    if id.chars().any(|c| c.is_control()) {
        return Err(crate::Error::InvalidServerId(format!(
            "server id {:?} contains invalid characters",
            id
        )));
    }

    Ok(())
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Format a fraction as a percentage string
pub fn format_percent(fraction: f64) -> String {
    format!("{:.2}%", fraction * 100.0)
}
