//! Survey log line format
//!
//! One record per line, 7 fields separated by `;`:
//!
//! ```text
//! bssid;ssid;encryption;rssi;channel;latitude;longitude
//! ```
//!
//! There is no escaping, so a `;` inside an SSID produces a line with the
//! wrong field count and is rejected.

use crate::error::RecordError;
use crate::types::Observation;
use std::str::FromStr;

pub const SEPARATOR: char = ';';
pub const FIELD_COUNT: usize = 7;

/// Parse one log line into an observation
pub fn parse_line(line: &str) -> Result<Observation, RecordError> {
    let fields: Vec<&str> = line.trim().split(SEPARATOR).collect();
    if fields.len() != FIELD_COUNT {
        return Err(RecordError::FieldCount {
            found: fields.len(),
        });
    }

    let bssid = fields[0];
    if bssid.trim().is_empty() {
        return Err(RecordError::EmptyBssid);
    }

    let rssi: i32 = number("rssi", fields[3])?;
    let channel: i32 = number("channel", fields[4])?;
    let latitude: f64 = number("latitude", fields[5])?;
    let longitude: f64 = number("longitude", fields[6])?;
    check_range("latitude", latitude, 90.0)?;
    check_range("longitude", longitude, 180.0)?;

    Ok(Observation {
        bssid: bssid.to_string(),
        ssid: fields[1].to_string(),
        encryption: fields[2].to_string(),
        rssi,
        channel,
        latitude,
        longitude,
    })
}

/// Render an observation back into the log line format
pub fn format_line(observation: &Observation) -> String {
    [
        observation.bssid.clone(),
        observation.ssid.clone(),
        observation.encryption.clone(),
        observation.rssi.to_string(),
        observation.channel.to_string(),
        observation.latitude.to_string(),
        observation.longitude.to_string(),
    ]
    .join(&SEPARATOR.to_string())
}

fn number<T: FromStr>(field: &'static str, raw: &str) -> Result<T, RecordError> {
    raw.trim().parse().map_err(|_| RecordError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn check_range(field: &'static str, value: f64, limit: f64) -> Result<(), RecordError> {
    if value.is_finite() && value.abs() <= limit {
        Ok(())
    } else {
        Err(RecordError::OutOfRange { field, value })
    }
}
