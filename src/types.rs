//! Domain types for the survey engine
//!
//! These types are storage-agnostic - they don't know about SQLite.
//! The store handles conversion to and from rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One sighting of a radio at a position, as read from a survey log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub bssid: String,
    pub ssid: String,
    pub encryption: String,
    pub rssi: i32,
    pub channel: i32,
    pub latitude: f64,
    pub longitude: f64,
}

impl Observation {
    pub fn encryption_class(&self) -> EncryptionClass {
        EncryptionClass::classify(&self.encryption)
    }
}

/// An observation that has been persisted and carries its store id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObservation {
    pub id: i64,
    #[serde(flatten)]
    pub observation: Observation,
}

impl fmt::Display for StoredObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(32);
        let obs = &self.observation;
        writeln!(f, "{rule}")?;
        writeln!(f, "{}", obs.ssid)?;
        writeln!(f, "BSSID: {}", obs.bssid)?;
        writeln!(f, "ENCRYPTION: {}", obs.encryption)?;
        writeln!(f, "SIGNAL: {}", obs.rssi)?;
        writeln!(f, "CHANNEL: {}", obs.channel)?;
        write!(f, "{rule}")
    }
}

/// Closed set of encryption buckets used for display and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EncryptionClass {
    Wep,
    Open,
    Other,
}

impl EncryptionClass {
    /// Map a raw encryption string to its class.
    ///
    /// Only the exact strings `WEP` and `OPEN` are recognized; everything
    /// else, including an empty value, is [`EncryptionClass::Other`].
    pub fn classify(raw: &str) -> Self {
        match raw {
            "WEP" => Self::Wep,
            "OPEN" => Self::Open,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wep => "WEP",
            Self::Open => "OPEN",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for EncryptionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl FromStr for Coordinate {
    type Err = String;

    /// Parse `LAT,LNG`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split_once(',')
            .ok_or_else(|| format!("expected LAT,LNG, got {s:?}"))?;
        let latitude = degrees("latitude", lat, 90.0)?;
        let longitude = degrees("longitude", lng, 180.0)?;
        Ok(Self::new(latitude, longitude))
    }
}

fn degrees(field: &str, raw: &str, limit: f64) -> Result<f64, String> {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value.abs() <= limit => Ok(value),
        _ => Err(format!("invalid {field} {raw:?}")),
    }
}

/// Rectangular map window given by its upper-left and lower-right corners.
///
/// Corners are normalized when bounds are read, so swapped corners still
/// describe the same rectangle. Windows crossing the antimeridian are not
/// supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub upper_left: Coordinate,
    pub lower_right: Coordinate,
}

impl Viewport {
    pub fn new(upper_left: Coordinate, lower_right: Coordinate) -> Self {
        Self {
            upper_left,
            lower_right,
        }
    }

    pub fn south(&self) -> f64 {
        self.upper_left.latitude.min(self.lower_right.latitude)
    }

    pub fn north(&self) -> f64 {
        self.upper_left.latitude.max(self.lower_right.latitude)
    }

    pub fn west(&self) -> f64 {
        self.upper_left.longitude.min(self.lower_right.longitude)
    }

    pub fn east(&self) -> f64 {
        self.upper_left.longitude.max(self.lower_right.longitude)
    }

    /// Inclusive bounding-box test, identical to the SQL predicate
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.south()..=self.north()).contains(&latitude)
            && (self.west()..=self.east()).contains(&longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(EncryptionClass::classify("WEP"), EncryptionClass::Wep);
        assert_eq!(EncryptionClass::classify("OPEN"), EncryptionClass::Open);
        assert_eq!(EncryptionClass::classify("WPA2_PSK"), EncryptionClass::Other);
        assert_eq!(EncryptionClass::classify(""), EncryptionClass::Other);
        // Case matters, like the device output
        assert_eq!(EncryptionClass::classify("wep"), EncryptionClass::Other);
    }

    #[test]
    fn test_viewport_normalizes_corners() {
        let vp = Viewport::new(Coordinate::new(10.0, 25.0), Coordinate::new(12.0, 20.0));
        assert_eq!(vp.south(), 10.0);
        assert_eq!(vp.north(), 12.0);
        assert_eq!(vp.west(), 20.0);
        assert_eq!(vp.east(), 25.0);
    }

    #[test]
    fn test_viewport_contains_is_inclusive() {
        let vp = Viewport::new(Coordinate::new(11.0, 19.0), Coordinate::new(10.0, 21.0));
        assert!(vp.contains(10.0, 20.0));
        assert!(vp.contains(11.0, 21.0));
        assert!(vp.contains(10.5, 19.0));
        assert!(!vp.contains(9.99, 20.0));
        assert!(!vp.contains(10.5, 21.01));
    }

    #[test]
    fn test_coordinate_from_str() {
        let c: Coordinate = "48.2, 16.37".parse().unwrap();
        assert_eq!(c, Coordinate::new(48.2, 16.37));
        assert!("48.2".parse::<Coordinate>().is_err());
        assert!("north,16".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_coordinate_rejects_non_finite_and_out_of_range() {
        for raw in ["NaN,0", "0,inf", "-inf,10", "90.5,0", "0,-181"] {
            assert!(raw.parse::<Coordinate>().is_err(), "{raw}");
        }
        assert!("-90,180".parse::<Coordinate>().is_ok());
    }

    #[test]
    fn test_display_block() {
        let stored = StoredObservation {
            id: 7,
            observation: Observation {
                bssid: "AA:BB".to_string(),
                ssid: "net1".to_string(),
                encryption: "OPEN".to_string(),
                rssi: -40,
                channel: 6,
                latitude: 10.0,
                longitude: 20.0,
            },
        };
        let text = stored.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[1], "net1");
        assert_eq!(lines[2], "BSSID: AA:BB");
        assert_eq!(lines[4], "SIGNAL: -40");
        assert_eq!(lines[6], "=".repeat(32));
    }
}
