//! Composable, parameterized filters over the observation table
//!
//! Each [`Predicate`] renders to an independent SQL fragment with its own
//! bound parameters. A query is the AND of its predicates, so a viewport
//! and an encryption class combine in any order without touching each
//! other's SQL.

use crate::types::{EncryptionClass, Viewport};
use rusqlite::types::Value;

/// Name of the observation table, shared with existing survey databases
pub const TABLE: &str = "warwalking";

/// Column list in the order rows are decoded
pub const COLUMNS: &str = "id, bssid, ssid, encryption, rssi, channel, latitude, longitude";

/// A single restriction on stored observations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Predicate {
    /// Inclusive bounding box on latitude and longitude
    Within(Viewport),
    /// Encryption bucket; `Other` matches anything that is not WEP or OPEN
    Encryption(EncryptionClass),
}

impl Predicate {
    fn render(&self, params: &mut Vec<Value>) -> String {
        match self {
            Self::Within(viewport) => {
                params.extend([
                    Value::Real(viewport.south()),
                    Value::Real(viewport.north()),
                    Value::Real(viewport.west()),
                    Value::Real(viewport.east()),
                ]);
                "(latitude BETWEEN ? AND ? AND longitude BETWEEN ? AND ?)".to_string()
            }
            Self::Encryption(EncryptionClass::Other) => {
                params.extend([
                    Value::Text(EncryptionClass::Wep.as_str().to_string()),
                    Value::Text(EncryptionClass::Open.as_str().to_string()),
                ]);
                "(encryption IS NULL OR encryption NOT IN (?, ?))".to_string()
            }
            Self::Encryption(class) => {
                params.push(Value::Text(class.as_str().to_string()));
                "encryption = ?".to_string()
            }
        }
    }
}

/// Rendered SQL plus the parameters to bind, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Conjunction of predicates; an empty query matches every row
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationQuery {
    predicates: Vec<Predicate>,
}

impl ObservationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a viewport; `None` leaves the query unrestricted
    pub fn within(self, viewport: Option<&Viewport>) -> Self {
        match viewport {
            Some(vp) => self.filter(Predicate::Within(*vp)),
            None => self,
        }
    }

    pub fn encryption(self, class: EncryptionClass) -> Self {
        self.filter(Predicate::Encryption(class))
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    fn where_clause(&self, params: &mut Vec<Value>) -> String {
        if self.predicates.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = self.predicates.iter().map(|p| p.render(params)).collect();
        format!(" WHERE {}", parts.join(" AND "))
    }

    /// `SELECT` of all matching rows, ordered by id
    pub fn select(&self) -> Statement {
        let mut params = Vec::new();
        let filter = self.where_clause(&mut params);
        Statement {
            sql: format!("SELECT {COLUMNS} FROM {TABLE}{filter} ORDER BY id"),
            params,
        }
    }

    /// `SELECT COUNT(id)` of matching rows
    pub fn count(&self) -> Statement {
        let mut params = Vec::new();
        let filter = self.where_clause(&mut params);
        Statement {
            sql: format!("SELECT COUNT(id) FROM {TABLE}{filter}"),
            params,
        }
    }
}
