//! Viewport queries for the map display
//!
//! [`filter`] builds parameterized SQL from composable predicates.
//! [`MapView`] is the read-only surface the display layer calls: all
//! observations, open networks, WEP networks and counts, each optionally
//! restricted to the visible window.

pub mod filter;

pub use filter::{ObservationQuery, Predicate, Statement};

use crate::error::Result;
use crate::storage::ObservationStore;
use crate::types::{EncryptionClass, StoredObservation, Viewport};
use serde::Serialize;

/// Per-class totals for a window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCounts {
    pub total: usize,
    pub open: usize,
    pub wep: usize,
    pub other: usize,
}

/// Read-only query surface over a store
pub struct MapView<'a> {
    store: &'a ObservationStore,
}

impl<'a> MapView<'a> {
    pub fn new(store: &'a ObservationStore) -> Self {
        Self { store }
    }

    pub fn get_all(&self, viewport: Option<&Viewport>) -> Result<Vec<StoredObservation>> {
        self.store.query_all(viewport)
    }

    pub fn get_open(&self, viewport: Option<&Viewport>) -> Result<Vec<StoredObservation>> {
        self.store.query_by_encryption(EncryptionClass::Open, viewport)
    }

    pub fn get_wep(&self, viewport: Option<&Viewport>) -> Result<Vec<StoredObservation>> {
        self.store.query_by_encryption(EncryptionClass::Wep, viewport)
    }

    pub fn get_other(&self, viewport: Option<&Viewport>) -> Result<Vec<StoredObservation>> {
        self.store.query_by_encryption(EncryptionClass::Other, viewport)
    }

    /// Observations for an optional class; `None` means all classes
    pub fn get(
        &self,
        class: Option<EncryptionClass>,
        viewport: Option<&Viewport>,
    ) -> Result<Vec<StoredObservation>> {
        match class {
            Some(class) => self.store.query_by_encryption(class, viewport),
            None => self.get_all(viewport),
        }
    }

    pub fn get_total_count(&self, viewport: Option<&Viewport>) -> Result<usize> {
        self.store.count(viewport)
    }

    pub fn class_counts(&self, viewport: Option<&Viewport>) -> Result<ClassCounts> {
        let class_count = |class| {
            self.store
                .count_matching(&ObservationQuery::new().within(viewport).encryption(class))
        };
        Ok(ClassCounts {
            total: self.get_total_count(viewport)?,
            open: class_count(EncryptionClass::Open)?,
            wep: class_count(EncryptionClass::Wep)?,
            other: class_count(EncryptionClass::Other)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;
    use crate::types::Coordinate;

    fn seeded() -> Result<ObservationStore> {
        let store = ObservationStore::open_in_memory()?;
        for line in [
            "01:01;home;WEP;-50;1;10.0;20.0",
            "02:02;cafe;OPEN;-60;6;10.5;20.5",
            "03:03;office;WPA2;-70;11;10.2;20.2",
            "04:04;far;WEP;-80;1;45.0;90.0",
        ] {
            store.insert(&parse_line(line).expect("valid line"))?;
        }
        Ok(store)
    }

    fn window() -> Viewport {
        Viewport::new(Coordinate::new(11.0, 19.0), Coordinate::new(9.0, 21.0))
    }

    #[test]
    fn test_class_queries() -> Result<()> {
        let store = seeded()?;
        let view = MapView::new(&store);

        assert_eq!(view.get_all(None)?.len(), 4);
        assert_eq!(view.get_wep(None)?.len(), 2);
        assert_eq!(view.get_wep(Some(&window()))?.len(), 1);

        let open = view.get_open(Some(&window()))?;
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].observation.ssid, "cafe");

        let other = view.get(Some(EncryptionClass::Other), None)?;
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].observation.bssid, "03:03");
        Ok(())
    }

    #[test]
    fn test_class_counts() -> Result<()> {
        let store = seeded()?;
        let view = MapView::new(&store);

        assert_eq!(
            view.class_counts(None)?,
            ClassCounts {
                total: 4,
                open: 1,
                wep: 2,
                other: 1
            }
        );
        let windowed = view.class_counts(Some(&window()))?;
        assert_eq!(windowed.total, 3);
        assert_eq!(windowed.open + windowed.wep + windowed.other, windowed.total);
        Ok(())
    }

    #[test]
    fn test_wep_outside_everything_is_empty() -> Result<()> {
        let store = seeded()?;
        let nowhere = Viewport::new(Coordinate::new(-60.0, -170.0), Coordinate::new(-61.0, -169.0));
        assert!(MapView::new(&store).get_wep(Some(&nowhere))?.is_empty());
        Ok(())
    }
}
