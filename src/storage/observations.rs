//! Observation table: schema, inserts and filtered reads

use crate::db::SqliteDatabase;
use crate::error::Result;
use crate::query::filter::{ObservationQuery, Statement, TABLE};
use crate::storage::dedupe;
use crate::types::{EncryptionClass, Observation, StoredObservation, Viewport};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::path::Path;

/// Signal strength reported for rows whose `rssi` column is NULL
pub const UNKNOWN_RSSI: i32 = i32::MIN;

fn insert_sql() -> String {
    format!(
        "INSERT INTO {TABLE} (latitude, longitude, ssid, encryption, rssi, bssid, channel)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         RETURNING id"
    )
}

/// SQLite-backed store of survey observations
pub struct ObservationStore {
    db: SqliteDatabase,
}

impl ObservationStore {
    /// Open or create the store at `path` and apply the schema
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_database(SqliteDatabase::open(path)?)
    }

    /// In-memory store for tests
    pub fn open_in_memory() -> Result<Self> {
        Self::with_database(SqliteDatabase::open_in_memory()?)
    }

    pub fn with_database(db: SqliteDatabase) -> Result<Self> {
        let store = Self { db };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create the observation table and its indexes if absent.
    ///
    /// Never drops or alters existing data.
    pub fn ensure_schema(&self) -> Result<()> {
        self.db.execute_batch(&format!(
            r#"
            CREATE TABLE IF NOT EXISTS {TABLE} (
                id INTEGER PRIMARY KEY NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                ssid VARCHAR(32),
                encryption VARCHAR(32),
                rssi INT,
                bssid VARCHAR(20) NOT NULL,
                channel INT
            );

            CREATE INDEX IF NOT EXISTS idx_{TABLE}_bssid ON {TABLE}(bssid);
            CREATE INDEX IF NOT EXISTS idx_{TABLE}_position ON {TABLE}(latitude, longitude);
            "#
        ))?;
        Ok(())
    }

    /// Reopen the underlying connection and re-apply the schema
    pub fn reconnect(&mut self) -> Result<()> {
        self.db.reconnect()?;
        self.ensure_schema()
    }

    /// Append one observation and return its id.
    ///
    /// Does not look for an existing row with the same `bssid`.
    pub fn insert(&self, observation: &Observation) -> Result<i64> {
        insert_row(self.db.connection(), observation)
    }

    /// Append observations atomically; either all rows land or none do
    pub fn insert_batch(&mut self, observations: &[Observation]) -> Result<Vec<i64>> {
        let tx = self.db.connection_mut().transaction()?;
        let ids = observations
            .iter()
            .map(|obs| insert_row(&tx, obs))
            .collect::<Result<Vec<_>>>()?;
        tx.commit()?;
        Ok(ids)
    }

    /// Rows matching an arbitrary predicate combination
    pub fn select(&self, query: &ObservationQuery) -> Result<Vec<StoredObservation>> {
        let Statement { sql, params } = query.select();
        let mut stmt = self.db.connection().prepare(&sql)?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), decode_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_matching(&self, query: &ObservationQuery) -> Result<usize> {
        let Statement { sql, params } = query.count();
        let count: i64 = self
            .db
            .connection()
            .query_row(&sql, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn query_all(&self, viewport: Option<&Viewport>) -> Result<Vec<StoredObservation>> {
        self.select(&ObservationQuery::new().within(viewport))
    }

    pub fn query_by_encryption(
        &self,
        class: EncryptionClass,
        viewport: Option<&Viewport>,
    ) -> Result<Vec<StoredObservation>> {
        self.select(&ObservationQuery::new().encryption(class).within(viewport))
    }

    pub fn count(&self, viewport: Option<&Viewport>) -> Result<usize> {
        self.count_matching(&ObservationQuery::new().within(viewport))
    }

    /// Collapse every `bssid` to its strongest observation.
    ///
    /// Returns the number of rows deleted. See [`dedupe`] for tie-breaking.
    pub fn dedupe(&mut self) -> Result<usize> {
        let removed = dedupe::remove_weaker_duplicates(self.db.connection_mut())?;
        tracing::info!(removed, "deduplication pass complete");
        Ok(removed)
    }

    /// Rows that the next dedupe pass would remove
    pub fn pending_duplicates(&self) -> Result<usize> {
        dedupe::duplicate_rows(self.db.connection())
    }

    pub fn database(&self) -> &SqliteDatabase {
        &self.db
    }
}

fn insert_row(conn: &Connection, observation: &Observation) -> Result<i64> {
    let id = conn.query_row(
        &insert_sql(),
        params![
            observation.latitude,
            observation.longitude,
            &observation.ssid,
            &observation.encryption,
            observation.rssi,
            &observation.bssid,
            observation.channel,
        ],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Decode a row selected with [`crate::query::filter::COLUMNS`]
fn decode_row(row: &Row<'_>) -> rusqlite::Result<StoredObservation> {
    Ok(StoredObservation {
        id: row.get(0)?,
        observation: Observation {
            bssid: row.get(1)?,
            ssid: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
            encryption: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            rssi: row.get::<_, Option<i32>>(4)?.unwrap_or(UNKNOWN_RSSI),
            channel: row.get::<_, Option<i32>>(5)?.unwrap_or_default(),
            latitude: row.get(6)?,
            longitude: row.get(7)?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;
    use crate::types::Coordinate;
    use tempfile::TempDir;

    fn obs(line: &str) -> Observation {
        parse_line(line).expect("valid line")
    }

    #[test]
    fn test_store_creation() -> Result<()> {
        let store = ObservationStore::open_in_memory()?;
        assert_eq!(store.count(None)?, 0);
        Ok(())
    }

    #[test]
    fn test_insert_roundtrip() -> Result<()> {
        let store = ObservationStore::open_in_memory()?;
        let observation = obs("AA:BB;net1;OPEN;-40;6;10.0;20.0");

        let id = store.insert(&observation)?;
        let rows = store.query_all(None)?;

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, id);
        assert_eq!(rows[0].observation, observation);
        Ok(())
    }

    #[test]
    fn test_insert_allows_duplicate_bssid() -> Result<()> {
        let store = ObservationStore::open_in_memory()?;
        let a = store.insert(&obs("AA:BB;net1;OPEN;-40;6;10.0;20.0"))?;
        let b = store.insert(&obs("AA:BB;net1;OPEN;-40;6;10.0;20.0"))?;
        assert_ne!(a, b);
        assert_eq!(store.count(None)?, 2);
        assert_eq!(store.pending_duplicates()?, 1);
        Ok(())
    }

    #[test]
    fn test_insert_batch() -> Result<()> {
        let mut store = ObservationStore::open_in_memory()?;
        let ids = store.insert_batch(&[
            obs("AA:BB;net1;OPEN;-40;6;10.0;20.0"),
            obs("CC:DD;net2;WEP;-60;1;11.0;21.0"),
        ])?;
        assert_eq!(ids.len(), 2);
        assert!(ids[0] < ids[1]);
        assert_eq!(store.count(None)?, 2);

        assert!(store.insert_batch(&[])?.is_empty());
        Ok(())
    }

    #[test]
    fn test_schema_is_idempotent_and_survives_reopen() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("Database").join("warwalking.sqlite3");
        {
            let store = ObservationStore::open(&path)?;
            store.insert(&obs("AA:BB;net1;OPEN;-40;6;10.0;20.0"))?;
            store.ensure_schema()?;
            assert_eq!(store.count(None)?, 1);
        }

        let mut store = ObservationStore::open(&path)?;
        assert_eq!(store.count(None)?, 1);
        store.reconnect()?;
        assert_eq!(store.count(None)?, 1);
        Ok(())
    }

    #[test]
    fn test_opens_existing_survey_database() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("warwalking.sqlite3");
        {
            let conn = Connection::open(&path)?;
            conn.execute_batch(
                "CREATE TABLE warwalking (
                    id INTEGER PRIMARY KEY NOT NULL ,
                    latitude REAL NOT NULL,
                    longitude REAL NOT NULL,
                    ssid VARCHAR(32),
                    encryption VARCHAR(32),
                    rssi INT,
                    bssid VARCHAR(20) NOT NULL,
                    channel INT
                );
                INSERT INTO warwalking (latitude, longitude, ssid, encryption, rssi, bssid, channel)
                    VALUES (48.2, 16.3, 'home', 'WEP', -70, 'AA:BB', 1);
                INSERT INTO warwalking (latitude, longitude, ssid, encryption, rssi, bssid, channel)
                    VALUES (48.3, 16.4, 'cafe', 'OPEN', -55, 'CC:DD', 6);",
            )?;
        }

        let mut store = ObservationStore::open(&path)?;
        assert_eq!(store.count(None)?, 2);
        assert_eq!(store.query_by_encryption(EncryptionClass::Wep, None)?[0].observation.ssid, "home");

        store.insert(&obs("AA:BB;home;WEP;-40;1;48.2;16.3"))?;
        assert_eq!(store.dedupe()?, 1);
        let rows = store.query_all(None)?;
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().any(|r| r.observation.bssid == "AA:BB" && r.observation.rssi == -40));
        Ok(())
    }

    #[test]
    fn test_viewport_filter_and_encryption_filter() -> Result<()> {
        let store = ObservationStore::open_in_memory()?;
        store.insert(&obs("01;a;WEP;-50;1;10.0;20.0"))?;
        store.insert(&obs("02;b;OPEN;-50;1;10.0;20.0"))?;
        store.insert(&obs("03;c;WEP;-50;1;50.0;60.0"))?;

        let vp = Viewport::new(Coordinate::new(10.0, 20.0), Coordinate::new(10.0, 20.0));
        assert_eq!(store.count(Some(&vp))?, 2);

        let wep = store.query_by_encryption(EncryptionClass::Wep, Some(&vp))?;
        assert_eq!(wep.len(), 1);
        assert_eq!(wep[0].observation.bssid, "01");

        let all_wep = store.query_by_encryption(EncryptionClass::Wep, None)?;
        assert_eq!(all_wep.len(), 2);
        Ok(())
    }

    #[test]
    fn test_null_columns_decode_to_defaults() -> Result<()> {
        let store = ObservationStore::open_in_memory()?;
        store.database().execute(
            "INSERT INTO warwalking (latitude, longitude, bssid) VALUES (?1, ?2, ?3)",
            &[&1.5, &2.5, &"EE:FF"],
        )?;

        let rows = store.query_all(None)?;
        assert_eq!(rows[0].observation.ssid, "");
        assert_eq!(rows[0].observation.rssi, UNKNOWN_RSSI);
        assert_eq!(rows[0].observation.encryption_class(), EncryptionClass::Other);

        let other = store.query_by_encryption(EncryptionClass::Other, None)?;
        assert_eq!(other.len(), 1);
        Ok(())
    }
}
