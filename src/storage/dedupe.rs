//! Strongest-signal-wins deduplication
//!
//! Every `bssid` keeps exactly one row: the one with the highest `rssi`.
//! When several rows share that maximum, the lowest `id` (first inserted)
//! survives. Rows with a NULL `rssi` rank below every measured signal.
//!
//! The pass is a full-table rewrite inside one transaction, so running it
//! again without new inserts deletes nothing.

use crate::error::Result;
use crate::query::filter::TABLE;
use rusqlite::Connection;

/// Delete every row that is not the best observation of its `bssid`.
///
/// Returns the number of rows removed.
pub fn remove_weaker_duplicates(conn: &mut Connection) -> Result<usize> {
    let tx = conn.transaction()?;
    let removed = tx.execute(
        &format!(
            r#"
            DELETE FROM {TABLE}
            WHERE id IN (
                SELECT id FROM (
                    SELECT
                        id,
                        ROW_NUMBER() OVER (
                            PARTITION BY bssid
                            ORDER BY rssi IS NULL, rssi DESC, id ASC
                        ) AS signal_rank
                    FROM {TABLE}
                )
                WHERE signal_rank > 1
            )
            "#
        ),
        [],
    )?;
    tx.commit()?;

    Ok(removed)
}

/// Rows that a dedupe pass would currently remove
pub fn duplicate_rows(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row(
        &format!("SELECT COUNT(*) - COUNT(DISTINCT bssid) FROM {TABLE}"),
        [],
        |row| row.get(0),
    )?;
    Ok(count as usize)
}
