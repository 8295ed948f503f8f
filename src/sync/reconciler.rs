//! Reconciler
//!
//! Applies a snapshot to a store inside a single transaction.

use chrono::Utc;

use crate::error::Result;
use crate::record::{SnapshotRow, SyncReport};
use crate::store::{PlantStore, PlantTx};

use super::differ::keep_ids;

/// Make the store match `rows`.
///
/// 1. Delete every record whose id no row references.
/// 2. For each row in order, update the record it names; if it names none
///    (no id, or an id the store never had), insert it under a fresh id.
///
/// Duplicate ids are each applied in turn, so the last row wins and every
/// occurrence counts as an update. Any storage error rolls the whole run back
/// and is returned without counts.
pub fn reconcile<S: PlantStore>(store: &S, rows: &[SnapshotRow]) -> Result<SyncReport> {
    let keep = keep_ids(rows);

    let report = store.run_in_transaction(|tx| {
        let mut report = SyncReport {
            deleted: tx.delete_where_id_not_in(&keep)?,
            ..SyncReport::default()
        };

        for row in rows {
            if apply_row(tx, row)? {
                report.updated += 1;
            } else {
                report.created += 1;
            }
        }

        Ok(report)
    })?;

    tracing::info!(
        updated = report.updated,
        created = report.created,
        deleted = report.deleted,
        "Snapshot reconciled ({} rows)",
        rows.len()
    );

    Ok(report)
}

/// Returns `true` when the row updated an existing record, `false` when it
/// was inserted.
fn apply_row(tx: &mut dyn PlantTx, row: &SnapshotRow) -> Result<bool> {
    let fields = row.fields();

    if let Some(id) = row.positive_id() {
        if tx.update(id, &fields)? > 0 {
            return Ok(true);
        }
        // The id was never valid; keep the row as a new record
        tracing::debug!("Snapshot row id {} matches no plant, inserting", id);
    }

    tx.insert(&fields, Utc::now())?;
    Ok(false)
}
