//! Snapshot Differ
//!
//! Decides which stored records survive a reconciliation.

use std::collections::BTreeSet;

use crate::record::SnapshotRow;

/// Positive ids referenced by the snapshot, deduplicated.
///
/// Only rows carrying an explicit positive id count as references to existing
/// records. A snapshot without any such row yields an empty set, which the
/// store treats as "delete everything".
pub fn keep_ids(rows: &[SnapshotRow]) -> BTreeSet<i64> {
    rows.iter().filter_map(SnapshotRow::positive_id).collect()
}
