//! Store Module
//!
//! Durable keyed table of plants with transactional bulk mutation.
//!
//! ## Responsibilities
//! - Point reads (`list_all`, `get_by_id`)
//! - Point writes (`create`, `update`, `delete`)
//! - Bulk delete (`delete_where_id_not_in`)
//! - Scoped transactions: begin → work → commit, rollback on any other exit
//!
//! ## Implementations
//! - [`SqliteStore`]: production store on a single SQLite table
//! - [`MemoryStore`]: same capability set over a `BTreeMap`, for tests and tools
//!
//! ## Affected-row Counts
//! `update` and `delete` report how many records they touched (0 or 1).
//! Zero is a normal outcome, not an error: the reconciler relies on it to
//! decide between update and insert.

mod memory;
mod sqlite;

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::record::{Plant, PlantFields};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Mutation handle valid for the lifetime of one transaction
pub trait PlantTx {
    /// All records, ordered by id ascending
    fn list_all(&mut self) -> Result<Vec<Plant>>;

    fn get_by_id(&mut self, id: i64) -> Result<Option<Plant>>;

    /// Insert a new record and return its store-assigned id
    fn insert(&mut self, fields: &PlantFields, last_updated: DateTime<Utc>) -> Result<i64>;

    /// Overwrite name, location and humidity. Returns records affected.
    fn update(&mut self, id: i64, fields: &PlantFields) -> Result<usize>;

    fn delete(&mut self, id: i64) -> Result<usize>;

    /// Delete every record whose id is not in `keep_ids`.
    ///
    /// An empty `keep_ids` deletes every record.
    fn delete_where_id_not_in(&mut self, keep_ids: &BTreeSet<i64>) -> Result<usize>;
}

/// A plant table that can run atomic units of work
pub trait PlantStore: Send + Sync {
    /// All records, ordered by id ascending
    fn list_all(&self) -> Result<Vec<Plant>>;

    fn get_by_id(&self, id: i64) -> Result<Option<Plant>>;

    /// Run `work` inside one transaction.
    ///
    /// Effects become visible only when `work` returns `Ok`. An `Err` (or a
    /// panic unwinding out of `work`) discards everything it did.
    fn run_in_transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut dyn PlantTx) -> Result<T>;

    /// Insert a record stamped with the current time, returning its id
    fn create(&self, fields: &PlantFields) -> Result<i64> {
        self.run_in_transaction(|tx| tx.insert(fields, Utc::now()))
    }

    /// Update all fields except `id` and `last_updated`
    fn update(&self, plant: &Plant) -> Result<usize> {
        let fields = plant.fields();
        self.run_in_transaction(|tx| tx.update(plant.id, &fields))
    }

    fn delete(&self, id: i64) -> Result<usize> {
        self.run_in_transaction(|tx| tx.delete(id))
    }

    fn delete_where_id_not_in(&self, keep_ids: &BTreeSet<i64>) -> Result<usize> {
        self.run_in_transaction(|tx| tx.delete_where_id_not_in(keep_ids))
    }
}
