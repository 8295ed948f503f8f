//! In-memory Store
//!
//! [`PlantStore`] over a `BTreeMap`, with the same constraints and id
//! assignment as the SQLite table.
//!
//! Transactions mutate the shared table in place and keep an undo log. A unit
//! of work that fails or panics has its changes replayed backwards before the
//! lock is released.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use crate::error::{GardenError, Result};
use crate::record::{Plant, PlantFields};

use super::{PlantStore, PlantTx};

#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<i64, Plant>,

    /// Highest id ever handed out; ids are never reused
    last_id: i64,
}

/// Plant store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored
    pub fn len(&self) -> usize {
        self.table.lock().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PlantStore for MemoryStore {
    fn list_all(&self) -> Result<Vec<Plant>> {
        Ok(self.table.lock().rows.values().cloned().collect())
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Plant>> {
        Ok(self.table.lock().rows.get(&id).cloned())
    }

    fn run_in_transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut dyn PlantTx) -> Result<T>,
    {
        let mut table = self.table.lock();
        let mut tx = MemoryTx::begin(&mut table);

        let value = work(&mut tx)?;

        tx.commit();
        Ok(value)
    }
}

/// One step needed to undo a change
#[derive(Debug)]
enum Undo {
    /// Drop a row the transaction inserted
    Remove(i64),

    /// Put back a row as it was before an update or delete
    Restore(Plant),
}

/// Transaction handle; rolls back on drop unless committed
struct MemoryTx<'a> {
    table: &'a mut Table,
    undo: Vec<Undo>,
    last_id: i64,
    committed: bool,
}

impl<'a> MemoryTx<'a> {
    fn begin(table: &'a mut Table) -> Self {
        let last_id = table.last_id;
        Self {
            table,
            undo: Vec::new(),
            last_id,
            committed: false,
        }
    }

    fn commit(mut self) {
        self.committed = true;
    }

    fn rollback(&mut self) {
        while let Some(step) = self.undo.pop() {
            match step {
                Undo::Remove(id) => {
                    self.table.rows.remove(&id);
                }
                Undo::Restore(plant) => {
                    self.table.rows.insert(plant.id, plant);
                }
            }
        }
        self.table.last_id = self.last_id;
    }
}

impl Drop for MemoryTx<'_> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!("Rolling back {} change(s)", self.undo.len());
            self.rollback();
        }
    }
}

impl PlantTx for MemoryTx<'_> {
    fn list_all(&mut self) -> Result<Vec<Plant>> {
        Ok(self.table.rows.values().cloned().collect())
    }

    fn get_by_id(&mut self, id: i64) -> Result<Option<Plant>> {
        Ok(self.table.rows.get(&id).cloned())
    }

    fn insert(&mut self, fields: &PlantFields, last_updated: DateTime<Utc>) -> Result<i64> {
        check_constraints(fields)?;

        self.table.last_id += 1;
        let id = self.table.last_id;
        self.table.rows.insert(
            id,
            Plant {
                id,
                name: fields.name.clone(),
                location: fields.location.clone(),
                required_humidity: fields.required_humidity,
                last_updated,
            },
        );
        self.undo.push(Undo::Remove(id));
        Ok(id)
    }

    fn update(&mut self, id: i64, fields: &PlantFields) -> Result<usize> {
        let Some(plant) = self.table.rows.get_mut(&id) else {
            return Ok(0);
        };
        check_constraints(fields)?;

        self.undo.push(Undo::Restore(plant.clone()));
        plant.name = fields.name.clone();
        plant.location = fields.location.clone();
        plant.required_humidity = fields.required_humidity;
        Ok(1)
    }

    fn delete(&mut self, id: i64) -> Result<usize> {
        match self.table.rows.remove(&id) {
            Some(plant) => {
                self.undo.push(Undo::Restore(plant));
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn delete_where_id_not_in(&mut self, keep_ids: &BTreeSet<i64>) -> Result<usize> {
        let doomed: Vec<i64> = self
            .table
            .rows
            .keys()
            .filter(|id| !keep_ids.contains(id))
            .copied()
            .collect();

        for id in &doomed {
            if let Some(plant) = self.table.rows.remove(id) {
                self.undo.push(Undo::Restore(plant));
            }
        }
        Ok(doomed.len())
    }
}

/// Mirrors the CHECK constraints of the SQLite table
fn check_constraints(fields: &PlantFields) -> Result<()> {
    if fields.name.is_empty() {
        return Err(GardenError::ConstraintViolation(
            "CHECK constraint failed: plants.name must not be empty".to_string(),
        ));
    }
    if fields.location.is_empty() {
        return Err(GardenError::ConstraintViolation(
            "CHECK constraint failed: plants.location must not be empty".to_string(),
        ));
    }
    // SQLite binds NaN as NULL
    if fields.required_humidity.is_nan() {
        return Err(GardenError::ConstraintViolation(
            "NOT NULL constraint failed: plants.required_humidity".to_string(),
        ));
    }
    Ok(())
}
