//! Engine Module
//!
//! Coordinates the plant store and the snapshot reconciler.
//!
//! ## Responsibilities
//! - Own the configured store
//! - Route protocol commands to store operations
//! - Run snapshot imports through the reconciler
//! - Produce exports that can be imported back unchanged

use std::path::Path;

use crate::config::Config;
use crate::error::{GardenError, Result};
use crate::protocol::{Command, Reply};
use crate::record::{Plant, PlantFields, SnapshotRow, SyncReport};
use crate::store::{PlantStore, SqliteStore};
use crate::sync;

/// The garden engine
///
/// ## Concurrency
/// All methods take `&self`; share the engine across worker threads with
/// `Arc`. Isolation between concurrent calls comes from the store, which
/// serializes transactions. The engine holds no mutable state of its own.
pub struct Engine<S: PlantStore = SqliteStore> {
    /// Engine configuration
    config: Config,

    /// Owner of all plant records
    store: S,
}

impl Engine<SqliteStore> {
    /// Open or create the SQLite database named by the config
    pub fn open(config: Config) -> Result<Self> {
        let store = SqliteStore::open(&config)?;
        Ok(Self::with_store(config, store))
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database file
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().db_path(path).build())
    }
}

impl<S: PlantStore> Engine<S> {
    /// Wrap an already configured store
    pub fn with_store(config: Config, store: S) -> Self {
        Self { config, store }
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers. A command addressing an id
    /// that does not exist fails with [`GardenError::NotFound`].
    pub fn execute(&self, command: Command) -> Result<Reply> {
        match command {
            Command::List => Ok(Reply::Plants(self.list()?)),
            Command::Get { id } => self.get(id)?.map(Reply::Plant).ok_or(GardenError::NotFound),
            Command::Create { fields } => {
                let id = self.create(&fields)?;
                Ok(Reply::Created { id })
            }
            Command::Update { id, fields } => match self.update(id, &fields)? {
                0 => Err(GardenError::NotFound),
                n => Ok(Reply::Affected(n)),
            },
            Command::Delete { id } => match self.delete(id)? {
                0 => Err(GardenError::NotFound),
                n => Ok(Reply::Affected(n)),
            },
            Command::Import { rows } => Ok(Reply::Synced(self.import(&rows)?)),
            Command::Export => Ok(Reply::Rows(self.export()?)),
            Command::Ping => Ok(Reply::Pong),
        }
    }

    /// All plants, id order
    pub fn list(&self) -> Result<Vec<Plant>> {
        self.store.list_all()
    }

    pub fn get(&self, id: i64) -> Result<Option<Plant>> {
        self.store.get_by_id(id)
    }

    /// Create a plant and return its id
    pub fn create(&self, fields: &PlantFields) -> Result<i64> {
        let id = self.store.create(fields)?;
        tracing::debug!("Created plant {}", id);
        Ok(id)
    }

    /// Overwrite a plant's fields. Returns records affected (0 or 1).
    pub fn update(&self, id: i64, fields: &PlantFields) -> Result<usize> {
        self.store.run_in_transaction(|tx| tx.update(id, fields))
    }

    /// Delete a plant. Returns records affected (0 or 1).
    pub fn delete(&self, id: i64) -> Result<usize> {
        self.store.delete(id)
    }

    /// Reconcile the table against a full snapshot
    pub fn import(&self, rows: &[SnapshotRow]) -> Result<SyncReport> {
        sync::reconcile(&self.store, rows)
    }

    /// The whole table as snapshot rows, ready to be imported again
    pub fn export(&self) -> Result<Vec<SnapshotRow>> {
        Ok(self.store.list_all()?.iter().map(SnapshotRow::from).collect())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
