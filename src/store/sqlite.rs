//! SQLite Store
//!
//! Production [`PlantStore`] backed by a single `plants` table.
//!
//! ## Table Layout
//! ```text
//! plants
//! ┌────────────────────┬─────────────────────────────────────┐
//! │ id                 │ INTEGER PRIMARY KEY AUTOINCREMENT   │
//! │ name               │ TEXT NOT NULL, non-empty            │
//! │ location           │ TEXT NOT NULL, non-empty            │
//! │ required_humidity  │ REAL NOT NULL                       │
//! │ last_updated       │ TEXT NOT NULL (RFC 3339, UTC)       │
//! └────────────────────┴─────────────────────────────────────┘
//! ```
//!
//! ## Concurrency
//! One connection behind a `parking_lot::Mutex`. Every transaction starts with
//! `BEGIN IMMEDIATE`, so the write lock is held from the first statement and
//! two reconciliations can never interleave, even across processes.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use crate::config::Config;
use crate::error::{GardenError, Result};
use crate::record::{Plant, PlantFields};

use super::{PlantStore, PlantTx};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS plants (
        id                INTEGER PRIMARY KEY AUTOINCREMENT,
        name              TEXT NOT NULL CHECK (length(name) > 0),
        location          TEXT NOT NULL CHECK (length(location) > 0),
        required_humidity REAL NOT NULL,
        last_updated      TEXT NOT NULL
    );
";

const SELECT_COLUMNS: &str = "SELECT id, name, location, required_humidity, last_updated FROM plants";

/// SQLite-backed plant store
pub struct SqliteStore {
    /// The only connection; the mutex serializes all access
    conn: Mutex<Connection>,

    /// Database file, `None` for in-memory databases
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Open or create the database named by the config
    pub fn open(config: &Config) -> Result<Self> {
        let path = config.db_path.as_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(unavailable)?;
        Self::init(&conn, config.busy_timeout_ms)?;

        tracing::debug!("Opened plant store at {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified database file
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().db_path(path).build();
        Self::open(&config)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        Self::init(&conn, Config::default().busy_timeout_ms)?;

        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Database file path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Apply pragmas and create the schema (idempotent)
    fn init(conn: &Connection, busy_timeout_ms: u64) -> Result<()> {
        conn.busy_timeout(Duration::from_millis(busy_timeout_ms))
            .map_err(unavailable)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(unavailable)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
    }
}

impl PlantStore for SqliteStore {
    fn list_all(&self) -> Result<Vec<Plant>> {
        let conn = self.conn.lock();
        list_all(&conn)
    }

    fn get_by_id(&self, id: i64) -> Result<Option<Plant>> {
        let conn = self.conn.lock();
        get_by_id(&conn, id)
    }

    fn run_in_transaction<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&mut dyn PlantTx) -> Result<T>,
    {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(unavailable)?;

        let value = {
            let mut handle = SqliteTx { conn: &tx };
            match work(&mut handle) {
                Ok(value) => value,
                Err(e) => {
                    // Dropping `tx` rolls back
                    tracing::debug!("Rolling back transaction: {}", e);
                    return Err(e);
                }
            }
        };

        tx.commit()?;
        Ok(value)
    }
}

/// Transaction handle; the borrowed connection is inside an open transaction
struct SqliteTx<'a> {
    conn: &'a Connection,
}

impl PlantTx for SqliteTx<'_> {
    fn list_all(&mut self) -> Result<Vec<Plant>> {
        list_all(self.conn)
    }

    fn get_by_id(&mut self, id: i64) -> Result<Option<Plant>> {
        get_by_id(self.conn, id)
    }

    fn insert(&mut self, fields: &PlantFields, last_updated: DateTime<Utc>) -> Result<i64> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO plants (name, location, required_humidity, last_updated)
             VALUES (?1, ?2, ?3, ?4)",
        )?;
        stmt.execute(params![
            fields.name,
            fields.location,
            fields.required_humidity,
            last_updated.to_rfc3339_opts(SecondsFormat::Micros, true),
        ])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&mut self, id: i64, fields: &PlantFields) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached(
            "UPDATE plants
             SET name = ?1, location = ?2, required_humidity = ?3
             WHERE id = ?4",
        )?;
        let affected = stmt.execute(params![
            fields.name,
            fields.location,
            fields.required_humidity,
            id,
        ])?;
        Ok(affected)
    }

    fn delete(&mut self, id: i64) -> Result<usize> {
        let mut stmt = self.conn.prepare_cached("DELETE FROM plants WHERE id = ?1")?;
        Ok(stmt.execute(params![id])?)
    }

    fn delete_where_id_not_in(&mut self, keep_ids: &BTreeSet<i64>) -> Result<usize> {
        if keep_ids.is_empty() {
            return Ok(self.conn.execute("DELETE FROM plants", [])?);
        }

        // The whole set travels as one JSON array parameter, so its size is
        // not bounded by SQLite's limit on bound variables
        let ids = keep_ids
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(",");

        let mut stmt = self.conn.prepare_cached(
            "DELETE FROM plants WHERE id NOT IN (SELECT value FROM json_each(?1))",
        )?;
        Ok(stmt.execute(params![format!("[{}]", ids)])?)
    }
}

// =============================================================================
// Private Helpers
// =============================================================================

fn list_all(conn: &Connection) -> Result<Vec<Plant>> {
    let mut stmt = conn.prepare_cached(&format!("{} ORDER BY id", SELECT_COLUMNS))?;
    let rows = stmt.query_map([], read_row)?;

    let mut plants = Vec::new();
    for row in rows {
        plants.push(into_plant(row?)?);
    }
    Ok(plants)
}

fn get_by_id(conn: &Connection, id: i64) -> Result<Option<Plant>> {
    let mut stmt = conn.prepare_cached(&format!("{} WHERE id = ?1", SELECT_COLUMNS))?;
    let row = stmt.query_row(params![id], read_row).optional()?;
    row.map(into_plant).transpose()
}

/// Raw column values; the timestamp is parsed outside rusqlite's row closure
type PlantRow = (i64, String, String, f64, String);

fn read_row(row: &Row<'_>) -> rusqlite::Result<PlantRow> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
}

fn into_plant((id, name, location, required_humidity, last_updated): PlantRow) -> Result<Plant> {
    let last_updated = DateTime::parse_from_rfc3339(&last_updated)
        .map_err(|e| {
            GardenError::Storage(format!(
                "plant {} has unreadable last_updated '{}': {}",
                id, last_updated, e
            ))
        })?
        .with_timezone(&Utc);

    Ok(Plant {
        id,
        name,
        location,
        required_humidity,
        last_updated,
    })
}

/// Failures while establishing a connection or transaction
fn unavailable(err: rusqlite::Error) -> GardenError {
    GardenError::StorageUnavailable(err.to_string())
}
