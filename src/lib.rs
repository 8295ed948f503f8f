//! # GardenSync
//!
//! A garden plant store with:
//! - SQLite persistence behind a small storage trait
//! - Atomic reconciliation of full spreadsheet snapshots
//! - Thread-pooled TCP server and blocking client
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │                (Worker Thread Pool)                          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                       Engine                                 │
//! │              (Command Routing, Export)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Sync     │          │    CRUD     │
//!   │ (Reconcile) │          │             │
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!               ┌───────────────┐
//!               │  PlantStore   │
//!               │ (SQLite / Mem)│
//!               └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod store;
pub mod sync;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{GardenError, Result};
pub use config::Config;
pub use engine::Engine;
pub use record::{Plant, PlantFields, RawRow, SnapshotRow, SyncReport};
pub use store::{MemoryStore, PlantStore, PlantTx, SqliteStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of GardenSync
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
