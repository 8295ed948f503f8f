//! Sync Module
//!
//! Reconciles a full external snapshot against the plant store.
//!
//! ## Flow
//! ```text
//!   rows ──▶ differ::keep_ids ──▶ keep = {positive ids}
//!                                      │
//!   ┌──────────────── one transaction ─▼───────────────────┐
//!   │ deleted = delete_where_id_not_in(keep)               │
//!   │ for row in rows:                                      │
//!   │     id > 0 && update(id) == 1  → updated += 1        │
//!   │     otherwise                  → insert, created += 1│
//!   └───────────────────────────── commit ─────────────────┘
//! ```
//!
//! Either the whole snapshot is applied or nothing is.

mod differ;
mod reconciler;

pub use differ::keep_ids;
pub use reconciler::reconcile;
