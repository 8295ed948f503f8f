//! Record Types
//!
//! The managed record (`Plant`), its mutable field set, and the snapshot rows
//! handed over by an external spreadsheet parser.
//!
//! ## Normalization
//! ```text
//!   RawRow (cells as parsed)          SnapshotRow (ready to reconcile)
//!   ┌──────────┬──────────────┐       ┌──────────┬──────────────────┐
//!   │ id       │ Int/Text/... │ ───▶  │ id       │ Some(n > 0)/None │
//!   │ name     │ blank?       │ ───▶  │ name     │ "Unnamed"        │
//!   │ location │ blank?       │ ───▶  │ location │ "Unknown"        │
//!   │ required │ Float/Int    │ ───▶  │ required │ f64 (0.0)        │
//!   └──────────┴──────────────┘       └──────────┴──────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Name given to snapshot rows with a blank name cell
pub const DEFAULT_NAME: &str = "Unnamed";

/// Location given to snapshot rows with a blank location cell
pub const DEFAULT_LOCATION: &str = "Unknown";

/// A persisted plant record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    /// Store-assigned identity, always >= 1
    pub id: i64,

    pub name: String,

    pub location: String,

    /// Required humidity level
    pub required_humidity: f64,

    /// Set by the store on creation; updates leave it untouched
    pub last_updated: DateTime<Utc>,
}

impl Plant {
    /// The mutable fields of this record
    pub fn fields(&self) -> PlantFields {
        PlantFields {
            name: self.name.clone(),
            location: self.location.clone(),
            required_humidity: self.required_humidity,
        }
    }
}

/// The caller-controlled part of a plant: everything except id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantFields {
    pub name: String,
    pub location: String,
    pub required_humidity: f64,
}

impl PlantFields {
    pub fn new(name: impl Into<String>, location: impl Into<String>, required_humidity: f64) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
            required_humidity,
        }
    }
}

/// One row of an incoming snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Claims to reference an existing record when positive
    pub id: Option<i64>,

    pub name: String,

    pub location: String,

    pub required_humidity: f64,
}

impl SnapshotRow {
    /// Build a row as-is. Use [`RawRow::normalize`] for parser output.
    pub fn new(
        id: Option<i64>,
        name: impl Into<String>,
        location: impl Into<String>,
        required_humidity: f64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location: location.into(),
            required_humidity,
        }
    }

    /// The id, if it is plausible enough to reference an existing record
    pub fn positive_id(&self) -> Option<i64> {
        self.id.filter(|&id| id > 0)
    }

    pub fn fields(&self) -> PlantFields {
        PlantFields {
            name: self.name.clone(),
            location: self.location.clone(),
            required_humidity: self.required_humidity,
        }
    }
}

impl From<&Plant> for SnapshotRow {
    fn from(plant: &Plant) -> Self {
        Self {
            id: Some(plant.id),
            name: plant.name.clone(),
            location: plant.location.clone(),
            required_humidity: plant.required_humidity,
        }
    }
}

/// A single spreadsheet cell as seen by the parser
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Interpret the cell as a record id. Fractional numbers are not ids.
    pub fn as_id(&self) -> Option<i64> {
        match self {
            CellValue::Empty => None,
            CellValue::Int(n) => Some(*n),
            // Whole floats outside the i64 range would saturate
            CellValue::Float(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                Some(*f as i64)
            }
            CellValue::Float(_) => None,
            CellValue::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Interpret the cell as a finite number, accepting integer and float cells.
    /// `NaN` and infinities are not numbers here.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Empty => None,
            CellValue::Int(n) => Some(*n as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(s) => s.trim().parse().ok(),
        };
        value.filter(|f| f.is_finite())
    }

    /// Interpret the cell as non-blank text
    pub fn as_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// A row exactly as the external parser read it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub id: CellValue,
    pub name: CellValue,
    pub location: CellValue,
    pub required_humidity: CellValue,
}

impl RawRow {
    /// Apply the snapshot defaults and drop implausible ids
    pub fn normalize(&self) -> SnapshotRow {
        SnapshotRow {
            id: self.id.as_id().filter(|&id| id > 0),
            name: self.name.as_text().unwrap_or_else(|| DEFAULT_NAME.to_string()),
            location: self
                .location
                .as_text()
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            required_humidity: self.required_humidity.as_f64().unwrap_or(0.0),
        }
    }
}

/// Outcome counts of one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncReport {
    pub updated: usize,
    pub created: usize,
    pub deleted: usize,
}
