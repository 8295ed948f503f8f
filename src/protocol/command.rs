//! Command definitions
//!
//! Represents commands from clients.

use serde::{Deserialize, Serialize};

use crate::record::{PlantFields, SnapshotRow};

/// Command types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CommandType {
    List = 0x01,
    Get = 0x02,
    Create = 0x03,
    Update = 0x04,
    Delete = 0x05,
    Import = 0x06,
    Export = 0x07,
    Ping = 0x08,
}

impl CommandType {
    /// Parse a command type byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(CommandType::List),
            0x02 => Some(CommandType::Get),
            0x03 => Some(CommandType::Create),
            0x04 => Some(CommandType::Update),
            0x05 => Some(CommandType::Delete),
            0x06 => Some(CommandType::Import),
            0x07 => Some(CommandType::Export),
            0x08 => Some(CommandType::Ping),
            _ => None,
        }
    }
}

/// A parsed command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// List every plant
    List,

    /// Get a plant by id
    Get { id: i64 },

    /// Create a plant
    Create { fields: PlantFields },

    /// Overwrite the fields of a plant
    Update { id: i64, fields: PlantFields },

    /// Delete a plant
    Delete { id: i64 },

    /// Reconcile the table against a full snapshot
    Import { rows: Vec<SnapshotRow> },

    /// Dump the table as snapshot rows
    Export,

    /// Ping (health check)
    Ping,
}

impl Command {
    /// Get the command type
    pub fn command_type(&self) -> CommandType {
        match self {
            Command::List => CommandType::List,
            Command::Get { .. } => CommandType::Get,
            Command::Create { .. } => CommandType::Create,
            Command::Update { .. } => CommandType::Update,
            Command::Delete { .. } => CommandType::Delete,
            Command::Import { .. } => CommandType::Import,
            Command::Export => CommandType::Export,
            Command::Ping => CommandType::Ping,
        }
    }
}
