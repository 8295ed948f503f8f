//! Response definitions
//!
//! Represents responses to clients.

use serde::{Deserialize, Serialize};

use crate::error::{GardenError, Result};
use crate::record::{Plant, SnapshotRow, SyncReport};

/// Response status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    NotFound = 0x01,
    Error = 0x02,
}

/// Successful result of a command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Reply {
    Plants(Vec<Plant>),
    Plant(Plant),
    Created { id: i64 },
    /// Records touched by an update or delete
    Affected(usize),
    Synced(SyncReport),
    Rows(Vec<SnapshotRow>),
    Pong,
}

/// A response to send to client
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status: Status,

    /// Optional payload (encoded reply for OK, error message for ERROR)
    pub payload: Option<Vec<u8>>,
}

impl Response {
    /// Create an OK response carrying an encoded reply
    pub fn ok(reply: &Reply) -> Result<Self> {
        Ok(Self {
            status: Status::Ok,
            payload: Some(bincode::serialize(reply)?),
        })
    }

    /// Create a NOT_FOUND response
    pub fn not_found() -> Self {
        Self {
            status: Status::NotFound,
            payload: None,
        }
    }

    /// Create an ERROR response
    pub fn error(message: &str) -> Self {
        Self {
            status: Status::Error,
            payload: Some(message.as_bytes().to_vec()),
        }
    }

    /// Turn a response back into the reply or error it stands for
    pub fn into_reply(self) -> Result<Reply> {
        match self.status {
            Status::Ok => {
                let payload = self.payload.ok_or_else(|| {
                    GardenError::Protocol("OK response without a reply".to_string())
                })?;
                Ok(bincode::deserialize(&payload)?)
            }
            Status::NotFound => Err(GardenError::NotFound),
            Status::Error => {
                let message = self
                    .payload
                    .map(|p| String::from_utf8_lossy(&p).into_owned())
                    .unwrap_or_default();
                Err(GardenError::Network(format!("Server error: {}", message)))
            }
        }
    }
}
