//! Protocol Module
//!
//! Defines the wire protocol for client-server communication.
//!
//! ## Protocol Format (V1 - Framed bincode)
//!
//! ### Request Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │ Cmd (1)  │ Len (4)  │   Payload (bincode Command) │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Commands
//! - 0x01: LIST    - all plants, id order
//! - 0x02: GET     - one plant by id
//! - 0x03: CREATE  - insert fields, returns new id
//! - 0x04: UPDATE  - overwrite fields of an id
//! - 0x05: DELETE  - remove by id
//! - 0x06: IMPORT  - reconcile a snapshot
//! - 0x07: EXPORT  - snapshot rows of the whole table
//! - 0x08: PING
//!
//! ### Response Format
//! ```text
//! ┌──────────┬──────────┬─────────────────────────────┐
//! │Status(1) │ Len (4)  │         Payload             │
//! └──────────┴──────────┴─────────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 0x00: OK        - payload is a bincode `Reply`
//! - 0x01: NOT_FOUND - empty payload
//! - 0x02: ERROR     - payload is a UTF-8 message

mod command;
mod response;
mod codec;

pub use command::{Command, CommandType};
pub use response::{Reply, Response, Status};
pub use codec::{
    decode_command, decode_response, encode_command, encode_response, read_command,
    read_response, write_command, write_response, HEADER_SIZE, MAX_PAYLOAD_SIZE,
};
