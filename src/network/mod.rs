//! Network Module
//!
//! TCP server, per-connection handling, and a blocking client.
//!
//! ## Architecture
//! - Single acceptor thread (non-blocking listener polled for shutdown)
//! - Fixed worker thread pool fed over a bounded channel
//! - Commands routed through Engine

mod server;
mod connection;
mod client;

pub use server::{Server, ShutdownHandle};
pub use connection::Connection;
pub use client::Client;
