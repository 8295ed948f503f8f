//! Client
//!
//! Blocking client for the GardenSync protocol.

use std::io::{BufReader, BufWriter};
use std::net::{TcpStream, ToSocketAddrs};

use crate::error::{GardenError, Result};
use crate::protocol::{read_response, write_command, Command, Reply};
use crate::record::{Plant, PlantFields, SnapshotRow, SyncReport};

/// A connection to a GardenSync server
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: BufWriter<TcpStream>,
}

impl Client {
    /// Connect to a server
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .map_err(|e| GardenError::Network(format!("Failed to connect: {}", e)))?;
        stream.set_nodelay(true)?;

        Ok(Self {
            reader: BufReader::new(stream.try_clone()?),
            writer: BufWriter::new(stream),
        })
    }

    /// Send one command and wait for its reply
    pub fn request(&mut self, command: &Command) -> Result<Reply> {
        write_command(&mut self.writer, command)?;
        read_response(&mut self.reader)?.into_reply()
    }

    pub fn list(&mut self) -> Result<Vec<Plant>> {
        match self.request(&Command::List)? {
            Reply::Plants(plants) => Ok(plants),
            other => Err(unexpected(other)),
        }
    }

    /// Fetch a plant, `None` if the id is unknown
    pub fn get(&mut self, id: i64) -> Result<Option<Plant>> {
        match self.request(&Command::Get { id }) {
            Ok(Reply::Plant(plant)) => Ok(Some(plant)),
            Ok(other) => Err(unexpected(other)),
            Err(GardenError::NotFound) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Create a plant and return its id
    pub fn create(&mut self, fields: PlantFields) -> Result<i64> {
        match self.request(&Command::Create { fields })? {
            Reply::Created { id } => Ok(id),
            other => Err(unexpected(other)),
        }
    }

    /// Overwrite a plant's fields. Returns `false` if the id is unknown.
    pub fn update(&mut self, id: i64, fields: PlantFields) -> Result<bool> {
        self.affected(&Command::Update { id, fields })
    }

    /// Delete a plant. Returns `false` if the id is unknown.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        self.affected(&Command::Delete { id })
    }

    /// Reconcile the server's table against a full snapshot
    pub fn import(&mut self, rows: Vec<SnapshotRow>) -> Result<SyncReport> {
        match self.request(&Command::Import { rows })? {
            Reply::Synced(report) => Ok(report),
            other => Err(unexpected(other)),
        }
    }

    pub fn export(&mut self) -> Result<Vec<SnapshotRow>> {
        match self.request(&Command::Export)? {
            Reply::Rows(rows) => Ok(rows),
            other => Err(unexpected(other)),
        }
    }

    pub fn ping(&mut self) -> Result<()> {
        match self.request(&Command::Ping)? {
            Reply::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    fn affected(&mut self, command: &Command) -> Result<bool> {
        match self.request(command) {
            Ok(Reply::Affected(n)) => Ok(n > 0),
            Ok(other) => Err(unexpected(other)),
            Err(GardenError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

fn unexpected(reply: Reply) -> GardenError {
    GardenError::Protocol(format!("Unexpected reply: {:?}", reply))
}
