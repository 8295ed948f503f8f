//! Tests for the TCP server and client
//!
//! These tests verify:
//! - Client/server round trips for every command
//! - NotFound and error replies surface correctly on the client
//! - Several clients served concurrently by the worker pool
//! - Graceful shutdown

use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use gardensync::network::{Client, Server, ShutdownHandle};
use gardensync::protocol::read_response;
use gardensync::protocol::Status;
use gardensync::{Config, Engine, GardenError, MemoryStore, PlantFields, SnapshotRow, SqliteStore};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

struct TestServer {
    addr: SocketAddr,
    shutdown: ShutdownHandle,
    thread: JoinHandle<gardensync::Result<()>>,
}

impl TestServer {
    fn stop(self) {
        self.shutdown.shutdown();
        self.thread.join().unwrap().unwrap();
    }
}

fn test_config() -> Config {
    Config::builder()
        .listen_addr("127.0.0.1:0")
        .worker_threads(4)
        .max_connections(16)
        .read_timeout_ms(2000)
        .write_timeout_ms(2000)
        .build()
}

fn start_memory_server() -> TestServer {
    let config = test_config();
    let engine = Arc::new(Engine::with_store(config.clone(), MemoryStore::new()));
    start(Server::bind(config, engine).unwrap())
}

fn start_sqlite_server(dir: &TempDir) -> TestServer {
    let mut config = test_config();
    config.db_path = dir.path().join("garden.db");
    let engine = Arc::new(Engine::with_store(
        config.clone(),
        SqliteStore::open(&config).unwrap(),
    ));
    start(Server::bind(config, engine).unwrap())
}

fn start<S: gardensync::PlantStore + 'static>(server: Server<S>) -> TestServer {
    let addr = server.local_addr().unwrap();
    let shutdown = server.shutdown_handle();
    let thread = thread::spawn(move || server.run());
    TestServer {
        addr,
        shutdown,
        thread,
    }
}

// =============================================================================
// Round Trip Tests
// =============================================================================

#[test]
fn test_ping() {
    let server = start_memory_server();

    {
        let mut client = Client::connect(server.addr).unwrap();
        client.ping().unwrap();
    }

    server.stop();
}

#[test]
fn test_crud_round_trip() {
    let server = start_memory_server();

    {
        let mut client = Client::connect(server.addr).unwrap();

        let id = client.create(PlantFields::new("Tomato", "Bed 1", 60.0)).unwrap();
        assert_eq!(id, 1);

        let plant = client.get(id).unwrap().unwrap();
        assert_eq!(plant.name, "Tomato");

        assert!(client.update(id, PlantFields::new("Basil", "Bed 2", 45.0)).unwrap());
        assert!(!client.update(99, PlantFields::new("Ghost", "None", 0.0)).unwrap());
        assert_eq!(client.list().unwrap()[0].name, "Basil");

        assert!(client.delete(id).unwrap());
        assert!(!client.delete(id).unwrap());
        assert!(client.get(id).unwrap().is_none());
    }

    server.stop();
}

#[test]
fn test_import_export_over_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let server = start_sqlite_server(&temp_dir);

    {
        let mut client = Client::connect(server.addr).unwrap();
        for name in ["a", "b", "c"] {
            client.create(PlantFields::new(name, "Bed", 1.0)).unwrap();
        }

        let report = client
            .import(vec![
                SnapshotRow::new(Some(1), "A", "Bed", 1.0),
                SnapshotRow::new(Some(5), "B", "Bed", 2.0),
                SnapshotRow::new(None, "C", "Bed", 3.0),
            ])
            .unwrap();

        assert_eq!((report.updated, report.created, report.deleted), (1, 2, 2));

        let exported = client.export().unwrap();
        let ids: Vec<_> = exported.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![Some(1), Some(4), Some(5)]);
    }

    server.stop();
}

#[test]
fn test_storage_error_reaches_client() {
    let server = start_memory_server();

    {
        let mut client = Client::connect(server.addr).unwrap();
        let result = client.create(PlantFields::new("", "Bed", 1.0));

        match result {
            Err(GardenError::Network(msg)) => assert!(msg.contains("Constraint")),
            other => panic!("Expected server error, got {:?}", other),
        }

        // The connection survives a failed command
        client.ping().unwrap();
    }

    server.stop();
}

#[test]
fn test_garbage_frame_gets_error_response() {
    let server = start_memory_server();

    {
        let mut stream = TcpStream::connect(server.addr).unwrap();
        stream.write_all(&[0xEE, 0, 0, 0, 0]).unwrap();

        let response = read_response(&mut stream).unwrap();
        assert_eq!(response.status, Status::Error);
    }

    server.stop();
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_many_clients() {
    let server = start_memory_server();
    let addr = server.addr;

    let handles: Vec<_> = (0..8)
        .map(|t| {
            thread::spawn(move || {
                let mut client = Client::connect(addr).unwrap();
                for i in 0..10 {
                    let name = format!("c{}-{}", t, i);
                    client.create(PlantFields::new(name, "Bed", 1.0)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    {
        let mut client = Client::connect(addr).unwrap();
        assert_eq!(client.list().unwrap().len(), 80);
    }

    server.stop();
}

#[test]
fn test_shutdown_without_clients() {
    let server = start_memory_server();
    server.stop();
}
