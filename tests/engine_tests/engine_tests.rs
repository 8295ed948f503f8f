//! Tests for Engine
//!
//! These tests verify:
//! - Opening a SQLite-backed engine from config
//! - CRUD through direct calls and through `execute`
//! - NotFound mapping for missing ids
//! - Import/export round trips
//! - Concurrent access from many threads

use std::sync::Arc;
use std::thread;

use gardensync::protocol::{Command, Reply};
use gardensync::{
    Config, Engine, GardenError, MemoryStore, PlantFields, SnapshotRow, SyncReport,
};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let config = Config::builder()
        .db_path(temp_dir.path().join("garden.db"))
        .busy_timeout_ms(2000)
        .build();
    let engine = Engine::open(config).unwrap();
    (temp_dir, engine)
}

fn memory_engine() -> Engine<MemoryStore> {
    Engine::with_store(Config::default(), MemoryStore::new())
}

fn tomato() -> PlantFields {
    PlantFields::new("Tomato", "Greenhouse A", 65.0)
}

// =============================================================================
// Open Tests
// =============================================================================

#[test]
fn test_engine_open_creates_database() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("data").join("garden.db");

    let engine = Engine::open_path(&db_path).unwrap();

    assert!(db_path.exists());
    assert_eq!(engine.config().db_path, db_path);
    assert_eq!(engine.store().path(), Some(db_path.as_path()));
}

#[test]
fn test_engine_reopen_keeps_data() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("garden.db");

    {
        let engine = Engine::open_path(&db_path).unwrap();
        engine.create(&tomato()).unwrap();
    }

    let engine = Engine::open_path(&db_path).unwrap();
    let plants = engine.list().unwrap();
    assert_eq!(plants.len(), 1);
    assert_eq!(plants[0].name, "Tomato");
}

// =============================================================================
// Direct Operation Tests
// =============================================================================

#[test]
fn test_engine_create_get() {
    let (_temp, engine) = setup_temp_engine();

    let id = engine.create(&tomato()).unwrap();
    let plant = engine.get(id).unwrap().unwrap();

    assert_eq!(plant.id, id);
    assert_eq!(plant.fields(), tomato());
}

#[test]
fn test_engine_update_and_delete_counts() {
    let (_temp, engine) = setup_temp_engine();
    let id = engine.create(&tomato()).unwrap();

    let basil = PlantFields::new("Basil", "Window", 40.0);
    assert_eq!(engine.update(id, &basil).unwrap(), 1);
    assert_eq!(engine.update(id + 100, &basil).unwrap(), 0);
    assert_eq!(engine.get(id).unwrap().unwrap().fields(), basil);

    assert_eq!(engine.delete(id).unwrap(), 1);
    assert_eq!(engine.delete(id).unwrap(), 0);
    assert!(engine.get(id).unwrap().is_none());
}

#[test]
fn test_engine_import_then_export_round_trips() {
    let (_temp, engine) = setup_temp_engine();

    let report = engine
        .import(&[
            SnapshotRow::new(None, "Tomato", "Bed 1", 60.0),
            SnapshotRow::new(None, "Basil", "Bed 2", 45.0),
        ])
        .unwrap();
    assert_eq!(report.created, 2);

    let exported = engine.export().unwrap();
    assert_eq!(
        exported,
        vec![
            SnapshotRow::new(Some(1), "Tomato", "Bed 1", 60.0),
            SnapshotRow::new(Some(2), "Basil", "Bed 2", 45.0),
        ]
    );

    // Feeding the export back changes nothing
    let before = engine.list().unwrap();
    let report = engine.import(&exported).unwrap();
    assert_eq!(
        report,
        SyncReport {
            updated: 2,
            created: 0,
            deleted: 0
        }
    );
    assert_eq!(engine.list().unwrap(), before);
}

// =============================================================================
// Command Execution Tests
// =============================================================================

#[test]
fn test_execute_crud_commands() {
    let engine = memory_engine();

    let id = match engine.execute(Command::Create { fields: tomato() }).unwrap() {
        Reply::Created { id } => id,
        other => panic!("Expected Created, got {:?}", other),
    };

    match engine.execute(Command::Get { id }).unwrap() {
        Reply::Plant(plant) => assert_eq!(plant.name, "Tomato"),
        other => panic!("Expected Plant, got {:?}", other),
    }

    let update = Command::Update {
        id,
        fields: PlantFields::new("Pepper", "Bed 4", 50.0),
    };
    assert_eq!(engine.execute(update).unwrap(), Reply::Affected(1));

    match engine.execute(Command::List).unwrap() {
        Reply::Plants(plants) => {
            assert_eq!(plants.len(), 1);
            assert_eq!(plants[0].name, "Pepper");
        }
        other => panic!("Expected Plants, got {:?}", other),
    }

    assert_eq!(engine.execute(Command::Delete { id }).unwrap(), Reply::Affected(1));
}

#[test]
fn test_execute_missing_ids_are_not_found() {
    let engine = memory_engine();

    assert!(matches!(
        engine.execute(Command::Get { id: 1 }),
        Err(GardenError::NotFound)
    ));
    assert!(matches!(
        engine.execute(Command::Update { id: 1, fields: tomato() }),
        Err(GardenError::NotFound)
    ));
    assert!(matches!(
        engine.execute(Command::Delete { id: 1 }),
        Err(GardenError::NotFound)
    ));
}

#[test]
fn test_execute_import_and_export() {
    let engine = memory_engine();
    engine.create(&tomato()).unwrap();
    engine.create(&tomato()).unwrap();

    let rows = vec![
        SnapshotRow::new(Some(2), "Kept", "Bed", 1.0),
        SnapshotRow::new(None, "New", "Bed", 2.0),
    ];
    let reply = engine.execute(Command::Import { rows }).unwrap();
    assert_eq!(
        reply,
        Reply::Synced(SyncReport {
            updated: 1,
            created: 1,
            deleted: 1
        })
    );

    match engine.execute(Command::Export).unwrap() {
        Reply::Rows(rows) => {
            let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
            assert_eq!(ids, vec![Some(2), Some(3)]);
        }
        other => panic!("Expected Rows, got {:?}", other),
    }
}

#[test]
fn test_execute_ping() {
    assert_eq!(memory_engine().execute(Command::Ping).unwrap(), Reply::Pong);
}

#[test]
fn test_execute_create_constraint_violation() {
    let engine = memory_engine();

    let result = engine.execute(Command::Create {
        fields: PlantFields::new("", "Bed", 0.0),
    });

    assert!(matches!(result, Err(GardenError::ConstraintViolation(_))));
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_creates() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for i in 0..25 {
                    let name = format!("t{}-{}", t, i);
                    engine.create(&PlantFields::new(name, "Bed", 1.0)).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let ids: Vec<_> = engine.list().unwrap().iter().map(|p| p.id).collect();
    assert_eq!(ids, (1..=100).collect::<Vec<_>>());
}

#[test]
fn test_concurrent_reads_during_import() {
    let (_temp, engine) = setup_temp_engine();
    let engine = Arc::new(engine);
    for _ in 0..20 {
        engine.create(&tomato()).unwrap();
    }

    let writer = {
        let engine = Arc::clone(&engine);
        thread::spawn(move || {
            for round in 0..10 {
                let rows: Vec<_> = (0..20)
                    .map(|i| SnapshotRow::new(None, format!("r{}-{}", round, i), "Bed", 1.0))
                    .collect();
                engine.import(&rows).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..3)
        .map(|_| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                for _ in 0..50 {
                    // A reader sees either a whole snapshot or the seed, never a mix
                    let plants = engine.list().unwrap();
                    assert_eq!(plants.len(), 20);
                    let prefix = plants[0].name.split('-').next().unwrap().to_string();
                    assert!(plants.iter().all(|p| p.name.starts_with(&prefix)));
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
}
