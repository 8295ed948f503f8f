//! GardenSync CLI Client
//!
//! Command-line interface for interacting with a GardenSync server.

use clap::{Parser, Subcommand};
use gardensync::network::Client;
use gardensync::record::CellValue;
use gardensync::{PlantFields, RawRow, Result, SnapshotRow};
use tracing_subscriber::{fmt, EnvFilter};

/// GardenSync CLI
#[derive(Parser, Debug)]
#[command(name = "gardensync-cli")]
#[command(about = "CLI for the GardenSync plant store")]
#[command(version)]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all plants
    List,

    /// Show one plant
    Get {
        id: i64,
    },

    /// Add a plant
    Add {
        name: String,
        location: String,
        /// Required humidity level
        humidity: f64,
    },

    /// Overwrite a plant's fields
    Update {
        id: i64,
        name: String,
        location: String,
        humidity: f64,
    },

    /// Delete a plant
    Del {
        id: i64,
    },

    /// Replace the table with a snapshot. Plants not named by id are deleted.
    Import {
        /// Row as "id,name,location,humidity"; leave id empty for a new plant
        #[arg(short, long = "row", value_parser = parse_row)]
        rows: Vec<SnapshotRow>,
    },

    /// Print the table as importable rows
    Export,

    /// Ping the server
    Ping,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let mut client = Client::connect(&args.server)?;

    match args.command {
        Commands::List => {
            for plant in client.list()? {
                println!(
                    "{:>5}  {:<20} {:<20} {:>6.1}  {}",
                    plant.id,
                    plant.name,
                    plant.location,
                    plant.required_humidity,
                    plant.last_updated.to_rfc3339()
                );
            }
        }
        Commands::Get { id } => match client.get(id)? {
            Some(plant) => println!("{:#?}", plant),
            None => println!("(not found)"),
        },
        Commands::Add { name, location, humidity } => {
            let id = client.create(PlantFields::new(name, location, humidity))?;
            println!("created {}", id);
        }
        Commands::Update { id, name, location, humidity } => {
            if client.update(id, PlantFields::new(name, location, humidity))? {
                println!("updated {}", id);
            } else {
                println!("(not found)");
            }
        }
        Commands::Del { id } => {
            if client.delete(id)? {
                println!("deleted {}", id);
            } else {
                println!("(not found)");
            }
        }
        Commands::Import { rows } => {
            let report = client.import(rows)?;
            println!(
                "updated {}, created {}, deleted {}",
                report.updated, report.created, report.deleted
            );
        }
        Commands::Export => {
            println!("id,name,location,humidity");
            for row in client.export()? {
                let id = row.id.map(|id| id.to_string()).unwrap_or_default();
                println!("{},{},{},{}", id, row.name, row.location, row.required_humidity);
            }
        }
        Commands::Ping => {
            client.ping()?;
            println!("PONG");
        }
    }

    Ok(())
}

/// Parse "id,name,location,humidity"; missing trailing cells count as blank
fn parse_row(s: &str) -> std::result::Result<SnapshotRow, String> {
    let mut cells = s.splitn(4, ',').map(parse_cell);
    let raw = RawRow {
        id: cells.next().unwrap_or_default(),
        name: cells.next().unwrap_or_default(),
        location: cells.next().unwrap_or_default(),
        required_humidity: cells.next().unwrap_or_default(),
    };
    Ok(raw.normalize())
}

fn parse_cell(cell: &str) -> CellValue {
    let cell = cell.trim();
    if cell.is_empty() {
        CellValue::Empty
    } else if let Ok(n) = cell.parse::<i64>() {
        CellValue::Int(n)
    } else if let Ok(f) = cell.parse::<f64>() {
        CellValue::Float(f)
    } else {
        CellValue::Text(cell.to_string())
    }
}
