use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;

use rentmeter_rs::{
    backup::{parse_backup, restore_backup},
    initialize_db,
};

/// Sample data: one price schedule and four months of readings.
const DEMO_BACKUP: &str = r#"{
    "pricing": [
        {"effective_date": "2024-01-01", "electricity_price": 4500,
         "water_price": 15000, "base_rent": 3500000}
    ],
    "records": [
        {"record_date": "2024-04-15", "electricity_index": 2337.6, "water_index": 125.4,
         "is_paid": true, "note": "Tháng 4"},
        {"record_date": "2024-05-15", "electricity_index": 2518.5, "water_index": 130.3,
         "is_paid": true, "note": "Tháng 5"},
        {"record_date": "2024-06-15", "electricity_index": 2697.0, "water_index": 135.5,
         "is_paid": true, "note": "Tháng 6"},
        {"record_date": "2024-07-15", "electricity_index": 2863.8, "water_index": 140.5,
         "is_paid": false, "note": "Tháng 7"}
    ]
}"#;

/// A utility for creating a database for rentmeter_rs filled with demo data or a backup.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// A JSON backup to load instead of the demo data.
    #[arg(long, short)]
    backup_path: Option<String>,
}

/// Create and populate a database for trying out the app.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'rentmeter.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    let backup_text = match &args.backup_path {
        Some(backup_path) => {
            println!("Reading backup from {backup_path:#?}");
            fs::read_to_string(backup_path)?
        }
        None => DEMO_BACKUP.to_owned(),
    };

    // A bad backup must not leave an empty database file behind.
    let backup = parse_backup(&backup_text)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!(
        "Inserting {} price schedules and {} readings...",
        backup.schedules.len(),
        backup.readings.len()
    );
    restore_backup(backup, &conn)?;

    println!("Success!");

    Ok(())
}
