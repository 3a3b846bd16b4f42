use anyhow::{Context, Result};
use bookshop_ledger::{read_fixture, write_csv, LoadReport, ResetReport, Storage};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const DEFAULT_FIXTURE: &str = "tests_data.json";

#[derive(Parser)]
#[command(name = "bookshop-ledger", version, about = "Seed the bookshop schema and report purchases by publisher")]
struct Cli {
    /// SQLite database file, or :memory:
    #[arg(long, global = true, env = "BOOKSHOP_DB", default_value = "bookshop.db")]
    database: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Create the schema if it does not exist yet
    Init,
    /// Delete every row and restart the id counters
    Reset,
    /// Reset, then load a fixture file
    Load {
        fixture: PathBuf,
        /// Load on top of existing rows instead of resetting first
        #[arg(long)]
        keep_existing: bool,
    },
    /// List purchases of a publisher's books (id or exact name)
    Purchases {
        publisher: String,
        /// Write the rows as CSV to this file instead of printing the report
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut storage = Storage::open(&cli.database)
        .with_context(|| format!("Failed to open database {}", cli.database))?;

    match cli.command {
        Some(Command::Init) => {
            println!("✓ Schema ready in {}", cli.database);
        }
        Some(Command::Reset) => {
            let report = storage.reset()?;
            print_reset(&report);
        }
        Some(Command::Load {
            fixture,
            keep_existing,
        }) => run_load(&mut storage, &fixture, keep_existing)?,
        Some(Command::Purchases { publisher, csv }) => {
            run_purchases(&storage, &publisher, csv.as_deref())?
        }
        None => run_menu(&mut storage)?,
    }

    Ok(())
}

fn run_load(storage: &mut Storage, fixture_path: &Path, keep_existing: bool) -> Result<()> {
    // File I/O happens before any transaction opens
    let fixture = read_fixture(fixture_path)
        .with_context(|| format!("Failed to read fixture {}", fixture_path.display()))?;
    println!("📂 Fixture {} ({} records, sha256 {})", fixture.source_name(), fixture.records.len(), &fixture.digest[..12]);

    let parsed = fixture.into_records();
    for skipped in &parsed.skipped {
        println!("⚠️  Skipped record #{} ({}): {}", skipped.index, skipped.model, skipped.reason);
    }

    if keep_existing {
        let report = storage.load(&parsed.records).context("Data load failed")?;
        print_load(&report);
    } else {
        let (reset, load) = storage.reseed(&parsed.records).context("Data load failed")?;
        print_reset(&reset);
        print_load(&load);
    }

    println!("✅ Data loaded successfully.");
    Ok(())
}

fn run_purchases(storage: &Storage, publisher: &str, csv_path: Option<&Path>) -> Result<()> {
    let lookup = storage.purchases(publisher)?;

    match csv_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            write_csv(lookup.purchases(), file)?;
            println!("✓ Wrote {} rows to {}", lookup.purchases().len(), path.display());
        }
        None => println!("{}", lookup.render()),
    }

    Ok(())
}

fn run_menu(storage: &mut Storage) -> Result<()> {
    println!("1. Load test data");
    println!("2. Find purchases by publisher");

    let choice = prompt("Choose an action (1 or 2): ")?;
    match choice.as_str() {
        "1" => {
            if let Err(e) = run_load(storage, Path::new(DEFAULT_FIXTURE), false) {
                // A failed load leaves nothing behind; report and exit cleanly
                warn!(error = %e, "load failed");
                println!("❌ Data load error: {:#}", e);
            }
        }
        "2" => {
            let publisher = prompt("Enter the publisher name or id: ")?;
            run_purchases(storage, &publisher, None)?;
        }
        _ => println!("Invalid choice. Exiting."),
    }

    Ok(())
}

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn print_reset(report: &ResetReport) {
    println!("🧹 Reset {} tables ({} rows removed)", report.deleted.len(), report.total_deleted());
}

fn print_load(report: &LoadReport) {
    println!(
        "💾 Inserted: {} publishers, {} shops, {} books, {} stock, {} sales",
        report.inserted.publisher,
        report.inserted.shop,
        report.inserted.book,
        report.inserted.stock,
        report.inserted.sale
    );
    if report.skipped.total() > 0 {
        println!("✓ Already present (skipped): {}", report.skipped.total());
    }
}
