use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::domain::{FleetStats, ShipmentRecord};
use storage::{normalize_database_url, Storage, DEFAULT_DATABASE_URL};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracker_core::STORAGE_KEY;

/// Out-of-band administration of the demo's storage slot.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = DEFAULT_DATABASE_URL)]
    database_url: String,
    #[arg(long, default_value = STORAGE_KEY)]
    key: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the raw slot value.
    Dump,
    /// List every slot in the database.
    Slots,
    /// Delete the slot; the next demo start synthesizes defaults again.
    Clear,
    /// Replace the slot with a JSON array of shipment records.
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let storage = Storage::new(&normalize_database_url(&cli.database_url)).await?;

    match cli.command {
        Command::Dump => match storage.load_slot(&cli.key).await? {
            Some(raw) => println!("{raw}"),
            None => println!("slot '{}' is empty", cli.key),
        },
        Command::Slots => {
            for slot in storage.list_slots().await? {
                println!("{}\t{} bytes\t{}", slot.key, slot.bytes, slot.updated_at);
            }
        }
        Command::Clear => {
            if storage.clear_slot(&cli.key).await? {
                info!(key = %cli.key, "cleared slot");
            } else {
                warn!(key = %cli.key, "slot was already empty");
            }
        }
        Command::Import { file } => {
            let raw = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("failed to read '{}'", file.display()))?;
            let records: Vec<ShipmentRecord> = serde_json::from_str(&raw)
                .with_context(|| format!("'{}' is not a shipment record array", file.display()))?;
            let blob = serde_json::to_string(&records)?;
            storage.store_slot(&cli.key, &blob).await?;

            let stats = FleetStats::from_records(&records);
            println!(
                "imported {} records into '{}' ({} active)",
                stats.total, cli.key, stats.active
            );
        }
    }

    Ok(())
}
