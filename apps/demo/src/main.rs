use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::{Parser, Subcommand};
use shared::domain::ShipmentId;
use storage::{normalize_database_url, Storage};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracker_core::{
    animation::FRAME_INTERVAL, CounterAnimator, RandomRecordSource, ShipmentStore, ViewSynchronizer,
};

mod config;
mod render;

use config::load_settings;
use render::{render_popup, render_stats, TerminalCounter, TerminalList, TerminalMap};

#[derive(Parser, Debug)]
#[command(about = "Mock shipment tracking page rendered in the terminal")]
struct Cli {
    #[arg(long, default_value = "tracker.toml")]
    config: PathBuf,
    #[arg(long)]
    database_url: Option<String>,
    #[arg(long)]
    storage_key: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the shipment list and map markers.
    Show,
    /// Fabricate new demo shipments.
    Generate {
        #[arg(long, default_value_t = 1)]
        count: u32,
        /// Animate the active-shipment counter to its new value.
        #[arg(long)]
        animate: bool,
    },
    /// Center the map on a listed shipment and open its popup.
    Select { id: String },
    Stats,
}

type DemoView = ViewSynchronizer<TerminalMap, TerminalList>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings(&cli.config);
    if let Some(v) = cli.database_url {
        settings.database_url = v;
    }
    if let Some(v) = cli.storage_key {
        settings.storage_key = v;
    }

    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;

    let mut store = ShipmentStore::open_with(
        storage,
        settings.storage_key.clone(),
        Box::new(RandomRecordSource::new()),
    )
    .await?;
    info!(key = store.key(), outcome = ?store.load_outcome(), "shipment store ready");

    let mut view = ViewSynchronizer::new(
        Some(TerminalMap::new(settings.map.clone())),
        Some(TerminalList::default()),
    )
    .with_fly_to(settings.fly_to);
    view.refresh(store.all());

    match cli.command.unwrap_or(Command::Show) {
        Command::Show => print_page(&view),
        Command::Generate { count, animate } => {
            let before = store.stats();
            for _ in 0..count {
                match store.generate().await {
                    Ok(record) => println!(
                        "generated {} [{}] {} ({}%)",
                        record.id,
                        record.status,
                        record.route(),
                        record.progress
                    ),
                    Err(error) => {
                        error!(error = %format!("{error:#}"), "failed to generate demo shipment");
                        break;
                    }
                }
                view.refresh(store.all());
            }
            print_page(&view);

            let after = store.stats();
            if animate {
                let counter = Arc::new(TerminalCounter::starting_at(before.active as i64));
                let mut animator = CounterAnimator::new(counter)
                    .with_timing(settings.counter_duration, FRAME_INTERVAL);
                animator.animate_to(after.active as i64);
                animator.finish().await;
                eprintln!();
            }
            println!("{}", render_stats(&after));
        }
        Command::Select { id } => {
            let id = ShipmentId::from(id.as_str());
            match view.select(&id) {
                Some(target) => {
                    println!("camera → {target}");
                    if let Some(popup) = view.map().and_then(|map| map.opened_popup()) {
                        println!("{}", render_popup(popup));
                    }
                }
                None => println!("{id} is not on the list"),
            }
        }
        Command::Stats => println!("{}", render_stats(&store.stats())),
    }

    Ok(())
}

fn print_page(view: &DemoView) {
    if let Some(list) = view.list() {
        println!("shipments (newest first)");
        print!("{}", list.render());
    }
    if let Some(map) = view.map() {
        print!("{}", map.render());
    }
}
