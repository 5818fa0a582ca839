//! caskdb CLI
//!
//! Command-line interface for a caskdb log file.

use std::path::PathBuf;
use std::process::ExitCode;

use caskdb::{CaskError, Config, DiskStore, OpenMode, SyncStrategy};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

/// caskdb CLI
#[derive(Parser, Debug)]
#[command(name = "caskdb-cli")]
#[command(about = "CLI for the caskdb key-value store")]
#[command(version)]
struct Args {
    /// Log file path
    #[arg(short, long, default_value = "./caskdb.db")]
    file: PathBuf,

    /// Truncate the log instead of replaying it
    #[arg(long)]
    fresh: bool,

    /// Drop an incomplete record left at the end of the log
    #[arg(long, conflicts_with = "fresh")]
    repair: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// List all keys
    Keys,

    /// Show store statistics
    Stats,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let open_mode = if args.fresh {
        OpenMode::Truncate
    } else {
        OpenMode::Replay
    };
    let config = Config::builder()
        .path(&args.file)
        .open_mode(open_mode)
        .repair_torn_tail(args.repair)
        .sync_strategy(SyncStrategy::EveryWrite)
        .build();

    let mut store = match DiskStore::open_with(config) {
        Ok(store) => store,
        Err(e) => {
            tracing::error!("Failed to open store: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = run(&mut store, args.command);

    if let Err(e) = store.close() {
        tracing::error!("Failed to close store: {}", e);
        return ExitCode::FAILURE;
    }

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(CaskError::KeyNotFound(key)) => {
            eprintln!("key not found: {}", key);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(store: &mut DiskStore, command: Commands) -> caskdb::Result<()> {
    match command {
        Commands::Get { key } => {
            println!("{}", store.get(&key)?);
        }
        Commands::Set { key, value } => {
            store.set(&key, &value)?;
        }
        Commands::Keys => {
            let mut keys: Vec<&str> = store.keys().collect();
            keys.sort_unstable();
            for key in keys {
                println!("{}", key);
            }
        }
        Commands::Stats => {
            let stats = store.stats()?;
            println!("keys:        {}", stats.key_count);
            println!("log size:    {} bytes", stats.log_size);
            println!("reclaimable: {} bytes", stats.reclaimable_bytes);
        }
    }
    Ok(())
}
