//! Command-line probe over the local NoReply store.
//!
//! # Responsibility
//! - Verify `noreply_core` linkage (`ping`).
//! - Inspect, export and purge a store database without the UI.

use clap::{Parser, Subcommand, ValueEnum};
use noreply_core::db::open_db;
use noreply_core::{
    init_logging_from_config, AutomationRuleService, BulkService, DocumentStore, FollowUpService,
    RandomIdGenerator, SqliteSubstrate, StoreConfig, TemplateService,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "noreply", version, about = "Inspect the local NoReply follow-up store")]
struct Cli {
    /// Store database path (defaults to NOREPLY_DB_PATH or a temp file).
    #[arg(long, env = "NOREPLY_DB_PATH")]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// Print one collection as JSON.
    List {
        #[arg(value_enum)]
        collection: Collection,
    },
    /// Print outreach counters.
    Stats,
    /// Write a pretty JSON snapshot into a directory.
    Export {
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Erase all collections.
    Purge {
        /// Required confirmation; purge is irreversible.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Collection {
    FollowUps,
    Rules,
    Templates,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let mut config = StoreConfig::from_env().map_err(|err| err.to_string())?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging_from_config(&config)?;

    if let Command::Ping = cli.command {
        println!("noreply_core ping={}", noreply_core::ping());
        println!("noreply_core version={}", noreply_core::core_version());
        return Ok(());
    }

    let conn = open_db(&config.db_path).map_err(|err| err.to_string())?;
    let store = DocumentStore::new(SqliteSubstrate::new(&conn));
    let ids = RandomIdGenerator;

    match cli.command {
        Command::Ping => {}
        Command::List { collection } => {
            let json = match collection {
                Collection::FollowUps => {
                    pretty(&FollowUpService::new(&store, &ids).list().map_err(to_message)?)
                }
                Collection::Rules => pretty(
                    &AutomationRuleService::new(&store, &ids)
                        .list()
                        .map_err(to_message)?,
                ),
                Collection::Templates => {
                    pretty(&TemplateService::new(&store, &ids).list().map_err(to_message)?)
                }
            }?;
            println!("{json}");
        }
        Command::Stats => {
            let stats = FollowUpService::new(&store, &ids)
                .stats()
                .map_err(to_message)?;
            println!("total={}", stats.total);
            println!("pending={}", stats.pending);
            println!("completed={}", stats.completed);
            println!("overdue={}", stats.overdue);
            println!("success_rate={}%", stats.success_rate_percent);
        }
        Command::Export { dir } => {
            let path = BulkService::new(&store)
                .write_export(&dir)
                .map_err(to_message)?;
            println!("exported to {}", path.display());
        }
        Command::Purge { yes } => {
            if !yes {
                return Err("purge erases all local data forever; rerun with --yes".to_string());
            }
            BulkService::new(&store).purge_all().map_err(to_message)?;
            println!("all local data erased");
        }
    }
    Ok(())
}

fn pretty<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| err.to_string())
}

fn to_message(err: impl std::fmt::Display) -> String {
    err.to_string()
}
