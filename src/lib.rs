//! Glam Studio library root.
//! Exposes the CLI parser, the high-level `run()` function and the domain
//! modules (models, data access, business rules, reports).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Client(cmd) => cli::commands::client::handle(cmd, cfg),
        Commands::Service(cmd) => cli::commands::service::handle(cmd, cfg),
        Commands::Appt(cmd) => cli::commands::appt::handle(cmd, cfg),
        Commands::Invoice(cmd) => cli::commands::invoice::handle(cmd, cfg),
        Commands::Report(cmd) => cli::commands::report::handle(cmd, cfg),
        Commands::Agenda { .. } => cli::commands::agenda::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let mut cfg = Config::load()?;

    // --db wins over the configured database
    if let Some(custom_db) = &cli.db {
        cfg.database = Config::resolve_db_path(custom_db)
            .to_string_lossy()
            .to_string();
    }

    dispatch(&cli, &cfg)
}
