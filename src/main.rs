mod config;
mod db;
mod error;
mod ledger;
mod models;
mod report;
mod run;
mod store;
mod validate;

use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::debug;
use std::path::PathBuf;

/// Track income and expenses per user and report on them.
#[derive(Parser)]
#[command(name = "fintrack", version, about)]
struct Cli {
    /// SQLite database file
    #[arg(long, global = true, env = "FINTRACK_DB")]
    db: Option<PathBuf>,

    /// Config file (default: platform config dir/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: run::Command,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;
    let db_path = config.database_path(cli.db.as_deref())?;
    debug!("using database {}", db_path.display());

    let mut db = db::Database::open(&db_path)?;
    run::as_cli(cli.command, &mut db, &config, &db_path)
}
