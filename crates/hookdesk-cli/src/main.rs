// Hookdesk CLI
// Runs workflows, tests endpoints and reads the automation log

use clap::Parser;

use hookdesk_lib::utils::database::Database;
use hookdesk_lib::{AppState, HookdeskError};

use crate::cli::Cli;
use crate::runner::CommandRunner;

mod cli;
mod runner;

#[tokio::main]
async fn main() {
    // Load environment variables from .env (HOOKDESK_DATA_DIR, RUST_LOG)
    let _ = dotenvy::dotenv();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let state = match cli.db {
        Some(path) => Database::new(path)
            .map_err(HookdeskError::Storage)
            .and_then(AppState::open),
        None => AppState::open_default(),
    };

    let state = match state {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to open storage: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = CommandRunner::new(state).run_command(cli.command).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
