use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(name = "hookdesk")]
#[clap(about = "Run automation workflows and inspect webhook deliveries", long_about = None)]
pub struct Cli {
    /// Database file (defaults to the application data directory)
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a workflow from the catalog
    Run {
        workflow: String,
        /// JSON merged over the workflow payload
        #[clap(short, long)]
        data: Option<String>,
    },
    /// Send a test payload to an endpoint
    Test {
        url: String,
        /// Config field the endpoint belongs to
        #[clap(short, long)]
        field: Option<String>,
    },
    /// Show the automation log
    Logs {
        #[clap(short, long)]
        search: Option<String>,
        /// Only failed deliveries
        #[clap(short, long)]
        errors: bool,
        /// Empty the log
        #[clap(long)]
        clear: bool,
    },
    /// Show or edit webhook settings
    Config {
        #[clap(subcommand)]
        action: ConfigAction,
    },
    /// Last execution of a workflow
    Last { workflow: String },
    /// List catalog workflows
    Workflows,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Set { field: String, value: String },
    /// Restore defaults
    Reset,
    /// Readiness of every channel
    Check,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_with_data() {
        let cli = Cli::parse_from(["hookdesk", "run", "Team Slack Alert", "--data", "{\"a\":1}"]);
        match cli.command {
            Commands::Run { workflow, data } => {
                assert_eq!(workflow, "Team Slack Alert");
                assert_eq!(data.as_deref(), Some("{\"a\":1}"));
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_logs_flags_and_global_db() {
        let cli = Cli::parse_from(["hookdesk", "logs", "--errors", "--db", "/tmp/h.db"]);
        assert_eq!(cli.db, Some(PathBuf::from("/tmp/h.db")));
        assert!(matches!(
            cli.command,
            Commands::Logs { errors: true, clear: false, search: None }
        ));
    }

    #[test]
    fn test_parse_config_set() {
        let cli = Cli::parse_from(["hookdesk", "config", "set", "authToken", "abc"]);
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigAction::Set { .. } }
        ));
    }
}
