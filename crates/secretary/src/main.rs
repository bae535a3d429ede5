// SPDX-FileCopyrightText: 2026 Secretary Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Secretary - turns Telegram voice notes into kanban tasks.
//!
//! This is the binary entry point.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod check_config;
mod failed;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use secretary_config::SecretaryConfig;

/// Secretary - turns Telegram voice notes into kanban tasks.
#[derive(Parser, Debug)]
#[command(name = "secretary", version, about, long_about = None)]
struct Cli {
    /// Read this TOML file instead of the default search path.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the webhook server.
    Serve,
    /// List events that ended in the Failed state.
    Failed {
        /// Maximum number of events to show.
        #[arg(long, default_value_t = 20)]
        limit: usize,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Run a Failed event through the pipeline again.
    Reprocess {
        /// Ledger id of the event.
        id: i64,
    },
    /// Validate configuration and report missing credentials.
    CheckConfig,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(errors) => {
            secretary_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Failed { limit, json }) => failed::run_failed(&config, limit, json).await,
        Some(Commands::Reprocess { id }) => failed::run_reprocess(config, id).await,
        Some(Commands::CheckConfig) => {
            std::process::exit(check_config::run_check_config(&config));
        }
        None => {
            println!("secretary: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn load_config(
    path: Option<&std::path::Path>,
) -> Result<SecretaryConfig, Vec<secretary_config::ConfigError>> {
    match path {
        Some(path) => secretary_config::load_and_validate_path(path),
        None => secretary_config::load_and_validate(),
    }
}

/// Initializes the tracing subscriber with the given log level.
pub(crate) fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("secretary={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["secretary", "reprocess", "17"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Reprocess { id: 17 })));

        let cli = Cli::try_parse_from(["secretary", "failed", "--limit", "5", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Failed { limit: 5, json: true })
        ));

        let cli =
            Cli::try_parse_from(["secretary", "--config", "/tmp/s.toml", "check-config"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("/tmp/s.toml")));
        assert!(matches!(cli.command, Some(Commands::CheckConfig)));
    }

    #[test]
    fn reprocess_requires_an_id() {
        assert!(Cli::try_parse_from(["secretary", "reprocess"]).is_err());
    }
}
