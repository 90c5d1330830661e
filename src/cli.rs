// src/cli.rs
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::environment::{EnvironmentConfig, DEFAULT_CONFIG_PATH};
use crate::web::start_web_server;

#[derive(Parser)]
#[command(name = "jobfeed")]
#[command(about = "Cached job listing aggregator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP API server
    Serve,
    /// Run a single query and print the batch as JSON
    Fetch {
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long, allow_hyphen_values = true)]
        limit: Option<i64>,
        /// Bypass the cache and call the source directly
        #[arg(long)]
        no_cache: bool,
    },
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = EnvironmentConfig::load(&cli.config)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => start_web_server(config).await,
        Command::Fetch {
            role,
            location,
            limit,
            no_cache,
        } => {
            let cache = config.build_cache()?;
            info!("Fetching jobs from {}", cache.source_name());

            let batch = if no_cache {
                cache.fetch_uncached(&role, &location, limit).await
            } else {
                cache.get(&role, &location, limit).await
            }?;

            let output =
                serde_json::to_string_pretty(&batch).context("Failed to serialize jobs")?;
            println!("{}", output);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::try_parse_from([
            "jobfeed", "fetch", "--role", "designer", "--location", "Pune", "--limit", "-3",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Fetch {
                role,
                location,
                limit,
                no_cache,
            }) => {
                assert_eq!(role, "designer");
                assert_eq!(location, "Pune");
                assert_eq!(limit, Some(-3));
                assert!(!no_cache);
            }
            _ => panic!("expected fetch command"),
        }
        assert_eq!(cli.config, PathBuf::from("config.yaml"));
    }

    #[test]
    fn test_serve_is_default() {
        let cli = Cli::try_parse_from(["jobfeed", "--config", "prod.yaml"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.config, PathBuf::from("prod.yaml"));
    }
}
