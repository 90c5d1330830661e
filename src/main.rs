use anyhow::Result;
use clap::Parser;
use jobfeed::cli::{handle_command, Cli};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging first
    Registry::default()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or(EnvFilter::new("jobfeed=info,rocket::server=off")),
        )
        .init();

    let cli = Cli::parse();
    handle_command(cli).await
}
