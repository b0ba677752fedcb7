//! # TaskTrail CLI
//!
//! ```bash
//! tasktrail login --email admin@demo.tasktrail.dev
//! tasktrail tasks list
//! tasktrail tasks create "Write release notes" --priority high
//! ```

use clap::Parser;
use tasktrail_client::cli::{self, Cli};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so command output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasktrail_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run(Cli::parse()).await
}
