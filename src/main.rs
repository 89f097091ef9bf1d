//! vpc-reaper: deletes the default VPC and its dependencies in every region
//! of an AWS account.
//!
//! Deletion is best effort: each VPC is torn down independently on a bounded
//! worker pool, and individual API failures are logged and skipped.

mod aws;
mod config;
mod orchestrator;
mod teardown;
#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "vpc-reaper")]
#[command(about = "Delete default VPCs and their dependencies across all AWS regions")]
#[command(version)]
struct Args {
    /// Maximum number of VPC teardowns to run at once
    #[arg(long, env = "MAX_WORKERS", default_value_t = config::DEFAULT_MAX_WORKERS)]
    max_workers: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();

    let config = config::RunConfig {
        max_workers: args.max_workers,
    };

    orchestrator::run(config).await
}
