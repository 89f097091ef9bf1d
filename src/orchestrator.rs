//! Region sweep and teardown scheduling

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::aws::Ec2Client;
use crate::config::RunConfig;
use crate::teardown::{self, VpcResources};

/// Walk every region of the account, find its default VPCs, and tear each
/// one down on a bounded worker pool.
pub async fn run(config: RunConfig) -> Result<()> {
    let bootstrap = Ec2Client::new(None).await;
    let regions = bootstrap
        .regions()
        .await
        .context("Failed to enumerate regions")?;

    info!(
        regions = regions.len(),
        max_workers = config.max_workers,
        "Sweeping account for default VPCs"
    );

    let mut clients = Vec::with_capacity(regions.len());
    for region in regions {
        let client = Ec2Client::new(Some(&region)).await;
        clients.push((region, client));
    }

    sweep(clients, config.max_workers).await;

    info!("Deleted all default VPCs");
    Ok(())
}

/// Discover default VPCs region by region and run one teardown task per VPC.
///
/// Discovery stays on the calling task; teardowns run concurrently, at most
/// `max_workers` at a time, with excess VPCs queuing at permit acquisition.
/// A region whose discovery fails is skipped whole. Returns only after every
/// submitted teardown has finished; task results carry no payload and a
/// panicked task is logged, not re-raised.
async fn sweep<C>(clients: Vec<(String, C)>, max_workers: usize)
where
    C: VpcResources + Clone + Send + Sync + 'static,
{
    let semaphore = Arc::new(Semaphore::new(max_workers.max(1)));
    let mut tasks = Vec::new();

    for (region, client) in clients {
        let vpcs = match client.default_vpcs().await {
            Ok(vpcs) => vpcs,
            Err(e) => {
                warn!(region = %region, error = %e, "Failed to list default VPCs, skipping region");
                continue;
            }
        };

        for vpc_id in vpcs {
            info!(region = %region, vpc_id = %vpc_id, "Found default VPC");

            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .expect("semaphore closed");
            let client = client.clone();

            tasks.push(tokio::spawn(async move {
                teardown::teardown_vpc(&client, &vpc_id).await;
                drop(permit);
            }));
        }
    }

    for task in tasks {
        if let Err(e) = task.await {
            warn!(error = %e, "Teardown task panicked");
        }
    }
}
