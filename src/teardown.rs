//! Ordered teardown of one default VPC.
//!
//! A VPC with an attached internet gateway or a default subnet cannot be
//! deleted, so the dependent resources go first, in a fixed order, and the
//! VPC itself goes last. Every failure is logged and skipped; the sequence
//! always runs to the end.

use anyhow::Result;
use async_trait::async_trait;
use aws_sdk_ec2::types::{InternetGateway, NetworkAcl, RouteTable, SecurityGroup, Subnet};
use tracing::{info, warn};

/// The EC2 operations a VPC teardown needs.
///
/// Implemented by [`crate::aws::Ec2Client`] and by test doubles. Listing
/// calls are scoped to one VPC; delete calls take the resource identifier.
#[async_trait]
pub trait VpcResources: Send + Sync {
    async fn default_vpcs(&self) -> Result<Vec<String>>;

    async fn internet_gateways(&self, vpc_id: &str) -> Result<Vec<InternetGateway>>;
    async fn detach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()>;
    async fn delete_internet_gateway(&self, igw_id: &str) -> Result<()>;

    async fn subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>>;
    async fn delete_subnet(&self, subnet_id: &str) -> Result<()>;

    async fn route_tables(&self, vpc_id: &str) -> Result<Vec<RouteTable>>;
    async fn delete_route_table(&self, route_table_id: &str) -> Result<()>;

    async fn network_acls(&self, vpc_id: &str) -> Result<Vec<NetworkAcl>>;
    async fn delete_network_acl(&self, network_acl_id: &str) -> Result<()>;

    async fn security_groups(&self, vpc_id: &str) -> Result<Vec<SecurityGroup>>;
    async fn delete_security_group(&self, group_id: &str) -> Result<()>;

    async fn delete_vpc(&self, vpc_id: &str) -> Result<()>;
}

/// Tear down one default VPC and everything inside it that blocks deletion.
///
/// Steps run in a fixed order: internet gateways, subnets, route tables,
/// network ACLs, security groups, then the VPC itself. A listing failure
/// aborts only its own step; every step after it, including the VPC delete,
/// still runs. Never returns an error.
pub async fn teardown_vpc<C: VpcResources>(ec2: &C, vpc_id: &str) {
    if let Err(e) = delete_internet_gateways(ec2, vpc_id).await {
        warn!(vpc_id = %vpc_id, error = %e, "failed to list internet gateways");
    }
    if let Err(e) = delete_default_subnets(ec2, vpc_id).await {
        warn!(vpc_id = %vpc_id, error = %e, "failed to list subnets");
    }
    if let Err(e) = delete_route_tables(ec2, vpc_id).await {
        warn!(vpc_id = %vpc_id, error = %e, "failed to list route tables");
    }
    if let Err(e) = delete_network_acls(ec2, vpc_id).await {
        warn!(vpc_id = %vpc_id, error = %e, "failed to list network ACLs");
    }
    if let Err(e) = delete_security_groups(ec2, vpc_id).await {
        warn!(vpc_id = %vpc_id, error = %e, "failed to list security groups");
    }

    info!(vpc_id = %vpc_id, "deleting VPC");
    if let Err(e) = ec2.delete_vpc(vpc_id).await {
        warn!(
            vpc_id = %vpc_id,
            error = %e,
            "failed to delete VPC; remove the remaining dependencies and delete it manually"
        );
    }
}

/// Detach and delete every internet gateway attached to the VPC.
///
/// A detach failure does not suppress the delete attempt.
async fn delete_internet_gateways<C: VpcResources>(ec2: &C, vpc_id: &str) -> Result<()> {
    for igw in ec2.internet_gateways(vpc_id).await? {
        let Some(igw_id) = igw.internet_gateway_id() else {
            continue;
        };
        info!(igw_id = %igw_id, vpc_id = %vpc_id, "detaching and deleting internet gateway");
        if let Err(e) = ec2.detach_internet_gateway(igw_id, vpc_id).await {
            warn!(igw_id = %igw_id, error = %e, "failed to detach internet gateway");
        }
        if let Err(e) = ec2.delete_internet_gateway(igw_id).await {
            warn!(igw_id = %igw_id, error = %e, "failed to delete internet gateway");
        }
    }
    Ok(())
}

/// Delete the VPC's default subnets. Non-default subnets are left alone and
/// not reported.
async fn delete_default_subnets<C: VpcResources>(ec2: &C, vpc_id: &str) -> Result<()> {
    let subnets = ec2.subnets(vpc_id).await?;
    for subnet in subnets.iter().filter(|s| s.default_for_az().unwrap_or(false)) {
        let Some(subnet_id) = subnet.subnet_id() else {
            continue;
        };
        info!(subnet_id = %subnet_id, "deleting subnet");
        if let Err(e) = ec2.delete_subnet(subnet_id).await {
            warn!(subnet_id = %subnet_id, error = %e, "failed to delete subnet");
        }
    }
    Ok(())
}

/// Delete the VPC's route tables, keeping the main one (it goes away with
/// the VPC).
async fn delete_route_tables<C: VpcResources>(ec2: &C, vpc_id: &str) -> Result<()> {
    for table in ec2.route_tables(vpc_id).await? {
        let Some(route_table_id) = table.route_table_id() else {
            continue;
        };
        if is_main_route_table(&table) {
            info!(route_table_id = %route_table_id, "skipping main route table");
            continue;
        }
        info!(route_table_id = %route_table_id, "deleting route table");
        if let Err(e) = ec2.delete_route_table(route_table_id).await {
            warn!(route_table_id = %route_table_id, error = %e, "failed to delete route table");
        }
    }
    Ok(())
}

/// Delete the VPC's network ACLs, keeping the default one.
async fn delete_network_acls<C: VpcResources>(ec2: &C, vpc_id: &str) -> Result<()> {
    for acl in ec2.network_acls(vpc_id).await? {
        let Some(network_acl_id) = acl.network_acl_id() else {
            continue;
        };
        if acl.is_default().unwrap_or(false) {
            info!(network_acl_id = %network_acl_id, "skipping default network ACL");
            continue;
        }
        info!(network_acl_id = %network_acl_id, "deleting network ACL");
        if let Err(e) = ec2.delete_network_acl(network_acl_id).await {
            warn!(network_acl_id = %network_acl_id, error = %e, "failed to delete network ACL");
        }
    }
    Ok(())
}

/// Delete the VPC's security groups, keeping the one literally named
/// `default`.
async fn delete_security_groups<C: VpcResources>(ec2: &C, vpc_id: &str) -> Result<()> {
    for group in ec2.security_groups(vpc_id).await? {
        let Some(group_id) = group.group_id() else {
            continue;
        };
        if group.group_name() == Some("default") {
            info!(group_id = %group_id, "skipping default security group");
            continue;
        }
        info!(group_id = %group_id, "deleting security group");
        if let Err(e) = ec2.delete_security_group(group_id).await {
            warn!(group_id = %group_id, error = %e, "failed to delete security group");
        }
    }
    Ok(())
}

/// The main route table carries an association entry with `Main == true`.
fn is_main_route_table(table: &RouteTable) -> bool {
    table
        .associations()
        .iter()
        .any(|assoc| assoc.main().unwrap_or(false))
}
