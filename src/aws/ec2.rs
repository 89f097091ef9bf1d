//! Region-scoped EC2 client

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_ec2::{
    types::{Filter, InternetGateway, NetworkAcl, RouteTable, SecurityGroup, Subnet},
    Client,
};
use tracing::debug;

use crate::teardown::VpcResources;

/// EC2 client for one region (or the ambient default region when
/// constructed without one).
#[derive(Clone)]
pub struct Ec2Client {
    client: Client,
}

impl Ec2Client {
    /// Create a new EC2 client, overriding the region when given.
    pub async fn new(region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(aws_config::Region::new(region.to_string()));
        }
        let config = loader.load().await;

        Self {
            client: Client::new(&config),
        }
    }

    /// List every region visible to the account.
    pub async fn regions(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .describe_regions()
            .send()
            .await
            .context("Failed to describe regions")?;

        let regions: Vec<String> = response
            .regions()
            .iter()
            .filter_map(|r| r.region_name())
            .map(str::to_string)
            .collect();

        debug!(count = regions.len(), "Described regions");

        Ok(regions)
    }

    /// Scope a listing call to one VPC.
    fn vpc_filter(vpc_id: &str) -> Filter {
        Filter::builder().name("vpc-id").values(vpc_id).build()
    }
}

#[async_trait]
impl VpcResources for Ec2Client {
    async fn default_vpcs(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .describe_vpcs()
            .filters(Filter::builder().name("isDefault").values("true").build())
            .send()
            .await
            .context("Failed to describe VPCs")?;

        Ok(response
            .vpcs()
            .iter()
            .filter_map(|v| v.vpc_id())
            .map(str::to_string)
            .collect())
    }

    async fn internet_gateways(&self, vpc_id: &str) -> Result<Vec<InternetGateway>> {
        let response = self
            .client
            .describe_internet_gateways()
            .filters(
                Filter::builder()
                    .name("attachment.vpc-id")
                    .values(vpc_id)
                    .build(),
            )
            .send()
            .await
            .context("Failed to describe internet gateways")?;

        Ok(response.internet_gateways().to_vec())
    }

    async fn detach_internet_gateway(&self, igw_id: &str, vpc_id: &str) -> Result<()> {
        self.client
            .detach_internet_gateway()
            .internet_gateway_id(igw_id)
            .vpc_id(vpc_id)
            .send()
            .await
            .context("Failed to detach internet gateway")?;

        Ok(())
    }

    async fn delete_internet_gateway(&self, igw_id: &str) -> Result<()> {
        self.client
            .delete_internet_gateway()
            .internet_gateway_id(igw_id)
            .send()
            .await
            .context("Failed to delete internet gateway")?;

        Ok(())
    }

    async fn subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>> {
        let response = self
            .client
            .describe_subnets()
            .filters(Self::vpc_filter(vpc_id))
            .send()
            .await
            .context("Failed to describe subnets")?;

        Ok(response.subnets().to_vec())
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        self.client
            .delete_subnet()
            .subnet_id(subnet_id)
            .send()
            .await
            .context("Failed to delete subnet")?;

        Ok(())
    }

    async fn route_tables(&self, vpc_id: &str) -> Result<Vec<RouteTable>> {
        let response = self
            .client
            .describe_route_tables()
            .filters(Self::vpc_filter(vpc_id))
            .send()
            .await
            .context("Failed to describe route tables")?;

        Ok(response.route_tables().to_vec())
    }

    async fn delete_route_table(&self, route_table_id: &str) -> Result<()> {
        self.client
            .delete_route_table()
            .route_table_id(route_table_id)
            .send()
            .await
            .context("Failed to delete route table")?;

        Ok(())
    }

    async fn network_acls(&self, vpc_id: &str) -> Result<Vec<NetworkAcl>> {
        let response = self
            .client
            .describe_network_acls()
            .filters(Self::vpc_filter(vpc_id))
            .send()
            .await
            .context("Failed to describe network ACLs")?;

        Ok(response.network_acls().to_vec())
    }

    async fn delete_network_acl(&self, network_acl_id: &str) -> Result<()> {
        self.client
            .delete_network_acl()
            .network_acl_id(network_acl_id)
            .send()
            .await
            .context("Failed to delete network ACL")?;

        Ok(())
    }

    async fn security_groups(&self, vpc_id: &str) -> Result<Vec<SecurityGroup>> {
        let response = self
            .client
            .describe_security_groups()
            .filters(Self::vpc_filter(vpc_id))
            .send()
            .await
            .context("Failed to describe security groups")?;

        Ok(response.security_groups().to_vec())
    }

    async fn delete_security_group(&self, group_id: &str) -> Result<()> {
        self.client
            .delete_security_group()
            .group_id(group_id)
            .send()
            .await
            .context("Failed to delete security group")?;

        Ok(())
    }

    async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        self.client
            .delete_vpc()
            .vpc_id(vpc_id)
            .send()
            .await
            .context("Failed to delete VPC")?;

        Ok(())
    }
}
