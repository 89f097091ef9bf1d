//! Shared test fixtures and helpers

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_ec2::types::{
    InternetGateway, NetworkAcl, RouteTable, RouteTableAssociation, SecurityGroup, Subnet,
};

use crate::teardown::VpcResources;

pub fn gateway(id: &str) -> InternetGateway {
    InternetGateway::builder().internet_gateway_id(id).build()
}

pub fn subnet(id: &str, default_for_az: bool) -> Subnet {
    Subnet::builder()
        .subnet_id(id)
        .default_for_az(default_for_az)
        .build()
}

pub fn route_table(id: &str, main: bool) -> RouteTable {
    RouteTable::builder()
        .route_table_id(id)
        .associations(RouteTableAssociation::builder().main(main).build())
        .build()
}

pub fn network_acl(id: &str, is_default: bool) -> NetworkAcl {
    NetworkAcl::builder()
        .network_acl_id(id)
        .is_default(is_default)
        .build()
}

pub fn security_group(id: &str, name: &str) -> SecurityGroup {
    SecurityGroup::builder()
        .group_id(id)
        .group_name(name)
        .build()
}

/// In-memory stand-in for the region-scoped EC2 API.
///
/// Records every call it sees, in order, as `verb:resource-id` tokens.
/// Calls whose token appears in the failure set return a simulated API
/// error after being recorded. Clones share the call log, so a test can
/// keep one handle while the orchestrator consumes another.
#[derive(Clone, Default)]
pub struct FakeVpc {
    vpcs: Vec<String>,
    gateways: Vec<InternetGateway>,
    subnets: Vec<Subnet>,
    route_tables: Vec<RouteTable>,
    network_acls: Vec<NetworkAcl>,
    security_groups: Vec<SecurityGroup>,
    failures: HashSet<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FakeVpc {
    pub fn vpc(mut self, id: &str) -> Self {
        self.vpcs.push(id.to_string());
        self
    }

    pub fn gateway(mut self, id: &str) -> Self {
        self.gateways.push(gateway(id));
        self
    }

    pub fn subnet(mut self, id: &str, default_for_az: bool) -> Self {
        self.subnets.push(subnet(id, default_for_az));
        self
    }

    pub fn route_table(mut self, id: &str, main: bool) -> Self {
        self.route_tables.push(route_table(id, main));
        self
    }

    pub fn network_acl(mut self, id: &str, is_default: bool) -> Self {
        self.network_acls.push(network_acl(id, is_default));
        self
    }

    pub fn security_group(mut self, id: &str, name: &str) -> Self {
        self.security_groups.push(security_group(id, name));
        self
    }

    /// Make the given call fail with a simulated API error.
    pub fn failing(mut self, call: &str) -> Self {
        self.failures.insert(call.to_string());
        self
    }

    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) -> Result<()> {
        let call = call.into();
        self.calls.lock().unwrap().push(call.clone());
        if self.failures.contains(&call) {
            Err(anyhow!("simulated API failure: {call}"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl VpcResources for FakeVpc {
    async fn default_vpcs(&self) -> Result<Vec<String>> {
        self.record("list:default_vpcs")?;
        Ok(self.vpcs.clone())
    }

    async fn internet_gateways(&self, _vpc_id: &str) -> Result<Vec<InternetGateway>> {
        self.record("list:internet_gateways")?;
        Ok(self.gateways.clone())
    }

    async fn detach_internet_gateway(&self, igw_id: &str, _vpc_id: &str) -> Result<()> {
        self.record(format!("detach:{igw_id}"))
    }

    async fn delete_internet_gateway(&self, igw_id: &str) -> Result<()> {
        self.record(format!("delete:{igw_id}"))
    }

    async fn subnets(&self, _vpc_id: &str) -> Result<Vec<Subnet>> {
        self.record("list:subnets")?;
        Ok(self.subnets.clone())
    }

    async fn delete_subnet(&self, subnet_id: &str) -> Result<()> {
        self.record(format!("delete:{subnet_id}"))
    }

    async fn route_tables(&self, _vpc_id: &str) -> Result<Vec<RouteTable>> {
        self.record("list:route_tables")?;
        Ok(self.route_tables.clone())
    }

    async fn delete_route_table(&self, route_table_id: &str) -> Result<()> {
        self.record(format!("delete:{route_table_id}"))
    }

    async fn network_acls(&self, _vpc_id: &str) -> Result<Vec<NetworkAcl>> {
        self.record("list:network_acls")?;
        Ok(self.network_acls.clone())
    }

    async fn delete_network_acl(&self, network_acl_id: &str) -> Result<()> {
        self.record(format!("delete:{network_acl_id}"))
    }

    async fn security_groups(&self, _vpc_id: &str) -> Result<Vec<SecurityGroup>> {
        self.record("list:security_groups")?;
        Ok(self.security_groups.clone())
    }

    async fn delete_security_group(&self, group_id: &str) -> Result<()> {
        self.record(format!("delete:{group_id}"))
    }

    async fn delete_vpc(&self, vpc_id: &str) -> Result<()> {
        self.record(format!("delete-vpc:{vpc_id}"))
    }
}
