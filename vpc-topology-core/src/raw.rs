//! Raw AWS resource records, shaped as the provider's describe/list calls
//! return them.
//!
//! Every field is optional or defaulted: the normalizer must tolerate
//! partially-populated records, so nothing here is required at the serde
//! level. `RawArchitecture` doubles as the on-disk snapshot document.

use crate::error::TopologyResult;
use serde::{Deserialize, Serialize};

/// A `{Key, Value}` resource tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawTag {
    pub key: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawVpc {
    pub vpc_id: Option<String>,
    pub cidr_block: Option<String>,
    pub state: Option<String>,
    pub is_default: Option<bool>,
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawSubnet {
    pub subnet_id: Option<String>,
    pub vpc_id: Option<String>,
    pub cidr_block: Option<String>,
    pub availability_zone: Option<String>,
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawInstanceState {
    pub name: Option<String>,
}

/// A security-group reference as attached to an EC2 instance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawGroupIdentifier {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawInstance {
    pub instance_id: Option<String>,
    pub instance_type: Option<String>,
    pub state: Option<RawInstanceState>,
    pub private_ip_address: Option<String>,
    pub public_ip_address: Option<String>,
    pub vpc_id: Option<String>,
    pub subnet_id: Option<String>,
    pub security_groups: Vec<RawGroupIdentifier>,
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawEndpoint {
    pub address: Option<String>,
    pub port: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawVpcSecurityGroupMembership {
    pub vpc_security_group_id: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawDbSubnetGroupMember {
    pub subnet_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawDbSubnetGroup {
    pub vpc_id: Option<String>,
    pub subnets: Vec<RawDbSubnetGroupMember>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawDbInstance {
    #[serde(rename = "DBInstanceIdentifier")]
    pub db_instance_identifier: Option<String>,
    #[serde(rename = "DBName")]
    pub db_name: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    #[serde(rename = "DBInstanceStatus")]
    pub db_instance_status: Option<String>,
    pub endpoint: Option<RawEndpoint>,
    pub vpc_security_groups: Vec<RawVpcSecurityGroupMembership>,
    #[serde(rename = "DBSubnetGroup")]
    pub db_subnet_group: Option<RawDbSubnetGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawVpcConfig {
    /// Empty string when the function is not attached to a VPC.
    pub vpc_id: Option<String>,
    pub subnet_ids: Vec<String>,
    pub security_group_ids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawFunction {
    pub function_name: Option<String>,
    pub runtime: Option<String>,
    pub memory_size: Option<i32>,
    pub timeout: Option<i32>,
    pub last_modified: Option<String>,
    pub vpc_config: Option<RawVpcConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawIpRange {
    pub cidr_ip: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawUserIdGroupPair {
    pub group_id: Option<String>,
}

/// One inbound or outbound permission entry of a security group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawIpPermission {
    /// `"-1"` means all protocols; ports are absent in that case.
    pub ip_protocol: Option<String>,
    pub from_port: Option<i32>,
    pub to_port: Option<i32>,
    pub ip_ranges: Vec<RawIpRange>,
    pub user_id_group_pairs: Vec<RawUserIdGroupPair>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawSecurityGroup {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub description: Option<String>,
    pub vpc_id: Option<String>,
    pub ip_permissions: Vec<RawIpPermission>,
    pub ip_permissions_egress: Vec<RawIpPermission>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawIgwAttachment {
    pub vpc_id: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawInternetGateway {
    pub internet_gateway_id: Option<String>,
    pub attachments: Vec<RawIgwAttachment>,
    pub tags: Vec<RawTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawRouteTableAssociation {
    pub subnet_id: Option<String>,
    pub main: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawRoute {
    pub destination_cidr_block: Option<String>,
    pub gateway_id: Option<String>,
    pub instance_id: Option<String>,
    pub nat_gateway_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawRouteTable {
    pub route_table_id: Option<String>,
    pub vpc_id: Option<String>,
    pub associations: Vec<RawRouteTableAssociation>,
    pub routes: Vec<RawRoute>,
}

/// The complete set of raw collections one fetch cycle produces.
///
/// This is also the snapshot document format: the JSON keys match the AWS
/// response field names, so a snapshot is just the describe/list payloads
/// bundled into one object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RawArchitecture {
    pub vpcs: Vec<RawVpc>,
    pub subnets: Vec<RawSubnet>,
    pub instances: Vec<RawInstance>,
    #[serde(rename = "DBInstances")]
    pub db_instances: Vec<RawDbInstance>,
    pub functions: Vec<RawFunction>,
    pub security_groups: Vec<RawSecurityGroup>,
    pub internet_gateways: Vec<RawInternetGateway>,
    pub route_tables: Vec<RawRouteTable>,
}

impl RawArchitecture {
    /// Parse a snapshot document.
    pub fn from_json(text: &str) -> TopologyResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize this architecture as a pretty-printed snapshot document.
    pub fn to_json_pretty(&self) -> TopologyResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
