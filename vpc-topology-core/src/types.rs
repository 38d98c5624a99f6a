//! Normalized network model and analyzer output types.
//!
//! These are the typed, immutable records the analyzer accepts and the
//! rendering layer consumes; the serde casing matches the payload shape
//! that layer expects (`sourceId`, `errorMessage`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// A route entry as displayed for a subnet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub destination: String,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subnet {
    pub id: String,
    pub name: String,
    pub cidr: Option<String>,
    pub az: Option<String>,
    pub vpc_id: Option<String>,
    pub is_public: bool,
    pub route_table_id: Option<String>,
    pub ec2_count: usize,
    pub rds_count: usize,
    pub routes: Vec<Route>,
}

/// A route table carrying a route to an internet gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternetGatewayRoute {
    pub route_table_id: Option<String>,
    pub subnet_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InternetGateway {
    pub id: String,
    pub name: String,
    pub state: String,
    pub vpc_id: String,
    pub vpc_name: String,
    pub vpc_cidr: Option<String>,
    pub route_tables: Vec<InternetGatewayRoute>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vpc {
    pub id: String,
    pub name: String,
    pub cidr: Option<String>,
    pub state: Option<String>,
    pub is_default: bool,
    pub subnet_count: usize,
    pub instance_count: usize,
    pub sg_count: usize,
    pub tags: Vec<Tag>,
    pub internet_gateway: Option<InternetGateway>,
    pub subnets: Vec<Subnet>,
}

/// A resolved reference from a resource to one of its security groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroupRef {
    pub group_id: String,
    pub group_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ec2Instance {
    pub id: String,
    pub name: String,
    pub instance_type: Option<String>,
    pub state: Option<String>,
    pub private_ip: Option<String>,
    pub public_ip: Option<String>,
    pub vpc_id: Option<String>,
    pub subnet_id: Option<String>,
    pub security_groups: Vec<SecurityGroupRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RdsInstance {
    pub id: String,
    pub db_name: Option<String>,
    pub engine: Option<String>,
    pub engine_version: Option<String>,
    pub status: Option<String>,
    pub endpoint: Option<String>,
    pub port: Option<i32>,
    pub vpc_id: Option<String>,
    pub subnet_ids: Vec<String>,
    pub security_groups: Vec<SecurityGroupRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaFunction {
    pub id: String,
    pub name: String,
    pub runtime: Option<String>,
    pub memory: Option<i32>,
    pub timeout: Option<i32>,
    pub last_modified: Option<String>,
    /// `None` when the function is not attached to a VPC.
    pub vpc_id: Option<String>,
    pub subnet_ids: Vec<String>,
    pub security_groups: Vec<SecurityGroupRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundRule {
    pub protocol: String,
    pub port_range: String,
    /// A security-group id or a CIDR block.
    pub source: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundRule {
    pub protocol: String,
    pub port_range: String,
    /// A security-group id or a CIDR block.
    pub destination: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityGroup {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub vpc_id: Option<String>,
    pub inbound_rules: Vec<InboundRule>,
    pub outbound_rules: Vec<OutboundRule>,
    pub ec2_count: usize,
    pub rds_count: usize,
}

/// The kind of resource on one end of an evaluated connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Ec2,
    Rds,
    Lambda,
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ec2 => write!(f, "ec2"),
            Self::Rds => write!(f, "rds"),
            Self::Lambda => write!(f, "lambda"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Allowed,
    Blocked,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allowed => write!(f, "allowed"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// One reachability verdict for a directed resource pair.
///
/// `error_message` is `Some` exactly when `status` is `Blocked`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub source_id: String,
    pub target_id: String,
    pub source_type: ResourceType,
    pub target_type: ResourceType,
    pub status: ConnectionStatus,
    pub error_message: Option<String>,
}

/// The normalized resource graph the analyzer consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkGraph {
    pub vpcs: Vec<Vpc>,
    pub ec2_instances: Vec<Ec2Instance>,
    pub rds_instances: Vec<RdsInstance>,
    pub lambda_functions: Vec<LambdaFunction>,
    pub security_groups: Vec<SecurityGroup>,
}

/// The complete rendering-layer payload: the normalized graph plus the
/// reachability verdicts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    #[serde(flatten)]
    pub graph: NetworkGraph,
    pub connections: Vec<Connection>,
}
