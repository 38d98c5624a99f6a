//! This crate provides the core business logic for VPC Topology:
//! - Raw AWS resource records and the snapshot document format
//! - Resource normalization into a cross-referenced network graph
//! - Security-group reachability analysis between EC2, RDS, and Lambda
//!

mod analyze;
mod error;
mod normalize;
mod raw;
pub mod sample;
mod types;

// Re-exports for a small, focused public API
pub use analyze::analyze;
pub use error::{TopologyError, TopologyResult};
pub use normalize::normalize;
pub use raw::{
    RawArchitecture, RawDbInstance, RawDbSubnetGroup, RawDbSubnetGroupMember, RawEndpoint,
    RawFunction, RawGroupIdentifier, RawIgwAttachment, RawInstance, RawInstanceState,
    RawInternetGateway, RawIpPermission, RawIpRange, RawRoute, RawRouteTable,
    RawRouteTableAssociation, RawSecurityGroup, RawSubnet, RawTag, RawUserIdGroupPair, RawVpc,
    RawVpcConfig, RawVpcSecurityGroupMembership,
};
pub use types::{
    Connection, ConnectionStatus, Ec2Instance, InboundRule, InternetGateway, InternetGatewayRoute,
    LambdaFunction, NetworkGraph, OutboundRule, RdsInstance, ResourceType, Route, SecurityGroup,
    SecurityGroupRef, Subnet, Tag, Topology, Vpc,
};

/// Build the full rendering-layer payload from raw provider records:
/// normalize, then evaluate reachability for every relevant resource pair.
pub fn build_topology(raw: &RawArchitecture) -> Topology {
    let graph = normalize(raw);
    let connections = analyze(&graph);
    Topology { graph, connections }
}
