//! Resource normalization: raw provider records into the cross-referenced
//! network graph.
//!
//! Every cross-reference (subnet to VPC, instance to security-group
//! objects, database to subnet-group membership) is resolved to direct
//! handles here, and derived facts (public subnets, per-subnet instance
//! counts) are computed once. Dangling references resolve to "no
//! association" rather than failing; normalization is total over any
//! structurally plausible input.

use crate::raw::{
    RawArchitecture, RawDbInstance, RawFunction, RawInstance, RawInternetGateway, RawIpPermission,
    RawRouteTable, RawSecurityGroup, RawSubnet, RawTag, RawVpc,
};
use crate::types::{
    Ec2Instance, InboundRule, InternetGateway, InternetGatewayRoute, LambdaFunction, NetworkGraph,
    OutboundRule, RdsInstance, Route, SecurityGroup, SecurityGroupRef, Subnet, Tag, Vpc,
};

const NAME_TAG: &str = "Name";

/// Route targets with this prefix identify an internet gateway.
const GATEWAY_ID_PREFIX: &str = "igw-";

/// Sentinel protocol meaning "all protocols"; such rules carry no ports.
const ALL_PROTOCOLS: &str = "-1";

const ALL_PORTS: &str = "All";

/// Build the normalized resource graph from raw provider records.
pub fn normalize(raw: &RawArchitecture) -> NetworkGraph {
    NetworkGraph {
        vpcs: raw.vpcs.iter().map(|v| normalize_vpc(v, raw)).collect(),
        ec2_instances: raw
            .instances
            .iter()
            .map(|i| normalize_instance(i, &raw.security_groups))
            .collect(),
        rds_instances: raw
            .db_instances
            .iter()
            .map(|db| normalize_db_instance(db, &raw.security_groups))
            .collect(),
        lambda_functions: raw
            .functions
            .iter()
            .map(|f| normalize_function(f, &raw.security_groups))
            .collect(),
        security_groups: raw
            .security_groups
            .iter()
            .map(|sg| normalize_security_group(sg, &raw.instances, &raw.db_instances))
            .collect(),
    }
}

fn normalize_vpc(vpc: &RawVpc, raw: &RawArchitecture) -> Vpc {
    let id = vpc.vpc_id.clone().unwrap_or_default();

    let vpc_subnets: Vec<&RawSubnet> = raw
        .subnets
        .iter()
        .filter(|s| s.vpc_id.as_deref() == Some(&id))
        .collect();
    let vpc_route_tables: Vec<&RawRouteTable> = raw
        .route_tables
        .iter()
        .filter(|rt| rt.vpc_id.as_deref() == Some(&id))
        .collect();
    let igw = raw
        .internet_gateways
        .iter()
        .find(|g| g.attachments.iter().any(|a| a.vpc_id.as_deref() == Some(&id)));

    let subnets: Vec<Subnet> = vpc_subnets
        .iter()
        .map(|s| normalize_subnet(s, &vpc_route_tables, &raw.instances, &raw.db_instances))
        .collect();

    Vpc {
        name: display_name(&vpc.tags, &id),
        cidr: vpc.cidr_block.clone(),
        state: vpc.state.clone(),
        is_default: vpc.is_default.unwrap_or(false),
        subnet_count: subnets.len(),
        instance_count: raw
            .instances
            .iter()
            .filter(|i| i.vpc_id.as_deref() == Some(&id))
            .count(),
        sg_count: raw
            .security_groups
            .iter()
            .filter(|sg| sg.vpc_id.as_deref() == Some(&id))
            .count(),
        tags: vpc
            .tags
            .iter()
            .map(|t| Tag {
                key: t.key.clone().unwrap_or_default(),
                value: t.value.clone().unwrap_or_default(),
            })
            .collect(),
        internet_gateway: igw.map(|g| normalize_internet_gateway(g, vpc, &id, &vpc_route_tables)),
        subnets,
        id,
    }
}

fn normalize_subnet(
    subnet: &RawSubnet,
    vpc_route_tables: &[&RawRouteTable],
    instances: &[RawInstance],
    db_instances: &[RawDbInstance],
) -> Subnet {
    let id = subnet.subnet_id.clone().unwrap_or_default();

    // The subnet's route table is the first one with an explicit
    // association; no association means private.
    let route_table = vpc_route_tables.iter().find(|rt| {
        rt.associations
            .iter()
            .any(|a| a.subnet_id.as_deref() == Some(&id))
    });

    let is_public = route_table.is_some_and(|rt| {
        rt.routes.iter().any(|r| {
            r.gateway_id
                .as_deref()
                .is_some_and(|g| g.starts_with(GATEWAY_ID_PREFIX))
        })
    });

    let routes = route_table.map_or_else(Vec::new, |rt| {
        rt.routes
            .iter()
            .map(|r| Route {
                destination: r
                    .destination_cidr_block
                    .clone()
                    .unwrap_or_else(|| "unknown".to_string()),
                target: r
                    .gateway_id
                    .clone()
                    .or_else(|| r.instance_id.clone())
                    .or_else(|| r.nat_gateway_id.clone())
                    .unwrap_or_else(|| "local".to_string()),
            })
            .collect()
    });

    Subnet {
        name: display_name(&subnet.tags, &id),
        cidr: subnet.cidr_block.clone(),
        az: subnet.availability_zone.clone(),
        vpc_id: subnet.vpc_id.clone(),
        is_public,
        route_table_id: route_table.and_then(|rt| rt.route_table_id.clone()),
        ec2_count: instances
            .iter()
            .filter(|i| i.subnet_id.as_deref() == Some(&id))
            .count(),
        rds_count: db_instances
            .iter()
            .filter(|db| db_subnet_group_contains(db, &id))
            .count(),
        routes,
        id,
    }
}

fn db_subnet_group_contains(db: &RawDbInstance, subnet_id: &str) -> bool {
    db.db_subnet_group.as_ref().is_some_and(|g| {
        g.subnets
            .iter()
            .any(|m| m.subnet_identifier.as_deref() == Some(subnet_id))
    })
}

fn normalize_internet_gateway(
    igw: &RawInternetGateway,
    vpc: &RawVpc,
    vpc_id: &str,
    vpc_route_tables: &[&RawRouteTable],
) -> InternetGateway {
    let id = igw.internet_gateway_id.clone().unwrap_or_default();
    InternetGateway {
        name: display_name(&igw.tags, &id),
        state: igw
            .attachments
            .first()
            .and_then(|a| a.state.clone())
            .unwrap_or_else(|| "detached".to_string()),
        vpc_id: vpc_id.to_string(),
        vpc_name: display_name(&vpc.tags, vpc_id),
        vpc_cidr: vpc.cidr_block.clone(),
        route_tables: vpc_route_tables
            .iter()
            .filter(|rt| rt.routes.iter().any(|r| r.gateway_id.as_deref() == Some(&id)))
            .map(|rt| InternetGatewayRoute {
                route_table_id: rt.route_table_id.clone(),
                subnet_count: rt.associations.len(),
            })
            .collect(),
        id,
    }
}

fn normalize_instance(instance: &RawInstance, groups: &[RawSecurityGroup]) -> Ec2Instance {
    let id = instance.instance_id.clone().unwrap_or_default();
    Ec2Instance {
        name: display_name(&instance.tags, &id),
        instance_type: instance.instance_type.clone(),
        state: instance.state.as_ref().and_then(|s| s.name.clone()),
        private_ip: instance.private_ip_address.clone(),
        public_ip: instance.public_ip_address.clone(),
        vpc_id: instance.vpc_id.clone(),
        subnet_id: instance.subnet_id.clone(),
        security_groups: instance
            .security_groups
            .iter()
            .map(|r| {
                let group_id = r.group_id.clone().unwrap_or_default();
                let full = lookup_group(groups, &group_id);
                SecurityGroupRef {
                    group_name: r.group_name.clone(),
                    description: full.and_then(|g| g.description.clone()),
                    group_id,
                }
            })
            .collect(),
        id,
    }
}

fn normalize_db_instance(db: &RawDbInstance, groups: &[RawSecurityGroup]) -> RdsInstance {
    let id = db.db_instance_identifier.clone().unwrap_or_default();
    RdsInstance {
        id,
        db_name: db.db_name.clone(),
        engine: db.engine.clone(),
        engine_version: db.engine_version.clone(),
        status: db.db_instance_status.clone(),
        endpoint: db.endpoint.as_ref().and_then(|e| e.address.clone()),
        port: db.endpoint.as_ref().and_then(|e| e.port),
        vpc_id: db.db_subnet_group.as_ref().and_then(|g| g.vpc_id.clone()),
        subnet_ids: db.db_subnet_group.as_ref().map_or_else(Vec::new, |g| {
            g.subnets
                .iter()
                .filter_map(|m| m.subnet_identifier.clone())
                .collect()
        }),
        security_groups: db
            .vpc_security_groups
            .iter()
            .map(|m| {
                let group_id = m.vpc_security_group_id.clone().unwrap_or_default();
                let full = lookup_group(groups, &group_id);
                SecurityGroupRef {
                    group_name: full.and_then(|g| g.group_name.clone()),
                    description: full.and_then(|g| g.description.clone()),
                    group_id,
                }
            })
            .collect(),
    }
}

fn normalize_function(function: &RawFunction, groups: &[RawSecurityGroup]) -> LambdaFunction {
    let id = function.function_name.clone().unwrap_or_default();
    let vpc_config = function.vpc_config.as_ref();
    LambdaFunction {
        name: id.clone(),
        runtime: function.runtime.clone(),
        memory: function.memory_size,
        timeout: function.timeout,
        last_modified: function.last_modified.clone(),
        // The Lambda API reports an empty VpcId for functions outside a VPC.
        vpc_id: vpc_config
            .and_then(|c| c.vpc_id.clone())
            .filter(|v| !v.is_empty()),
        subnet_ids: vpc_config.map_or_else(Vec::new, |c| c.subnet_ids.clone()),
        security_groups: vpc_config.map_or_else(Vec::new, |c| {
            c.security_group_ids
                .iter()
                .map(|group_id| {
                    let full = lookup_group(groups, group_id);
                    SecurityGroupRef {
                        group_id: group_id.clone(),
                        group_name: full.and_then(|g| g.group_name.clone()),
                        description: full.and_then(|g| g.description.clone()),
                    }
                })
                .collect()
        }),
        id,
    }
}

fn normalize_security_group(
    sg: &RawSecurityGroup,
    instances: &[RawInstance],
    db_instances: &[RawDbInstance],
) -> SecurityGroup {
    let id = sg.group_id.clone().unwrap_or_default();
    SecurityGroup {
        name: sg.group_name.clone(),
        description: sg.description.clone(),
        vpc_id: sg.vpc_id.clone(),
        inbound_rules: sg
            .ip_permissions
            .iter()
            .map(|perm| InboundRule {
                protocol: perm.ip_protocol.clone().unwrap_or_default(),
                port_range: ingress_port_range(perm),
                source: rule_peer(perm),
                description: rule_description(perm),
            })
            .collect(),
        outbound_rules: sg
            .ip_permissions_egress
            .iter()
            .map(|perm| OutboundRule {
                protocol: perm.ip_protocol.clone().unwrap_or_default(),
                port_range: egress_port_range(perm),
                destination: rule_peer(perm),
                description: rule_description(perm),
            })
            .collect(),
        ec2_count: instances
            .iter()
            .filter(|i| {
                i.security_groups
                    .iter()
                    .any(|r| r.group_id.as_deref() == Some(&id))
            })
            .count(),
        rds_count: db_instances
            .iter()
            .filter(|db| {
                db.vpc_security_groups
                    .iter()
                    .any(|m| m.vpc_security_group_id.as_deref() == Some(&id))
            })
            .count(),
        id,
    }
}

/// The rule's peer: a referenced security group wins over a CIDR range.
fn rule_peer(perm: &RawIpPermission) -> String {
    perm.user_id_group_pairs
        .first()
        .and_then(|p| p.group_id.clone())
        .or_else(|| perm.ip_ranges.first().and_then(|r| r.cidr_ip.clone()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn rule_description(perm: &RawIpPermission) -> String {
    perm.ip_ranges
        .first()
        .and_then(|r| r.description.clone())
        .unwrap_or_default()
}

fn ingress_port_range(perm: &RawIpPermission) -> String {
    match (perm.from_port, perm.to_port) {
        (Some(from), Some(to)) if from == to => from.to_string(),
        (Some(from), Some(to)) => format!("{from}-{to}"),
        _ => ALL_PORTS.to_string(),
    }
}

fn egress_port_range(perm: &RawIpPermission) -> String {
    if perm.ip_protocol.as_deref() == Some(ALL_PROTOCOLS) {
        ALL_PORTS.to_string()
    } else {
        ingress_port_range(perm)
    }
}

fn display_name(tags: &[RawTag], fallback: &str) -> String {
    tags.iter()
        .find(|t| t.key.as_deref() == Some(NAME_TAG))
        .and_then(|t| t.value.clone())
        .unwrap_or_else(|| fallback.to_string())
}

fn lookup_group<'a>(groups: &'a [RawSecurityGroup], id: &str) -> Option<&'a RawSecurityGroup> {
    groups.iter().find(|g| g.group_id.as_deref() == Some(id))
}
