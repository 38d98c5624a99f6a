//! Security-group reachability analysis.
//!
//! Evaluates, for every ordered (EC2, RDS) and (EC2, Lambda) pair in the
//! normalized graph, whether a connection from source to target is
//! permitted by the attached security-group rules, and synthesizes a
//! diagnostic message when it is not. Pure and deterministic: fixed input
//! yields the same verdicts in the same order every time.
//!
//! The two pairings are intentionally asymmetric. EC2 to RDS only checks
//! the target's inbound rules; EC2 to Lambda requires a shared VPC, an
//! inbound match on the Lambda side, and an outbound match on the EC2 side.

use crate::types::{
    Connection, ConnectionStatus, NetworkGraph, ResourceType, SecurityGroup, SecurityGroupRef,
};
use std::collections::HashMap;

/// Outbound destination that matches any target.
const OPEN_WORLD_CIDR: &str = "0.0.0.0/0";

/// Sentinel protocol meaning "all protocols".
const ALL_PROTOCOLS: &str = "-1";

/// Evaluate reachability for every relevant resource pair.
///
/// Emits exactly one record per (EC2, RDS) pair followed by one per
/// (EC2, Lambda) pair, in input order.
pub fn analyze(graph: &NetworkGraph) -> Vec<Connection> {
    let groups_by_id: HashMap<&str, &SecurityGroup> = graph
        .security_groups
        .iter()
        .map(|sg| (sg.id.as_str(), sg))
        .collect();

    let mut connections = Vec::with_capacity(
        graph.ec2_instances.len()
            * (graph.rds_instances.len() + graph.lambda_functions.len()),
    );

    for ec2 in &graph.ec2_instances {
        let ec2_group_ids = group_ids(&ec2.security_groups);
        for rds in &graph.rds_instances {
            let rds_groups = resolve_groups(&groups_by_id, &rds.security_groups);

            // Inbound-only: the RDS side decides, regardless of VPC.
            let allowed = inbound_allows(&rds_groups, &ec2_group_ids);
            let error_message = (!allowed).then(|| {
                format!(
                    "Security group rules don't allow connection from EC2 ({}) to RDS ({})",
                    ec2.id, rds.id
                )
            });

            connections.push(Connection {
                source_id: ec2.id.clone(),
                target_id: rds.id.clone(),
                source_type: ResourceType::Ec2,
                target_type: ResourceType::Rds,
                status: status_of(allowed),
                error_message,
            });
        }
    }

    for ec2 in &graph.ec2_instances {
        let ec2_group_ids = group_ids(&ec2.security_groups);
        for lambda in &graph.lambda_functions {
            // Direct connectivity requires both ends inside the same VPC;
            // a Lambda outside any VPC can never match.
            let same_vpc = matches!(
                (&ec2.vpc_id, &lambda.vpc_id),
                (Some(a), Some(b)) if a == b
            );
            if !same_vpc {
                connections.push(Connection {
                    source_id: ec2.id.clone(),
                    target_id: lambda.id.clone(),
                    source_type: ResourceType::Ec2,
                    target_type: ResourceType::Lambda,
                    status: ConnectionStatus::Blocked,
                    error_message: Some("EC2 and Lambda are in different VPCs".to_string()),
                });
                continue;
            }

            let lambda_group_ids = group_ids(&lambda.security_groups);
            let lambda_groups = resolve_groups(&groups_by_id, &lambda.security_groups);

            let (allowed, error_message) = if !inbound_allows(&lambda_groups, &ec2_group_ids) {
                (
                    false,
                    Some(format!(
                        "Lambda ({}) security groups don't allow inbound from EC2 ({})",
                        lambda.id, ec2.id
                    )),
                )
            } else {
                let ec2_groups = resolve_groups(&groups_by_id, &ec2.security_groups);
                if outbound_allows(&ec2_groups, &lambda_group_ids) {
                    (true, None)
                } else {
                    (
                        false,
                        Some(format!(
                            "EC2 ({}) security groups don't allow outbound to Lambda ({})",
                            ec2.id, lambda.id
                        )),
                    )
                }
            };

            connections.push(Connection {
                source_id: ec2.id.clone(),
                target_id: lambda.id.clone(),
                source_type: ResourceType::Ec2,
                target_type: ResourceType::Lambda,
                status: status_of(allowed),
                error_message,
            });
        }
    }

    connections
}

fn status_of(allowed: bool) -> ConnectionStatus {
    if allowed {
        ConnectionStatus::Allowed
    } else {
        ConnectionStatus::Blocked
    }
}

fn group_ids(refs: &[SecurityGroupRef]) -> Vec<&str> {
    refs.iter().map(|r| r.group_id.as_str()).collect()
}

/// Resolve group references to full group objects, dropping dangling ids.
fn resolve_groups<'a>(
    groups_by_id: &HashMap<&str, &'a SecurityGroup>,
    refs: &[SecurityGroupRef],
) -> Vec<&'a SecurityGroup> {
    refs.iter()
        .filter_map(|r| groups_by_id.get(r.group_id.as_str()).copied())
        .collect()
}

/// Does any of the target's groups carry an inbound rule naming one of the
/// source's group ids? Exact string equality; CIDR sources never match.
fn inbound_allows(target_groups: &[&SecurityGroup], source_group_ids: &[&str]) -> bool {
    target_groups.iter().any(|sg| {
        sg.inbound_rules
            .iter()
            .any(|rule| source_group_ids.contains(&rule.source.as_str()))
    })
}

/// Does any of the source's groups carry an outbound rule naming one of the
/// target's group ids, the open-world CIDR, or the all-protocols sentinel?
fn outbound_allows(source_groups: &[&SecurityGroup], target_group_ids: &[&str]) -> bool {
    source_groups.iter().any(|sg| {
        sg.outbound_rules.iter().any(|rule| {
            target_group_ids.contains(&rule.destination.as_str())
                || rule.destination == OPEN_WORLD_CIDR
                || rule.protocol == ALL_PROTOCOLS
        })
    })
}
