//! Built-in sample architecture.
//!
//! Used as the fallback dataset when a live fetch fails, and by the CLI's
//! `sample` subcommand. A small three-tier layout: public web instances,
//! a private app instance, a reachable main database, an unreachable
//! analytics database, one VPC-attached Lambda, and one Lambda outside
//! any VPC.

use crate::raw::{
    RawArchitecture, RawDbInstance, RawDbSubnetGroup, RawDbSubnetGroupMember, RawEndpoint,
    RawFunction, RawGroupIdentifier, RawIgwAttachment, RawInstance, RawInstanceState,
    RawInternetGateway, RawIpPermission, RawIpRange, RawRoute, RawRouteTable,
    RawRouteTableAssociation, RawSecurityGroup, RawSubnet, RawTag, RawUserIdGroupPair, RawVpc,
    RawVpcConfig, RawVpcSecurityGroupMembership,
};

const VPC_ID: &str = "vpc-12345";

/// Build the sample raw dataset.
pub fn sample_architecture() -> RawArchitecture {
    RawArchitecture {
        vpcs: vec![RawVpc {
            vpc_id: Some(VPC_ID.to_string()),
            cidr_block: Some("10.0.0.0/16".to_string()),
            state: Some("available".to_string()),
            is_default: Some(false),
            tags: vec![tag("Name", "Main VPC"), tag("Environment", "Production")],
        }],
        subnets: vec![
            subnet("subnet-public1", "10.0.1.0/24", "us-east-1a", "Public Subnet 1"),
            subnet("subnet-public2", "10.0.2.0/24", "us-east-1b", "Public Subnet 2"),
            subnet("subnet-private1", "10.0.3.0/24", "us-east-1a", "Private Subnet 1"),
            subnet("subnet-private2", "10.0.4.0/24", "us-east-1b", "Private Subnet 2"),
        ],
        instances: vec![
            instance("i-web1", "Web Server 1", "subnet-public1", "sg-webserver", Some("54.123.45.67")),
            instance("i-web2", "Web Server 2", "subnet-public2", "sg-webserver", Some("54.123.45.68")),
            instance("i-app1", "App Server 1", "subnet-private1", "sg-appserver", None),
        ],
        db_instances: vec![
            db_instance("db-main", "appdb", "mysql", 3306, "sg-database"),
            db_instance("db-analytics", "analytics", "postgres", 5432, "sg-analytics"),
        ],
        functions: vec![
            RawFunction {
                function_name: Some("image-resizer".to_string()),
                runtime: Some("nodejs20.x".to_string()),
                memory_size: Some(256),
                timeout: Some(30),
                last_modified: Some("2024-11-02T09:30:00.000+0000".to_string()),
                vpc_config: Some(RawVpcConfig {
                    vpc_id: Some(VPC_ID.to_string()),
                    subnet_ids: vec!["subnet-private1".to_string(), "subnet-private2".to_string()],
                    security_group_ids: vec!["sg-lambda".to_string()],
                }),
            },
            RawFunction {
                function_name: Some("cron-cleanup".to_string()),
                runtime: Some("python3.12".to_string()),
                memory_size: Some(128),
                timeout: Some(60),
                last_modified: Some("2024-10-18T17:05:00.000+0000".to_string()),
                vpc_config: None,
            },
        ],
        security_groups: vec![
            security_group(
                "sg-webserver",
                "WebServer-SG",
                "Web tier",
                vec![
                    cidr_rule("tcp", Some(80), Some(80), "0.0.0.0/0", "HTTP"),
                    cidr_rule("tcp", Some(443), Some(443), "0.0.0.0/0", "HTTPS"),
                ],
            ),
            security_group(
                "sg-appserver",
                "AppServer-SG",
                "Application tier",
                vec![group_rule("tcp", Some(8080), Some(8080), "sg-webserver")],
            ),
            security_group(
                "sg-database",
                "Database-SG",
                "Main database",
                vec![group_rule("tcp", Some(3306), Some(3306), "sg-appserver")],
            ),
            security_group(
                "sg-analytics",
                "Analytics-SG",
                "Analytics database, reachable from the data platform only",
                vec![cidr_rule("tcp", Some(5432), Some(5432), "10.1.0.0/16", "Data platform")],
            ),
            security_group(
                "sg-lambda",
                "Lambda-SG",
                "VPC-attached functions",
                vec![group_rule("tcp", Some(443), Some(443), "sg-appserver")],
            ),
        ],
        internet_gateways: vec![RawInternetGateway {
            internet_gateway_id: Some("igw-12345".to_string()),
            attachments: vec![RawIgwAttachment {
                vpc_id: Some(VPC_ID.to_string()),
                state: Some("available".to_string()),
            }],
            tags: vec![tag("Name", "Main IGW")],
        }],
        route_tables: vec![
            RawRouteTable {
                route_table_id: Some("rtb-public".to_string()),
                vpc_id: Some(VPC_ID.to_string()),
                associations: vec![association("subnet-public1"), association("subnet-public2")],
                routes: vec![
                    local_route(),
                    RawRoute {
                        destination_cidr_block: Some("0.0.0.0/0".to_string()),
                        gateway_id: Some("igw-12345".to_string()),
                        ..RawRoute::default()
                    },
                ],
            },
            RawRouteTable {
                route_table_id: Some("rtb-private".to_string()),
                vpc_id: Some(VPC_ID.to_string()),
                associations: vec![association("subnet-private1"), association("subnet-private2")],
                routes: vec![local_route()],
            },
        ],
    }
}

fn tag(key: &str, value: &str) -> RawTag {
    RawTag {
        key: Some(key.to_string()),
        value: Some(value.to_string()),
    }
}

fn subnet(id: &str, cidr: &str, az: &str, name: &str) -> RawSubnet {
    RawSubnet {
        subnet_id: Some(id.to_string()),
        vpc_id: Some(VPC_ID.to_string()),
        cidr_block: Some(cidr.to_string()),
        availability_zone: Some(az.to_string()),
        tags: vec![tag("Name", name)],
    }
}

fn instance(
    id: &str,
    name: &str,
    subnet_id: &str,
    group_id: &str,
    public_ip: Option<&str>,
) -> RawInstance {
    RawInstance {
        instance_id: Some(id.to_string()),
        instance_type: Some("t3.micro".to_string()),
        state: Some(RawInstanceState {
            name: Some("running".to_string()),
        }),
        private_ip_address: Some("10.0.1.10".to_string()),
        public_ip_address: public_ip.map(str::to_string),
        vpc_id: Some(VPC_ID.to_string()),
        subnet_id: Some(subnet_id.to_string()),
        security_groups: vec![RawGroupIdentifier {
            group_id: Some(group_id.to_string()),
            group_name: None,
        }],
        tags: vec![tag("Name", name)],
    }
}

fn db_instance(id: &str, db_name: &str, engine: &str, port: i32, group_id: &str) -> RawDbInstance {
    RawDbInstance {
        db_instance_identifier: Some(id.to_string()),
        db_name: Some(db_name.to_string()),
        engine: Some(engine.to_string()),
        engine_version: None,
        db_instance_status: Some("available".to_string()),
        endpoint: Some(RawEndpoint {
            address: Some(format!("{id}.abc123.us-east-1.rds.amazonaws.com")),
            port: Some(port),
        }),
        vpc_security_groups: vec![RawVpcSecurityGroupMembership {
            vpc_security_group_id: Some(group_id.to_string()),
            status: Some("active".to_string()),
        }],
        db_subnet_group: Some(RawDbSubnetGroup {
            vpc_id: Some(VPC_ID.to_string()),
            subnets: vec![
                RawDbSubnetGroupMember {
                    subnet_identifier: Some("subnet-private1".to_string()),
                },
                RawDbSubnetGroupMember {
                    subnet_identifier: Some("subnet-private2".to_string()),
                },
            ],
        }),
    }
}

fn security_group(
    id: &str,
    name: &str,
    description: &str,
    inbound: Vec<RawIpPermission>,
) -> RawSecurityGroup {
    RawSecurityGroup {
        group_id: Some(id.to_string()),
        group_name: Some(name.to_string()),
        description: Some(description.to_string()),
        vpc_id: Some(VPC_ID.to_string()),
        ip_permissions: inbound,
        // Default egress: everything, everywhere.
        ip_permissions_egress: vec![RawIpPermission {
            ip_protocol: Some("-1".to_string()),
            ip_ranges: vec![RawIpRange {
                cidr_ip: Some("0.0.0.0/0".to_string()),
                description: None,
            }],
            ..RawIpPermission::default()
        }],
    }
}

fn cidr_rule(
    protocol: &str,
    from: Option<i32>,
    to: Option<i32>,
    cidr: &str,
    description: &str,
) -> RawIpPermission {
    RawIpPermission {
        ip_protocol: Some(protocol.to_string()),
        from_port: from,
        to_port: to,
        ip_ranges: vec![RawIpRange {
            cidr_ip: Some(cidr.to_string()),
            description: Some(description.to_string()),
        }],
        user_id_group_pairs: Vec::new(),
    }
}

fn group_rule(protocol: &str, from: Option<i32>, to: Option<i32>, group_id: &str) -> RawIpPermission {
    RawIpPermission {
        ip_protocol: Some(protocol.to_string()),
        from_port: from,
        to_port: to,
        ip_ranges: Vec::new(),
        user_id_group_pairs: vec![RawUserIdGroupPair {
            group_id: Some(group_id.to_string()),
        }],
    }
}

fn association(subnet_id: &str) -> RawRouteTableAssociation {
    RawRouteTableAssociation {
        subnet_id: Some(subnet_id.to_string()),
        main: Some(false),
    }
}

fn local_route() -> RawRoute {
    RawRoute {
        destination_cidr_block: Some("10.0.0.0/16".to_string()),
        gateway_id: None,
        instance_id: None,
        nat_gateway_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ConnectionStatus;
    use crate::{analyze, normalize};

    #[test]
    fn test_sample_normalizes_with_expected_shape() {
        let graph = normalize(&sample_architecture());
        assert_eq!(graph.vpcs.len(), 1);
        assert_eq!(graph.vpcs[0].subnets.len(), 4);
        assert!(graph.vpcs[0].internet_gateway.is_some());
        assert!(graph.vpcs[0].subnets[0].is_public);
        assert!(!graph.vpcs[0].subnets[2].is_public);
        assert_eq!(graph.ec2_instances.len(), 3);
        assert_eq!(graph.rds_instances.len(), 2);
        assert_eq!(graph.lambda_functions.len(), 2);
    }

    #[test]
    fn test_sample_app_server_reaches_main_database_only() {
        let graph = normalize(&sample_architecture());
        let connections = analyze(&graph);

        let verdict = |source: &str, target: &str| {
            connections
                .iter()
                .find(|c| c.source_id == source && c.target_id == target)
                .map(|c| c.status)
                .expect("pair present")
        };

        assert_eq!(verdict("i-app1", "db-main"), ConnectionStatus::Allowed);
        assert_eq!(verdict("i-app1", "db-analytics"), ConnectionStatus::Blocked);
        assert_eq!(verdict("i-web1", "db-main"), ConnectionStatus::Blocked);
        assert_eq!(verdict("i-app1", "image-resizer"), ConnectionStatus::Allowed);
        assert_eq!(verdict("i-web1", "image-resizer"), ConnectionStatus::Blocked);
        assert_eq!(verdict("i-app1", "cron-cleanup"), ConnectionStatus::Blocked);
    }
}
