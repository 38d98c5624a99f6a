//! Conversion of AWS SDK models into the core crate's raw records.
//!
//! Purely structural: every field the normalizer reads is carried over,
//! nothing is interpreted here.

use vpc_topology_core::{
    RawDbInstance, RawDbSubnetGroup, RawDbSubnetGroupMember, RawEndpoint, RawFunction,
    RawGroupIdentifier, RawIgwAttachment, RawInstance, RawInstanceState, RawInternetGateway,
    RawIpPermission, RawIpRange, RawRoute, RawRouteTable, RawRouteTableAssociation,
    RawSecurityGroup, RawSubnet, RawTag, RawUserIdGroupPair, RawVpc, RawVpcConfig,
    RawVpcSecurityGroupMembership,
};

pub(crate) fn vpc(vpc: &aws_sdk_ec2::types::Vpc) -> RawVpc {
    RawVpc {
        vpc_id: vpc.vpc_id().map(str::to_string),
        cidr_block: vpc.cidr_block().map(str::to_string),
        state: vpc.state().map(|s| s.as_str().to_string()),
        is_default: vpc.is_default(),
        tags: tags(vpc.tags()),
    }
}

pub(crate) fn subnet(subnet: &aws_sdk_ec2::types::Subnet) -> RawSubnet {
    RawSubnet {
        subnet_id: subnet.subnet_id().map(str::to_string),
        vpc_id: subnet.vpc_id().map(str::to_string),
        cidr_block: subnet.cidr_block().map(str::to_string),
        availability_zone: subnet.availability_zone().map(str::to_string),
        tags: tags(subnet.tags()),
    }
}

pub(crate) fn instance(instance: &aws_sdk_ec2::types::Instance) -> RawInstance {
    RawInstance {
        instance_id: instance.instance_id().map(str::to_string),
        instance_type: instance.instance_type().map(|t| t.as_str().to_string()),
        state: instance.state().map(|s| RawInstanceState {
            name: s.name().map(|n| n.as_str().to_string()),
        }),
        private_ip_address: instance.private_ip_address().map(str::to_string),
        public_ip_address: instance.public_ip_address().map(str::to_string),
        vpc_id: instance.vpc_id().map(str::to_string),
        subnet_id: instance.subnet_id().map(str::to_string),
        security_groups: instance
            .security_groups()
            .iter()
            .map(|g| RawGroupIdentifier {
                group_id: g.group_id().map(str::to_string),
                group_name: g.group_name().map(str::to_string),
            })
            .collect(),
        tags: tags(instance.tags()),
    }
}

pub(crate) fn security_group(sg: &aws_sdk_ec2::types::SecurityGroup) -> RawSecurityGroup {
    RawSecurityGroup {
        group_id: sg.group_id().map(str::to_string),
        group_name: sg.group_name().map(str::to_string),
        description: sg.description().map(str::to_string),
        vpc_id: sg.vpc_id().map(str::to_string),
        ip_permissions: sg.ip_permissions().iter().map(ip_permission).collect(),
        ip_permissions_egress: sg
            .ip_permissions_egress()
            .iter()
            .map(ip_permission)
            .collect(),
    }
}

fn ip_permission(perm: &aws_sdk_ec2::types::IpPermission) -> RawIpPermission {
    RawIpPermission {
        ip_protocol: perm.ip_protocol().map(str::to_string),
        from_port: perm.from_port(),
        to_port: perm.to_port(),
        ip_ranges: perm
            .ip_ranges()
            .iter()
            .map(|r| RawIpRange {
                cidr_ip: r.cidr_ip().map(str::to_string),
                description: r.description().map(str::to_string),
            })
            .collect(),
        user_id_group_pairs: perm
            .user_id_group_pairs()
            .iter()
            .map(|p| RawUserIdGroupPair {
                group_id: p.group_id().map(str::to_string),
            })
            .collect(),
    }
}

pub(crate) fn internet_gateway(igw: &aws_sdk_ec2::types::InternetGateway) -> RawInternetGateway {
    RawInternetGateway {
        internet_gateway_id: igw.internet_gateway_id().map(str::to_string),
        attachments: igw
            .attachments()
            .iter()
            .map(|a| RawIgwAttachment {
                vpc_id: a.vpc_id().map(str::to_string),
                state: a.state().map(|s| s.as_str().to_string()),
            })
            .collect(),
        tags: tags(igw.tags()),
    }
}

pub(crate) fn route_table(rt: &aws_sdk_ec2::types::RouteTable) -> RawRouteTable {
    RawRouteTable {
        route_table_id: rt.route_table_id().map(str::to_string),
        vpc_id: rt.vpc_id().map(str::to_string),
        associations: rt
            .associations()
            .iter()
            .map(|a| RawRouteTableAssociation {
                subnet_id: a.subnet_id().map(str::to_string),
                main: a.main(),
            })
            .collect(),
        routes: rt
            .routes()
            .iter()
            .map(|r| RawRoute {
                destination_cidr_block: r.destination_cidr_block().map(str::to_string),
                gateway_id: r.gateway_id().map(str::to_string),
                instance_id: r.instance_id().map(str::to_string),
                nat_gateway_id: r.nat_gateway_id().map(str::to_string),
            })
            .collect(),
    }
}

pub(crate) fn db_instance(db: &aws_sdk_rds::types::DbInstance) -> RawDbInstance {
    RawDbInstance {
        db_instance_identifier: db.db_instance_identifier().map(str::to_string),
        db_name: db.db_name().map(str::to_string),
        engine: db.engine().map(str::to_string),
        engine_version: db.engine_version().map(str::to_string),
        db_instance_status: db.db_instance_status().map(str::to_string),
        endpoint: db.endpoint().map(|e| RawEndpoint {
            address: e.address().map(str::to_string),
            port: e.port(),
        }),
        vpc_security_groups: db
            .vpc_security_groups()
            .iter()
            .map(|m| RawVpcSecurityGroupMembership {
                vpc_security_group_id: m.vpc_security_group_id().map(str::to_string),
                status: m.status().map(str::to_string),
            })
            .collect(),
        db_subnet_group: db.db_subnet_group().map(|g| RawDbSubnetGroup {
            vpc_id: g.vpc_id().map(str::to_string),
            subnets: g
                .subnets()
                .iter()
                .map(|s| RawDbSubnetGroupMember {
                    subnet_identifier: s.subnet_identifier().map(str::to_string),
                })
                .collect(),
        }),
    }
}

pub(crate) fn function(function: &aws_sdk_lambda::types::FunctionConfiguration) -> RawFunction {
    RawFunction {
        function_name: function.function_name().map(str::to_string),
        runtime: function.runtime().map(|r| r.as_str().to_string()),
        memory_size: function.memory_size(),
        timeout: function.timeout(),
        last_modified: function.last_modified().map(str::to_string),
        vpc_config: function.vpc_config().map(|c| RawVpcConfig {
            vpc_id: c.vpc_id().map(str::to_string),
            subnet_ids: c.subnet_ids().to_vec(),
            security_group_ids: c.security_group_ids().to_vec(),
        }),
    }
}

fn tags(tags: &[aws_sdk_ec2::types::Tag]) -> Vec<RawTag> {
    tags.iter()
        .map(|t| RawTag {
            key: t.key().map(str::to_string),
            value: t.value().map(str::to_string),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_ec2::types::{
        IpPermission, IpRange, SecurityGroup, Tag, UserIdGroupPair, Vpc, VpcState,
    };
    use aws_sdk_lambda::types::{FunctionConfiguration, Runtime, VpcConfigResponse};
    use aws_sdk_rds::types::{DbInstance, DbSubnetGroup, Endpoint, Subnet as RdsSubnet};

    #[test]
    fn test_vpc_conversion_carries_tags_and_state() {
        let model = Vpc::builder()
            .vpc_id("vpc-1")
            .cidr_block("10.0.0.0/16")
            .state(VpcState::from("available"))
            .is_default(false)
            .tags(Tag::builder().key("Name").value("Main").build())
            .build();

        let raw = vpc(&model);
        assert_eq!(raw.vpc_id.as_deref(), Some("vpc-1"));
        assert_eq!(raw.state.as_deref(), Some("available"));
        assert_eq!(raw.tags[0].key.as_deref(), Some("Name"));
        assert_eq!(raw.tags[0].value.as_deref(), Some("Main"));
    }

    #[test]
    fn test_security_group_conversion_keeps_rule_structure() {
        let model = SecurityGroup::builder()
            .group_id("sg-1")
            .group_name("app")
            .vpc_id("vpc-1")
            .ip_permissions(
                IpPermission::builder()
                    .ip_protocol("tcp")
                    .from_port(3306)
                    .to_port(3306)
                    .user_id_group_pairs(UserIdGroupPair::builder().group_id("sg-2").build())
                    .build(),
            )
            .ip_permissions_egress(
                IpPermission::builder()
                    .ip_protocol("-1")
                    .ip_ranges(IpRange::builder().cidr_ip("0.0.0.0/0").build())
                    .build(),
            )
            .build();

        let raw = security_group(&model);
        assert_eq!(raw.ip_permissions.len(), 1);
        assert_eq!(raw.ip_permissions[0].from_port, Some(3306));
        assert_eq!(
            raw.ip_permissions[0].user_id_group_pairs[0]
                .group_id
                .as_deref(),
            Some("sg-2")
        );
        assert_eq!(raw.ip_permissions_egress[0].ip_protocol.as_deref(), Some("-1"));
        assert_eq!(
            raw.ip_permissions_egress[0].ip_ranges[0].cidr_ip.as_deref(),
            Some("0.0.0.0/0")
        );
    }

    #[test]
    fn test_db_instance_conversion_resolves_subnet_group() {
        let model = DbInstance::builder()
            .db_instance_identifier("db-1")
            .engine("mysql")
            .endpoint(Endpoint::builder().address("db-1.example.com").port(3306).build())
            .db_subnet_group(
                DbSubnetGroup::builder()
                    .vpc_id("vpc-1")
                    .subnets(RdsSubnet::builder().subnet_identifier("subnet-1").build())
                    .build(),
            )
            .build();

        let raw = db_instance(&model);
        assert_eq!(raw.db_instance_identifier.as_deref(), Some("db-1"));
        assert_eq!(raw.endpoint.as_ref().and_then(|e| e.port), Some(3306));
        let group = raw.db_subnet_group.expect("subnet group");
        assert_eq!(group.vpc_id.as_deref(), Some("vpc-1"));
        assert_eq!(group.subnets[0].subnet_identifier.as_deref(), Some("subnet-1"));
    }

    #[test]
    fn test_function_conversion_preserves_vpc_config() {
        let model = FunctionConfiguration::builder()
            .function_name("fn-1")
            .runtime(Runtime::from("nodejs20.x"))
            .memory_size(256)
            .vpc_config(
                VpcConfigResponse::builder()
                    .vpc_id("vpc-1")
                    .subnet_ids("subnet-1")
                    .security_group_ids("sg-l")
                    .build(),
            )
            .build();

        let raw = function(&model);
        assert_eq!(raw.function_name.as_deref(), Some("fn-1"));
        assert_eq!(raw.runtime.as_deref(), Some("nodejs20.x"));
        let config = raw.vpc_config.expect("vpc config");
        assert_eq!(config.vpc_id.as_deref(), Some("vpc-1"));
        assert_eq!(config.security_group_ids, vec!["sg-l".to_string()]);
    }

    #[test]
    fn test_function_without_vpc_config_stays_detached() {
        let model = FunctionConfiguration::builder()
            .function_name("fn-2")
            .build();
        assert!(function(&model).vpc_config.is_none());
    }
}
