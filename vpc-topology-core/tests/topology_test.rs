//! End-to-end pipeline tests: snapshot JSON in, rendering-layer payload out.

use vpc_topology_core::{build_topology, sample, ConnectionStatus, RawArchitecture, ResourceType};

const SNAPSHOT: &str = r#"{
    "Vpcs": [{"VpcId": "vpc-1", "CidrBlock": "10.0.0.0/16", "Tags": [{"Key": "Name", "Value": "Test VPC"}]}],
    "Subnets": [{"SubnetId": "subnet-1", "VpcId": "vpc-1", "CidrBlock": "10.0.1.0/24"}],
    "Instances": [{
        "InstanceId": "i-1",
        "VpcId": "vpc-1",
        "SubnetId": "subnet-1",
        "SecurityGroups": [{"GroupId": "sg-a", "GroupName": "app"}]
    }],
    "DBInstances": [{
        "DBInstanceIdentifier": "db-1",
        "Engine": "mysql",
        "VpcSecurityGroups": [{"VpcSecurityGroupId": "sg-b"}],
        "DBSubnetGroup": {"VpcId": "vpc-1", "Subnets": [{"SubnetIdentifier": "subnet-1"}]}
    }],
    "Functions": [{
        "FunctionName": "fn-1",
        "VpcConfig": {"VpcId": "vpc-1", "SubnetIds": ["subnet-1"], "SecurityGroupIds": ["sg-l"]}
    }],
    "SecurityGroups": [
        {
            "GroupId": "sg-a",
            "VpcId": "vpc-1",
            "IpPermissionsEgress": [{"IpProtocol": "-1", "IpRanges": [{"CidrIp": "0.0.0.0/0"}]}]
        },
        {
            "GroupId": "sg-b",
            "VpcId": "vpc-1",
            "IpPermissions": [{
                "IpProtocol": "tcp", "FromPort": 3306, "ToPort": 3306,
                "UserIdGroupPairs": [{"GroupId": "sg-a"}]
            }]
        },
        {
            "GroupId": "sg-l",
            "VpcId": "vpc-1",
            "IpPermissions": [{
                "IpProtocol": "tcp", "FromPort": 443, "ToPort": 443,
                "UserIdGroupPairs": [{"GroupId": "sg-a"}]
            }]
        }
    ],
    "InternetGateways": [],
    "RouteTables": []
}"#;

#[test]
fn snapshot_to_topology_produces_expected_verdicts() {
    let raw = RawArchitecture::from_json(SNAPSHOT).expect("parse snapshot");
    let topology = build_topology(&raw);

    assert_eq!(topology.connections.len(), 2);

    let to_rds = &topology.connections[0];
    assert_eq!(to_rds.source_id, "i-1");
    assert_eq!(to_rds.target_id, "db-1");
    assert_eq!(to_rds.target_type, ResourceType::Rds);
    assert_eq!(to_rds.status, ConnectionStatus::Allowed);

    let to_lambda = &topology.connections[1];
    assert_eq!(to_lambda.target_id, "fn-1");
    assert_eq!(to_lambda.target_type, ResourceType::Lambda);
    assert_eq!(to_lambda.status, ConnectionStatus::Allowed);
}

#[test]
fn topology_payload_has_rendering_layer_shape() {
    let raw = RawArchitecture::from_json(SNAPSHOT).expect("parse snapshot");
    let value = serde_json::to_value(build_topology(&raw)).expect("serialize");

    // Flattened graph collections plus the connection list, all camelCase.
    assert!(value["vpcs"].is_array());
    assert!(value["ec2Instances"].is_array());
    assert!(value["rdsInstances"].is_array());
    assert!(value["lambdaFunctions"].is_array());
    assert!(value["securityGroups"].is_array());
    assert_eq!(value["connections"][0]["sourceId"], "i-1");
    assert_eq!(value["connections"][0]["status"], "allowed");
    assert!(value["connections"][0]["errorMessage"].is_null());
}

#[test]
fn rebuilding_from_the_same_snapshot_is_deterministic() {
    let raw = RawArchitecture::from_json(SNAPSHOT).expect("parse snapshot");
    let first = serde_json::to_string(&build_topology(&raw)).expect("serialize");
    let second = serde_json::to_string(&build_topology(&raw)).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn sample_round_trips_through_the_snapshot_format() {
    let raw = sample::sample_architecture();
    let json = raw.to_json_pretty().expect("serialize");
    let reparsed = RawArchitecture::from_json(&json).expect("reparse");
    assert_eq!(reparsed, raw);
    assert_eq!(
        build_topology(&reparsed).connections,
        build_topology(&raw).connections
    );
}
