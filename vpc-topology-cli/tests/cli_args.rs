use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::process::Command as StdCommand;

const SNAPSHOT: &str = r#"{
    "Vpcs": [{"VpcId": "vpc-1", "CidrBlock": "10.0.0.0/16"}],
    "Subnets": [],
    "Instances": [{
        "InstanceId": "i-1",
        "VpcId": "vpc-1",
        "SecurityGroups": [{"GroupId": "sg-a"}]
    }],
    "DBInstances": [
        {
            "DBInstanceIdentifier": "db-1",
            "VpcSecurityGroups": [{"VpcSecurityGroupId": "sg-b"}]
        },
        {
            "DBInstanceIdentifier": "db-2",
            "VpcSecurityGroups": [{"VpcSecurityGroupId": "sg-c"}]
        }
    ],
    "Functions": [{"FunctionName": "fn-1"}],
    "SecurityGroups": [
        {
            "GroupId": "sg-b",
            "IpPermissions": [{
                "IpProtocol": "tcp", "FromPort": 3306, "ToPort": 3306,
                "UserIdGroupPairs": [{"GroupId": "sg-a"}]
            }]
        },
        {"GroupId": "sg-c", "IpPermissions": []}
    ]
}"#;

fn write_snapshot(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write snapshot");
    file
}

#[test]
fn help_lists_subcommands() {
    let out = StdCommand::new(env!("CARGO_BIN_EXE_vpc-topology"))
        .arg("--help")
        .output()
        .expect("failed to run --help");
    let s = String::from_utf8_lossy(&out.stdout);
    for subcommand in ["scan", "snapshot", "analyze", "sample"] {
        assert!(s.contains(subcommand), "help missing {}: {}", subcommand, s);
    }
}

#[test]
fn analyze_reports_allowed_and_blocked_pairs() {
    let file = write_snapshot(SNAPSHOT);

    Command::cargo_bin("vpc-topology")
        .expect("binary")
        .args(["analyze", file.path().to_str().expect("utf-8 path")])
        .assert()
        .success()
        .stdout(predicate::str::contains("i-1 (ec2) -> db-1 (rds) [allowed]"))
        .stdout(predicate::str::contains(
            "Security group rules don't allow connection from EC2 (i-1) to RDS (db-2)",
        ))
        .stdout(predicate::str::contains("EC2 and Lambda are in different VPCs"));
}

#[test]
fn analyze_json_emits_rendering_layer_payload() {
    let file = write_snapshot(SNAPSHOT);

    let out = StdCommand::new(env!("CARGO_BIN_EXE_vpc-topology"))
        .args(["analyze", "--json"])
        .arg(file.path())
        .output()
        .expect("failed to run analyze --json");
    assert!(out.status.success());

    let value: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("stdout should be JSON");
    assert_eq!(value["connections"].as_array().map(Vec::len), Some(3));
    assert_eq!(value["connections"][0]["sourceId"], "i-1");
    assert_eq!(value["connections"][0]["status"], "allowed");
}

#[test]
fn analyze_rejects_malformed_snapshot() {
    let file = write_snapshot("not json");

    Command::cargo_bin("vpc-topology")
        .expect("binary")
        .args(["analyze", file.path().to_str().expect("utf-8 path")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse snapshot"));
}

#[test]
fn analyze_reports_missing_file() {
    Command::cargo_bin("vpc-topology")
        .expect("binary")
        .args(["analyze", "/nonexistent/snapshot.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read snapshot"));
}

#[test]
fn sample_runs_offline() {
    Command::cargo_bin("vpc-topology")
        .expect("binary")
        .arg("sample")
        .assert()
        .success()
        .stdout(predicate::str::contains("i-app1 (ec2) -> db-main (rds) [allowed]"))
        .stdout(predicate::str::contains("EC2 and Lambda are in different VPCs"));
}
