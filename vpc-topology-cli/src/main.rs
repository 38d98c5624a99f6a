//! Standalone CLI for VPC Topology.
//!
//! `scan` talks to AWS and reports reachability for the live architecture;
//! `snapshot` writes the raw describe/list payloads to a file so `analyze`
//! can evaluate them offline; `sample` runs the pipeline on the built-in
//! dataset.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use vpc_topology_aws::AwsArchitectureService;
use vpc_topology_core::{build_topology, sample, ConnectionStatus, RawArchitecture, Topology};

#[derive(Parser)]
#[command(
    name = "vpc-topology",
    version,
    about = "Map AWS VPC architectures and evaluate security-group reachability"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the live architecture and report reachability
    Scan {
        /// AWS region override
        #[arg(long)]
        region: Option<String>,
        /// Print the full topology payload as JSON
        #[arg(long)]
        json: bool,
        /// Fall back to the built-in sample dataset when the fetch fails
        #[arg(long)]
        fallback_sample: bool,
    },
    /// Fetch the live architecture and write the raw records to a file
    Snapshot {
        /// Output file for the snapshot JSON
        #[arg(short, long)]
        output: PathBuf,
        /// AWS region override
        #[arg(long)]
        region: Option<String>,
    },
    /// Analyze a previously written snapshot file offline
    Analyze {
        /// Snapshot JSON file
        input: PathBuf,
        /// Print the full topology payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the pipeline on the built-in sample dataset
    Sample {
        /// Print the full topology payload as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scan {
            region,
            json,
            fallback_sample,
        } => scan(region, json, fallback_sample).await,
        Commands::Snapshot { output, region } => snapshot(&output, region).await,
        Commands::Analyze { input, json } => analyze_snapshot(&input, json),
        Commands::Sample { json } => report(&build_topology(&sample::sample_architecture()), json),
    }
}

async fn scan(region: Option<String>, json: bool, fallback_sample: bool) -> anyhow::Result<()> {
    let service = AwsArchitectureService::new(region).await;
    let raw = match service.fetch_architecture().await {
        Ok(raw) => raw,
        Err(e) if fallback_sample => {
            log::error!("Live fetch failed, falling back to the sample dataset: {e}");
            sample::sample_architecture()
        }
        Err(e) => return Err(e).context("Failed to fetch AWS architecture"),
    };
    report(&build_topology(&raw), json)
}

async fn snapshot(output: &Path, region: Option<String>) -> anyhow::Result<()> {
    let service = AwsArchitectureService::new(region).await;
    let raw = service
        .fetch_architecture()
        .await
        .context("Failed to fetch AWS architecture")?;
    let json = raw
        .to_json_pretty()
        .context("Failed to serialize snapshot")?;
    fs::write(output, json)
        .with_context(|| format!("Failed to write snapshot to {}", output.display()))?;
    println!("Wrote snapshot to {}", output.display());
    Ok(())
}

fn analyze_snapshot(input: &Path, json: bool) -> anyhow::Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read snapshot from {}", input.display()))?;
    let raw = RawArchitecture::from_json(&text).context("Failed to parse snapshot")?;
    report(&build_topology(&raw), json)
}

fn report(topology: &Topology, json: bool) -> anyhow::Result<()> {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(topology).context("Failed to serialize topology")?
        );
        return Ok(());
    }

    let graph = &topology.graph;
    println!(
        "{} VPCs, {} EC2 instances, {} RDS instances, {} Lambda functions, {} security groups",
        graph.vpcs.len(),
        graph.ec2_instances.len(),
        graph.rds_instances.len(),
        graph.lambda_functions.len(),
        graph.security_groups.len(),
    );

    if topology.connections.is_empty() {
        println!("No resource pairs to evaluate");
        return Ok(());
    }

    println!("Connections:");
    for conn in &topology.connections {
        match conn.status {
            ConnectionStatus::Allowed => println!(
                "  {} ({}) -> {} ({}) [allowed]",
                conn.source_id, conn.source_type, conn.target_id, conn.target_type
            ),
            ConnectionStatus::Blocked => println!(
                "  {} ({}) -> {} ({}) [blocked] {}",
                conn.source_id,
                conn.source_type,
                conn.target_id,
                conn.target_type,
                conn.error_message.as_deref().unwrap_or_default()
            ),
        }
    }
    Ok(())
}
