//! Architecture fetch service.
//!
//! Holds the EC2, RDS, and Lambda clients and exposes one fetch per
//! resource kind plus a combined `fetch_architecture` that runs them
//! concurrently. Each fetch is a single describe/list call; pagination,
//! retries, and throttling policy belong to the caller's environment
//! configuration, not here.

use crate::convert;
use crate::error::{AwsError, AwsResult};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ec2::config::Credentials;
use vpc_topology_core::{
    RawArchitecture, RawDbInstance, RawFunction, RawInstance, RawInternetGateway, RawRouteTable,
    RawSecurityGroup, RawSubnet, RawVpc,
};

/// Service struct that holds AWS clients and fetches the raw architecture.
pub struct AwsArchitectureService {
    ec2_client: aws_sdk_ec2::Client,
    rds_client: aws_sdk_rds::Client,
    lambda_client: aws_sdk_lambda::Client,
}

impl AwsArchitectureService {
    /// Create a service using the default credential provider chain,
    /// optionally overriding the region.
    pub async fn new(region: Option<String>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        let config = loader.load().await;
        Self::from_config(&config)
    }

    /// Create a service from an explicit access key pair and region.
    pub async fn from_credentials(access_key: &str, secret_key: &str, region: &str) -> Self {
        let credentials = Credentials::new(access_key, secret_key, None, None, "vpc-topology");
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials)
            .load()
            .await;
        Self::from_config(&config)
    }

    fn from_config(config: &aws_config::SdkConfig) -> Self {
        Self {
            ec2_client: aws_sdk_ec2::Client::new(config),
            rds_client: aws_sdk_rds::Client::new(config),
            lambda_client: aws_sdk_lambda::Client::new(config),
        }
    }

    pub async fn fetch_vpcs(&self) -> AwsResult<Vec<RawVpc>> {
        let response = self
            .ec2_client
            .describe_vpcs()
            .send()
            .await
            .map_err(|e| AwsError::Ec2Error(format!("Failed to describe VPCs: {e}")))?;
        Ok(response.vpcs().iter().map(convert::vpc).collect())
    }

    pub async fn fetch_subnets(&self) -> AwsResult<Vec<RawSubnet>> {
        let response = self
            .ec2_client
            .describe_subnets()
            .send()
            .await
            .map_err(|e| AwsError::Ec2Error(format!("Failed to describe subnets: {e}")))?;
        Ok(response.subnets().iter().map(convert::subnet).collect())
    }

    pub async fn fetch_instances(&self) -> AwsResult<Vec<RawInstance>> {
        let response = self
            .ec2_client
            .describe_instances()
            .send()
            .await
            .map_err(|e| AwsError::Ec2Error(format!("Failed to describe instances: {e}")))?;
        Ok(response
            .reservations()
            .iter()
            .flat_map(|reservation| reservation.instances())
            .map(convert::instance)
            .collect())
    }

    pub async fn fetch_security_groups(&self) -> AwsResult<Vec<RawSecurityGroup>> {
        let response = self
            .ec2_client
            .describe_security_groups()
            .send()
            .await
            .map_err(|e| AwsError::Ec2Error(format!("Failed to describe security groups: {e}")))?;
        Ok(response
            .security_groups()
            .iter()
            .map(convert::security_group)
            .collect())
    }

    pub async fn fetch_internet_gateways(&self) -> AwsResult<Vec<RawInternetGateway>> {
        let response = self
            .ec2_client
            .describe_internet_gateways()
            .send()
            .await
            .map_err(|e| AwsError::Ec2Error(format!("Failed to describe internet gateways: {e}")))?;
        Ok(response
            .internet_gateways()
            .iter()
            .map(convert::internet_gateway)
            .collect())
    }

    pub async fn fetch_route_tables(&self) -> AwsResult<Vec<RawRouteTable>> {
        let response = self
            .ec2_client
            .describe_route_tables()
            .send()
            .await
            .map_err(|e| AwsError::Ec2Error(format!("Failed to describe route tables: {e}")))?;
        Ok(response
            .route_tables()
            .iter()
            .map(convert::route_table)
            .collect())
    }

    pub async fn fetch_db_instances(&self) -> AwsResult<Vec<RawDbInstance>> {
        let response = self
            .rds_client
            .describe_db_instances()
            .send()
            .await
            .map_err(|e| AwsError::RdsError(format!("Failed to describe DB instances: {e}")))?;
        Ok(response
            .db_instances()
            .iter()
            .map(convert::db_instance)
            .collect())
    }

    pub async fn fetch_functions(&self) -> AwsResult<Vec<RawFunction>> {
        let response = self
            .lambda_client
            .list_functions()
            .send()
            .await
            .map_err(|e| AwsError::LambdaError(format!("Failed to list functions: {e}")))?;
        Ok(response.functions().iter().map(convert::function).collect())
    }

    /// Fetch all resource collections concurrently and bundle them.
    pub async fn fetch_architecture(&self) -> AwsResult<RawArchitecture> {
        let (
            vpcs,
            subnets,
            instances,
            db_instances,
            functions,
            security_groups,
            internet_gateways,
            route_tables,
        ) = tokio::try_join!(
            self.fetch_vpcs(),
            self.fetch_subnets(),
            self.fetch_instances(),
            self.fetch_db_instances(),
            self.fetch_functions(),
            self.fetch_security_groups(),
            self.fetch_internet_gateways(),
            self.fetch_route_tables(),
        )?;

        log::debug!(
            "fetched {} VPCs, {} subnets, {} instances, {} DB instances, {} functions, {} security groups",
            vpcs.len(),
            subnets.len(),
            instances.len(),
            db_instances.len(),
            functions.len(),
            security_groups.len(),
        );

        Ok(RawArchitecture {
            vpcs,
            subnets,
            instances,
            db_instances,
            functions,
            security_groups,
            internet_gateways,
            route_tables,
        })
    }
}
