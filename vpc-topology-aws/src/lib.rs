//! AWS SDK integration: EC2/RDS/Lambda client wrapper, per-resource
//! fetches, and conversion of SDK models into raw architecture records.

mod convert;
mod error;
mod service;

pub use error::{AwsError, AwsResult};
pub use service::AwsArchitectureService;
