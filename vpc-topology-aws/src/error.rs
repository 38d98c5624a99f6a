use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("EC2 client error: {0}")]
    Ec2Error(String),
    #[error("RDS client error: {0}")]
    RdsError(String),
    #[error("Lambda client error: {0}")]
    LambdaError(String),
}

pub type AwsResult<T> = Result<T, AwsError>;
