use core_types::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Failed to build period buckets: {0}")]
    Bucketing(#[from] CoreError),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
