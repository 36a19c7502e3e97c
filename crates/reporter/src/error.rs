use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),

    #[error("Analytics error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] core_types::CoreError),
}

impl ReporterError {
    /// True when the caller supplied bad input rather than the system failing.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ReporterError::InvalidRequest(core_types::CoreError::InvalidInput(..)))
    }
}
