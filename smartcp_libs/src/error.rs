use crate::codeforces::client::CodeforcesError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DashboardError>;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to fetch data from Codeforces")]
    UpstreamUnavailable(#[from] CodeforcesError),
    #[error("Codeforces handle of user {0} is not set")]
    MissingHandle(String),
    #[error("user {0} not found")]
    UserNotFound(String),
    #[error("{0}")]
    ValidationError(String),
    #[error("failed to access user store")]
    StoreError(#[from] sqlx::Error),
}
