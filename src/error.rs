use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to read patron history from the database")]
pub struct DataAccessError(#[from] sqlx::Error);
