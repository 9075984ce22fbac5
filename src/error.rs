
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimventoryError {
    #[error("Store error: {0}")]
    Store(String),
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SimventoryError>;

// Helper conversions
impl From<rusqlite::Error> for SimventoryError {
    fn from(e: rusqlite::Error) -> Self { Self::Store(e.to_string()) }
}
impl From<config::ConfigError> for SimventoryError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
