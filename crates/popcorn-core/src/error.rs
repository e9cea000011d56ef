use thiserror::Error;

#[derive(Debug, Error)]
pub enum PopcornError {
    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
