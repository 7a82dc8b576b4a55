use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Domain validation errors
    #[error("Invalid card id: {0}")]
    InvalidCardId(String),

    #[error("Invalid output selector: {0}")]
    InvalidSelector(String),

    #[error("Unknown state name: {0}")]
    UnknownState(String),

    // Queue errors
    #[error("Queue closed: no consumer is listening")]
    QueueClosed,

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
