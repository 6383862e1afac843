use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid log level: {0}")]
    InvalidLevel(String),
}
