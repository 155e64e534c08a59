use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid transition table: {0}")]
    InvalidTable(String),

    #[error("Invalid engine config: {0}")]
    InvalidConfig(String),

    #[error("Unknown state: {0}")]
    UnknownState(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
