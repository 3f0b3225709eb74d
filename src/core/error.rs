use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkillError {
    #[error("node not cached: {0}")]
    NotFound(String),

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SkillError>;
