use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkillError {
    /// Required input missing or invalid. Always fatal.
    #[error("{0}")]
    Configuration(String),

    #[error("skill not found: {name} (known: {known})")]
    SkillNotFound { name: String, known: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl SkillError {
    pub fn config(msg: impl Into<String>) -> Self {
        SkillError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, SkillError>;
