use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing env {}", .0.join("/"))]
    MissingEnv(Vec<String>),

    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("gh api failed: {command} ({status})\nstdout: {stdout}\nstderr: {stderr}")]
    Api {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    #[error("unexpected gh api response: {0}")]
    ApiResponse(String),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
