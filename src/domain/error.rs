use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AppError {
    #[error("Could not download site: {0}")]
    Network(String),

    #[error("Could not obtain the list of versions")]
    NoVersionsFound,

    #[error("Failed to download from GitHub: {0}")]
    Unreachable(String),

    #[error("Failed to create download request: {0}")]
    RequestCreation(String),

    #[error("Download failed: {0}")]
    Transfer(String),

    #[error("Preferences error: {0}")]
    Config(String),
}
