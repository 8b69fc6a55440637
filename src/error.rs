use thiserror::Error;

/// The main error type for hf-subdir operations.
#[derive(Debug, Error)]
pub enum HfSubdirError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid Hugging Face URL '{input}': {message}")]
    InvalidUrl { input: String, message: String },

    #[error("No directory specified in URL for repository '{repo_id}'")]
    MissingDirectory { repo_id: String },

    #[error("Failed to download from '{repo_id}': {message}")]
    Transfer { repo_id: String, message: String },
}
