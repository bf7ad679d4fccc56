use std::path::PathBuf;

pub type SigrunResult<T> = Result<T, SigrunError>;

#[derive(Debug, thiserror::Error)]
pub enum SigrunError {
    #[error("failed to read campaign config '{}': {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse campaign config '{}': {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid campaign config: {0}")]
    ConfigInvalid(String),
    #[error("failed to write batch script '{}': {source}", path.display())]
    ScriptWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to launch submit command '{command}': {source}")]
    SubmitLaunch {
        command: String,
        source: std::io::Error,
    },
    #[error("submit command '{command}' failed with {status}")]
    SubmitFailed { command: String, status: String },
}

impl SigrunError {
    /// Process exit code for the error when it escapes the run loop.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::ConfigInvalid(_) => 2,
            Self::ScriptWrite { .. } => 3,
            Self::SubmitLaunch { .. } | Self::SubmitFailed { .. } => 4,
        }
    }
}
