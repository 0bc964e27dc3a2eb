//! Error types for CLI operations.

use std::path::Path;

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Raw packet file not found
    #[error("Packet file not found: {path}")]
    PacketNotFound { path: String },

    /// Stream pipeline task failed
    #[error("Pipeline execution failed: {message}")]
    PipelineExecution { message: String },
}

impl CliError {
    pub fn config_not_found(path: &Path) -> Self {
        Self::ConfigNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn packet_not_found(path: &Path) -> Self {
        Self::PacketNotFound {
            path: path.display().to_string(),
        }
    }

    pub fn pipeline_execution(message: impl Into<String>) -> Self {
        Self::PipelineExecution {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = CliError::config_not_found(Path::new("missing.toml"));
        assert_eq!(err.to_string(), "Configuration file not found: missing.toml");

        let err = CliError::packet_not_found(Path::new("frame.bin"));
        assert!(err.to_string().contains("frame.bin"));
    }
}
