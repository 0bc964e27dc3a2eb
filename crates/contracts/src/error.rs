//! Layered error definitions
//!
//! Categorized by source: packet / config / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Packet Errors =====
    /// A quadrature channel length disagrees with `width * height`
    #[error("shape mismatch in channel {channel}: expected {expected} samples, got {actual}")]
    ShapeMismatch {
        channel: Channel,
        expected: usize,
        actual: usize,
    },

    /// Wire bytes could not be decoded into a packet
    #[error("packet decode error: {message}")]
    PacketDecode { message: String },

    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Quadrature channel identifier, in capture order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    I0,
    I90,
    I180,
    I270,
}

impl Channel {
    /// All four channels in capture order
    pub const ALL: [Channel; 4] = [Channel::I0, Channel::I90, Channel::I180, Channel::I270];
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Channel::I0 => "I0",
            Channel::I90 => "I90",
            Channel::I180 => "I180",
            Channel::I270 => "I270",
        };
        f.write_str(name)
    }
}

impl ContractError {
    /// Create shape mismatch error
    pub fn shape_mismatch(channel: Channel, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            channel,
            expected,
            actual,
        }
    }

    /// Create packet decode error
    pub fn packet_decode(message: impl Into<String>) -> Self {
        Self::PacketDecode {
            message: message.into(),
        }
    }

    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
