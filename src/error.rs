//! Error handling for the particle subsystem

use std::io;
use thiserror::Error;

use crate::particle::ParticleType;

/// Errors that can occur when creating particles or loading effect data
#[derive(Debug, Error)]
pub enum ParticleError {
    /// A type id with no registered factory (including `ParticleType::NONE`)
    #[error("unknown particle type id {}", .0.id())]
    UnknownType(ParticleType),

    /// A type tag that does not resolve to a registered kind
    #[error("unknown particle type '{0}'")]
    UnknownName(String),

    /// Every type id is taken
    #[error("particle registry is full ({0} types)")]
    RegistryFull(usize),

    /// A type tag registered twice
    #[error("particle type '{0}' is already registered")]
    DuplicateName(String),

    /// An animation was built from an unusable graphic
    #[error("invalid animation for graphic '{graphic}': {reason}")]
    InvalidAnimation {
        /// Name of the offending graphic
        graphic: String,
        /// What was wrong with it
        reason: String,
    },

    /// Settings or tuning data failed to parse
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    /// An I/O error occurred while reading or writing config files
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Type alias for Results from particle operations
pub type Result<T> = std::result::Result<T, ParticleError>;
