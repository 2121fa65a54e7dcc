//! Error types for repeater operations

use crate::power::PowerStep;
use thiserror::Error;

/// Result type alias for repeater operations
pub type Result<T> = std::result::Result<T, RepeaterError>;

/// Errors that can occur while driving the repeater
#[derive(Debug, Error)]
pub enum RepeaterError {
    /// Invalid configuration detected at attach time
    #[error("Invalid configuration: {reason}")]
    Config {
        /// What was wrong with the configuration
        reason: String,
    },

    /// Register-bus transaction failed
    #[error("Bus error at register {addr:#04x}: {reason}")]
    Bus {
        /// Register address of the failed transaction
        addr: u8,
        /// Reason for failure
        reason: String,
    },

    /// Supply-rail operation failed
    #[error("Rail error: {reason}")]
    Rail {
        /// Reason for failure
        reason: String,
    },

    /// Power sequencing aborted; rails have been unwound
    #[error("Power sequencing failed at step: {step}")]
    PowerSequence {
        /// First step that failed
        step: PowerStep,
    },

    /// Register report aborted; no partial table is produced
    #[error("Report aborted: register {addr:#04x} unreadable")]
    Report {
        /// Address whose read failed
        addr: u8,
    },
}

impl RepeaterError {
    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a bus error
    pub fn bus(addr: u8, reason: impl Into<String>) -> Self {
        Self::Bus {
            addr,
            reason: reason.into(),
        }
    }

    /// Create a rail error
    pub fn rail(reason: impl Into<String>) -> Self {
        Self::Rail {
            reason: reason.into(),
        }
    }
}
