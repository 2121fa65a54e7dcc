//! Attach-time configuration
//!
//! Everything the engine consumes at construction: chip variant, the raw
//! override byte arrays and the initial port role. Validation happens at
//! attach, before any register I/O; a bad array means the device does not
//! come up at all.

use crate::error::Result;
use crate::sequence::OverrideSequence;
use eusb2_chip::RepeaterVariant;

/// Operating role of the local port on the USB link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortRole {
    /// Downstream-facing port (we are the host).
    Host,
    /// Upstream-facing port (we are the client/device).
    Client,
}

impl std::fmt::Display for PortRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Host => write!(f, "HOST"),
            Self::Client => write!(f, "CLIENT"),
        }
    }
}

/// Configuration consumed by [`crate::Eusb2Repeater::new`]; immutable after
/// attach apart from the role, which the link framework may flip at runtime.
#[derive(Debug, Clone)]
pub struct RepeaterConfig {
    /// Chip variant; selects the register table and the client-role guard.
    pub variant: RepeaterVariant,
    /// Initial port role.
    pub role: PortRole,
    /// Plain `(value, address)` override byte array, applied at init.
    pub override_seq: Option<Vec<u8>>,
    /// Host-role strided override byte array; preferred over the plain one
    /// when present and the role is host at init time.
    pub host_override_seq: Option<Vec<u8>>,
}

impl RepeaterConfig {
    /// Configuration with no override sequences, starting in client role.
    #[must_use]
    pub fn new(variant: RepeaterVariant) -> Self {
        Self {
            variant,
            role: PortRole::Client,
            override_seq: None,
            host_override_seq: None,
        }
    }

    /// Set the initial role.
    #[must_use]
    pub fn with_role(mut self, role: PortRole) -> Self {
        self.role = role;
        self
    }

    /// Supply the plain override byte array.
    #[must_use]
    pub fn with_override_seq(mut self, bytes: Vec<u8>) -> Self {
        self.override_seq = Some(bytes);
        self
    }

    /// Supply the host-role override byte array.
    #[must_use]
    pub fn with_host_override_seq(mut self, bytes: Vec<u8>) -> Self {
        self.host_override_seq = Some(bytes);
        self
    }

    /// Validate the raw arrays into playable sequences.
    pub(crate) fn validate(self) -> Result<ValidatedConfig> {
        let override_seq = self.override_seq.map(OverrideSequence::plain).transpose()?;
        let host_override_seq = self
            .host_override_seq
            .map(OverrideSequence::host_strided)
            .transpose()?;
        Ok(ValidatedConfig {
            variant: self.variant,
            role: self.role,
            override_seq,
            host_override_seq,
        })
    }
}

/// Outcome of attach-time validation.
pub(crate) struct ValidatedConfig {
    pub(crate) variant: RepeaterVariant,
    pub(crate) role: PortRole,
    pub(crate) override_seq: Option<OverrideSequence>,
    pub(crate) host_override_seq: Option<OverrideSequence>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_plain_array_fails_validation() {
        let cfg = RepeaterConfig::new(RepeaterVariant::Ti).with_override_seq(vec![0xAA, 0x02, 0xBB]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn odd_host_array_fails_validation() {
        let cfg =
            RepeaterConfig::new(RepeaterVariant::Nxp).with_host_override_seq(vec![0; 9]);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn empty_config_is_valid() {
        assert!(RepeaterConfig::new(RepeaterVariant::Nxp).validate().is_ok());
    }
}
