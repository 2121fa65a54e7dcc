//! Init-time register override sequences
//!
//! Configuration supplies a raw byte array that programs the chip once at
//! init. Two encodings exist and the choice is a configuration property,
//! made when the sequence is built, never a runtime branch:
//!
//! - **Plain**: consecutive `(value, address)` pairs in array order.
//! - **Host-strided**: `len/4` logical tuples; for tuple `k = 0, 2, 4, …`
//!   the address byte sits at raw offset `4k+7` and the value byte at
//!   `4k+3`. The stride skips most bytes of each 4-byte group; it is kept
//!   exactly as the shipped configuration tables expect it.
//!
//! Per-write failures are logged and the replay continues; only attach-time
//! validation (odd array length) is fatal.

use crate::error::{RepeaterError, Result};
use crate::regio::RegisterAccessor;
use tracing::{debug, warn};

/// Retry budget for host-strided writes. Plain writes get a single attempt.
const HOST_WRITE_ATTEMPTS: u32 = 3;

/// A validated, immutable override program, applied exactly once at init.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideSequence {
    /// `(value, address)` pairs in array order.
    Plain(Vec<u8>),
    /// Host-role strided encoding.
    HostStrided(Vec<u8>),
}

impl OverrideSequence {
    /// Build a plain-pairs sequence, validating the length before any
    /// register I/O can happen.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for odd-length arrays.
    pub fn plain(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(RepeaterError::config(format!(
                "override sequence length {} is odd",
                bytes.len()
            )));
        }
        Ok(Self::Plain(bytes))
    }

    /// Build a host-strided sequence, validating the length at attach.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for odd-length arrays.
    pub fn host_strided(bytes: Vec<u8>) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(RepeaterError::config(format!(
                "host override sequence length {} is odd",
                bytes.len()
            )));
        }
        Ok(Self::HostStrided(bytes))
    }

    /// Number of logical register writes this sequence decodes to.
    #[must_use]
    pub fn write_count(&self) -> usize {
        match self {
            Self::Plain(bytes) => bytes.len() / 2,
            Self::HostStrided(bytes) => {
                let tuples = bytes.len() / 4;
                (0..tuples)
                    .step_by(2)
                    .take_while(|k| k * 4 + 7 < bytes.len())
                    .count()
            }
        }
    }

    /// Apply the sequence to the chip.
    pub fn play(&self, regs: &RegisterAccessor) {
        match self {
            Self::Plain(bytes) => play_plain(bytes, regs),
            Self::HostStrided(bytes) => play_host_strided(bytes, regs),
        }
    }
}

fn play_plain(bytes: &[u8], regs: &RegisterAccessor) {
    debug!("param override seq count:{}", bytes.len());
    for pair in bytes.chunks_exact(2) {
        let (value, addr) = (pair[0], pair[1]);
        debug!("write {value:#04x} to {addr:#04x}");
        // Single attempt; failure is already logged by the accessor.
        let _ = regs.write_masked(addr, 0xFF, value);
    }
}

fn play_host_strided(bytes: &[u8], regs: &RegisterAccessor) {
    let tuples = bytes.len() / 4;
    debug!("host override seq count:{} ({tuples} tuples)", bytes.len());
    let mut k = 0;
    while k < tuples {
        let (Some(&addr), Some(&value)) = (bytes.get(k * 4 + 7), bytes.get(k * 4 + 3)) else {
            warn!("host override tuple {k} reaches past the array, stopping replay");
            break;
        };
        debug!("write {value:#04x} to {addr:#04x}");
        let _ = regs.write_retry(addr, value, HOST_WRITE_ATTEMPTS);
        k += 2;
    }
}
