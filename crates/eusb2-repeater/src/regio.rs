//! Register access on top of the transport port
//!
//! Wraps the caller-supplied [`TransportPort`] in a cloneable handle so the
//! override player, the tuning buffer and the debug surface can all reach
//! the bus. Adds the masked write and the bounded-retry helpers; retry
//! budgets belong to the callers, exhaustion is returned and the caller
//! decides whether it is fatal.

use crate::error::Result;
use crate::transport::TransportPort;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error};

/// Cloneable handle to the register bus.
#[derive(Clone)]
pub struct RegisterAccessor {
    port: Arc<Mutex<Box<dyn TransportPort>>>,
}

impl std::fmt::Debug for RegisterAccessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterAccessor").finish_non_exhaustive()
    }
}

impl RegisterAccessor {
    /// Bind the accessor to a transport port.
    pub fn new(port: Box<dyn TransportPort>) -> Self {
        Self {
            port: Arc::new(Mutex::new(port)),
        }
    }

    fn port(&self) -> MutexGuard<'_, Box<dyn TransportPort>> {
        // A poisoned lock means a panic mid-transaction; the register file
        // itself is still usable, so recover the guard.
        self.port.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Read one register.
    ///
    /// # Errors
    ///
    /// Returns error if the bus transaction fails.
    pub fn read(&self, addr: u8) -> Result<u8> {
        match self.port().read(addr) {
            Ok(value) => {
                debug!("read reg:{addr:#04x} val:{value:#04x}");
                Ok(value)
            }
            Err(e) => {
                error!("failed to read reg:{addr:#04x}: {e}");
                Err(e)
            }
        }
    }

    /// Write one register.
    ///
    /// # Errors
    ///
    /// Returns error if the bus transaction fails.
    pub fn write(&self, addr: u8, value: u8) -> Result<()> {
        match self.port().write(addr, value) {
            Ok(()) => {
                debug!("write reg:{addr:#04x} val:{value:#04x}");
                Ok(())
            }
            Err(e) => {
                error!("failed to write {value:#04x} to reg:{addr:#04x}: {e}");
                Err(e)
            }
        }
    }

    /// Read-modify-write: `effective = value | (current & mask)`.
    ///
    /// Note the merge direction: with `mask = 0xFF` this ORs `value` onto
    /// the current contents instead of overwriting them. That matches the
    /// shipped behavior of the reference sequencing tables and is kept
    /// bit-exact; do not change to a plain overwrite without revisiting
    /// every override table built against it.
    ///
    /// # Errors
    ///
    /// Returns error if either the read or the write transaction fails.
    pub fn write_masked(&self, addr: u8, mask: u8, value: u8) -> Result<()> {
        let current = self.read(addr)?;
        self.write(addr, value | (current & mask))
    }

    /// Write with a bounded retry budget, stopping at the first success.
    ///
    /// Every failed attempt is logged; exhaustion returns the last error
    /// and the caller decides whether that aborts anything.
    ///
    /// # Errors
    ///
    /// Returns the last bus error once `attempts` writes have failed.
    pub fn write_retry(&self, addr: u8, value: u8, attempts: u32) -> Result<()> {
        debug_assert!(attempts > 0);
        let mut last = None;
        for _ in 0..attempts {
            match self.write(addr, value) {
                Ok(()) => return Ok(()),
                Err(e) => last = Some(e),
            }
        }
        error!("write of {value:#04x} to reg:{addr:#04x} exhausted {attempts} attempt(s)");
        Err(last.unwrap_or_else(|| crate::error::RepeaterError::bus(addr, "no attempts made")))
    }

    /// Read with a bounded retry budget, stopping at the first success.
    ///
    /// # Errors
    ///
    /// Returns the last bus error once `attempts` reads have failed.
    pub fn read_retry(&self, addr: u8, attempts: u32) -> Result<u8> {
        debug_assert!(attempts > 0);
        let mut last = None;
        for _ in 0..attempts {
            match self.read(addr) {
                Ok(value) => return Ok(value),
                Err(e) => last = Some(e),
            }
        }
        error!("read of reg:{addr:#04x} exhausted {attempts} attempt(s)");
        Err(last.unwrap_or_else(|| crate::error::RepeaterError::bus(addr, "no attempts made")))
    }
}
