//! External capability traits
//!
//! The engine never talks to a bus or a pin directly; the caller supplies
//! these capabilities at attach. Bus acquisition, transaction framing and
//! GPIO ownership all live outside the engine.

use crate::error::Result;

/// Byte-addressed register bus supplied by the external transport.
///
/// One logical transaction per call; the transport owns framing and any
/// bus-level locking. A transaction that never returns is the transport's
/// problem, not the engine's.
pub trait TransportPort: Send {
    /// Read one register.
    ///
    /// # Errors
    ///
    /// Returns error if the bus transaction fails.
    fn read(&mut self, addr: u8) -> Result<u8>;

    /// Write one register.
    ///
    /// # Errors
    ///
    /// Returns error if the bus transaction fails.
    fn write(&mut self, addr: u8, value: u8) -> Result<()>;
}

/// Repeater reset line. Direction is fixed at attach; the engine only
/// drives the level.
pub trait ResetLine: Send {
    /// Assert (`true`) or deassert (`false`) the reset line.
    fn set(&mut self, asserted: bool);
}
