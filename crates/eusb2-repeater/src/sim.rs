//! Simulated transport, rails and reset line
//!
//! A software rendition of the repeater's externally-supplied capabilities:
//! a 256-byte register file behind [`TransportPort`], recording rails behind
//! [`RailHandle`], and a level-recording reset line. Everything is cloneable
//! and shares state, so a test (or the CLI) can hand one clone to the device
//! and keep another to script faults and inspect what the engine did.
//!
//! This is what lets the whole suite run without hardware; scripted
//! fail-N-times-then-succeed counters make the bounded-retry paths
//! observable.

use crate::error::{RepeaterError, Result};
use crate::power::RailHandle;
use crate::transport::{ResetLine, TransportPort};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Register bus ─────────────────────────────────────────────────────────────

#[derive(Debug)]
struct PortState {
    regs: [u8; 256],
    read_faults: HashMap<u8, u32>,
    write_faults: HashMap<u8, u32>,
    writes: Vec<(u8, u8)>,
}

/// In-memory register file implementing [`TransportPort`].
#[derive(Debug, Clone)]
pub struct SimPort {
    state: Arc<Mutex<PortState>>,
}

impl SimPort {
    /// Create a port with all registers zeroed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(PortState {
                regs: [0; 256],
                read_faults: HashMap::new(),
                write_faults: HashMap::new(),
                writes: Vec::new(),
            })),
        }
    }

    /// Seed a register without going through the bus (no write recorded).
    pub fn preload(&self, addr: u8, value: u8) {
        lock(&self.state).regs[addr as usize] = value;
    }

    /// Current register contents.
    #[must_use]
    pub fn reg(&self, addr: u8) -> u8 {
        lock(&self.state).regs[addr as usize]
    }

    /// Make the next `times` reads of `addr` fail.
    pub fn fail_reads(&self, addr: u8, times: u32) {
        lock(&self.state).read_faults.insert(addr, times);
    }

    /// Make the next `times` writes of `addr` fail.
    pub fn fail_writes(&self, addr: u8, times: u32) {
        lock(&self.state).write_faults.insert(addr, times);
    }

    /// Every successful write so far, in bus order.
    #[must_use]
    pub fn writes(&self) -> Vec<(u8, u8)> {
        lock(&self.state).writes.clone()
    }

    /// Forget the recorded writes (faults and registers are kept).
    pub fn clear_writes(&self) {
        lock(&self.state).writes.clear();
    }
}

impl Default for SimPort {
    fn default() -> Self {
        Self::new()
    }
}

fn take_fault(faults: &mut HashMap<u8, u32>, addr: u8) -> bool {
    match faults.get_mut(&addr) {
        Some(0) | None => false,
        Some(remaining) => {
            *remaining = remaining.saturating_sub(1);
            true
        }
    }
}

impl TransportPort for SimPort {
    fn read(&mut self, addr: u8) -> Result<u8> {
        let mut state = lock(&self.state);
        if take_fault(&mut state.read_faults, addr) {
            return Err(RepeaterError::bus(addr, "simulated read fault"));
        }
        Ok(state.regs[addr as usize])
    }

    fn write(&mut self, addr: u8, value: u8) -> Result<()> {
        let mut state = lock(&self.state);
        if take_fault(&mut state.write_faults, addr) {
            return Err(RepeaterError::bus(addr, "simulated write fault"));
        }
        state.regs[addr as usize] = value;
        state.writes.push((addr, value));
        Ok(())
    }
}

// ── Rails ────────────────────────────────────────────────────────────────────

/// One recorded rail operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RailOp {
    /// `set_load(µA)`.
    SetLoad(u32),
    /// `set_voltage(min µV, max µV)`.
    SetVoltage(u32, u32),
    /// `enable()`.
    Enable,
    /// `disable()`.
    Disable,
}

/// Rail operation kind, for fault scripting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RailOpKind {
    /// Fail `set_load` calls.
    SetLoad,
    /// Fail `set_voltage` calls.
    SetVoltage,
    /// Fail `enable` calls.
    Enable,
    /// Fail `disable` calls.
    Disable,
}

#[derive(Debug, Default)]
struct RailState {
    ops: Vec<RailOp>,
    failing: std::collections::HashSet<RailOpKind>,
}

/// Recording rail implementing [`RailHandle`].
#[derive(Debug, Clone)]
pub struct SimRail {
    name: &'static str,
    state: Arc<Mutex<RailState>>,
}

impl SimRail {
    /// Create a rail; the name only shows up in fault messages.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: Arc::new(Mutex::new(RailState::default())),
        }
    }

    /// Make every operation of `kind` fail from now on.
    pub fn fail_on(&self, kind: RailOpKind) {
        lock(&self.state).failing.insert(kind);
    }

    /// Every successful operation so far, in call order.
    #[must_use]
    pub fn ops(&self) -> Vec<RailOp> {
        lock(&self.state).ops.clone()
    }

    fn apply(&self, kind: RailOpKind, op: RailOp) -> Result<()> {
        let mut state = lock(&self.state);
        if state.failing.contains(&kind) {
            return Err(RepeaterError::rail(format!(
                "simulated {kind:?} fault on {}",
                self.name
            )));
        }
        state.ops.push(op);
        Ok(())
    }
}

impl RailHandle for SimRail {
    fn set_load(&mut self, load_ua: u32) -> Result<()> {
        self.apply(RailOpKind::SetLoad, RailOp::SetLoad(load_ua))
    }

    fn set_voltage(&mut self, min_uv: u32, max_uv: u32) -> Result<()> {
        self.apply(RailOpKind::SetVoltage, RailOp::SetVoltage(min_uv, max_uv))
    }

    fn enable(&mut self) -> Result<()> {
        self.apply(RailOpKind::Enable, RailOp::Enable)
    }

    fn disable(&mut self) -> Result<()> {
        self.apply(RailOpKind::Disable, RailOp::Disable)
    }
}

// ── Reset line ───────────────────────────────────────────────────────────────

/// Level-recording reset line implementing [`ResetLine`].
#[derive(Debug, Clone)]
pub struct SimResetLine {
    levels: Arc<Mutex<Vec<bool>>>,
}

impl SimResetLine {
    /// Create a reset line with no recorded levels.
    #[must_use]
    pub fn new() -> Self {
        Self {
            levels: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Every level driven so far, in call order.
    #[must_use]
    pub fn levels(&self) -> Vec<bool> {
        lock(&self.levels).clone()
    }
}

impl Default for SimResetLine {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetLine for SimResetLine {
    fn set(&mut self, asserted: bool) {
        lock(&self.levels).push(asserted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fault_counters_expire() {
        let mut port = SimPort::new();
        port.fail_writes(0x10, 1);
        assert!(TransportPort::write(&mut port, 0x10, 1).is_err());
        assert!(TransportPort::write(&mut port, 0x10, 2).is_ok());
        assert_eq!(port.reg(0x10), 2);
    }

    #[test]
    fn rail_records_only_successful_ops() {
        let rail = SimRail::new("vdd3");
        rail.fail_on(RailOpKind::Enable);
        let mut handle: Box<dyn RailHandle> = Box::new(rail.clone());
        handle.set_load(100).unwrap();
        assert!(handle.enable().is_err());
        assert_eq!(rail.ops(), vec![RailOp::SetLoad(100)]);
    }
}
