//! Runtime register tuning buffer
//!
//! A small, capacity-bounded collection of `(address, value)` overrides fed
//! by the debug interface and replayed at init. One lock serializes every
//! operation; the debug writers, the report reader and the init-time replay
//! never interleave for a given device.
//!
//! Tuning failures are deliberately soft: a full buffer or an exhausted
//! write shows up in the logs, never in the debug interface's return value.
//! Only the full-table report is all-or-nothing.

use crate::config::PortRole;
use crate::error::{RepeaterError, Result};
use crate::regio::RegisterAccessor;
use eusb2_chip::{nxp, RepeaterVariant};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{info, warn};

/// Maximum number of distinct tuned addresses.
pub const TUNE_BUF_COUNT: usize = 20;

/// Retry budget for tuning writes and verification read-backs.
const TUNE_ATTEMPTS: u32 = 3;

/// Settle time between a tuning write and its verification read-back.
const SETTLE: Duration = Duration::from_micros(10);

/// One user-tuned register override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TuningEntry {
    /// Register address.
    pub addr: u8,
    /// Value to program.
    pub value: u8,
}

/// One line of the full-table report, read at report time, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLine {
    /// Register address.
    pub addr: u8,
    /// Value read back.
    pub value: u8,
}

/// Capacity-bounded, lock-protected tuning overrides for one device.
#[derive(Debug)]
pub struct TuningBuffer {
    variant: RepeaterVariant,
    entries: Mutex<Vec<TuningEntry>>,
}

impl TuningBuffer {
    /// Create an empty buffer bound to a chip variant.
    pub fn new(variant: RepeaterVariant) -> Self {
        Self {
            variant,
            entries: Mutex::new(Vec::new()),
        }
    }

    fn entries(&self) -> MutexGuard<'_, Vec<TuningEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of buffered entries.
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether the buffer holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Insert a new entry or update an existing address, then write it
    /// through to the chip with a verification read-back.
    ///
    /// A full buffer rejects new addresses with a logged notice and no
    /// error; write-through and read-back failures are likewise log-only.
    pub fn insert_or_update(&self, regs: &RegisterAccessor, addr: u8, value: u8) {
        let mut entries = self.entries();

        if let Some(slot) = entries.iter().position(|e| e.addr == addr) {
            entries[slot].value = value;
            let count = entries.len();
            write_through(regs, addr, value, slot, count);
            return;
        }

        if entries.len() >= TUNE_BUF_COUNT {
            info!("tuning buffer full ({TUNE_BUF_COUNT}), dropping {addr:#04x}");
            return;
        }

        entries.push(TuningEntry { addr, value });
        let slot = entries.len() - 1;
        let count = entries.len();
        write_through(regs, addr, value, slot, count);
    }

    /// Replay every buffered entry in insertion order.
    ///
    /// While the port runs as a client on the NXP part, the host test-mode
    /// entry is skipped; programming it would break the active link. Every
    /// other entry is written regardless of its neighbors' outcomes.
    pub fn apply_all(&self, regs: &RegisterAccessor, role: PortRole) {
        let entries = self.entries();

        for (slot, entry) in entries.iter().enumerate() {
            if role == PortRole::Client
                && self.variant == RepeaterVariant::Nxp
                && entry.addr == nxp::LINK_CONTROL1
                && entry.value == nxp::HOST_TEST_MODE
            {
                info!("skipping host test-mode setting in client role");
                continue;
            }
            write_through(regs, entry.addr, entry.value, slot, entries.len());
        }
    }

    /// Read the variant's full register table, in table order.
    ///
    /// # Errors
    ///
    /// Any unreadable register aborts the whole report; no partial table is
    /// ever returned.
    pub fn report(&self, regs: &RegisterAccessor) -> Result<Vec<ReportLine>> {
        // Hold the entry lock so the report never interleaves with a write.
        let _entries = self.entries();

        let map = self.variant.tune_map();
        let mut lines = Vec::with_capacity(map.len());
        for &addr in map {
            let value = regs
                .read(addr)
                .map_err(|_| RepeaterError::Report { addr })?;
            lines.push(ReportLine { addr, value });
        }
        Ok(lines)
    }

    /// Snapshot of the buffered entries, in insertion order.
    pub fn entries_snapshot(&self) -> Vec<TuningEntry> {
        self.entries().clone()
    }
}

/// Write an accepted entry to the chip and read it back for the log.
/// Neither failure undoes the buffer update or surfaces to the caller.
fn write_through(regs: &RegisterAccessor, addr: u8, value: u8, slot: usize, count: usize) {
    let _ = regs.write_retry(addr, value, TUNE_ATTEMPTS);
    std::thread::sleep(SETTLE);
    match regs.read_retry(addr, TUNE_ATTEMPTS) {
        Ok(readback) => {
            info!("tune [{slot}] {addr:#04x} {readback:#04x} ({count}/{TUNE_BUF_COUNT})");
        }
        Err(e) => warn!("tune [{slot}] {addr:#04x} read-back failed: {e}"),
    }
}
