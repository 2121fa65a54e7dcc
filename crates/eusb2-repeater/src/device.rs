//! Repeater device handle
//!
//! Binds the chip variant and the caller-supplied capabilities into one
//! shareable handle. The lifecycle collaborator drives `init`, `power_up`,
//! `power_down` and `reset`; the debug interface drives `tune_write` and
//! `tune_report` concurrently for the life of the device. There is no
//! process-wide singleton; every call goes through an explicit handle.

use crate::config::{PortRole, RepeaterConfig};
use crate::error::Result;
use crate::power::{PowerSequencer, PowerState, RailHandle};
use crate::regio::RegisterAccessor;
use crate::sequence::OverrideSequence;
use crate::transport::{ResetLine, TransportPort};
use crate::tuning::{ReportLine, TuningBuffer};
use eusb2_chip::RepeaterVariant;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// An attached eUSB2 repeater.
pub struct Eusb2Repeater {
    variant: RepeaterVariant,
    regs: RegisterAccessor,
    power: Mutex<PowerSequencer>,
    reset_line: Mutex<Box<dyn ResetLine>>,
    override_seq: Option<OverrideSequence>,
    host_override_seq: Option<OverrideSequence>,
    tuning: TuningBuffer,
    role: Mutex<PortRole>,
}

impl std::fmt::Debug for Eusb2Repeater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Eusb2Repeater")
            .field("variant", &self.variant)
            .finish_non_exhaustive()
    }
}

impl Eusb2Repeater {
    /// Attach a repeater: validate the configuration and bind the transport,
    /// the two rails and the reset line. No register I/O happens here; a bad
    /// override array fails the attach before the bus is ever touched.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an odd-length override array.
    pub fn new(
        config: RepeaterConfig,
        port: Box<dyn TransportPort>,
        vdd18: Box<dyn RailHandle>,
        vdd3: Box<dyn RailHandle>,
        reset_line: Box<dyn ResetLine>,
    ) -> Result<Self> {
        let cfg = config.validate()?;

        info!("attached {} eUSB2 repeater ({})", cfg.variant, cfg.role);

        Ok(Self {
            variant: cfg.variant,
            regs: RegisterAccessor::new(port),
            power: Mutex::new(PowerSequencer::new(vdd18, vdd3)),
            reset_line: Mutex::new(reset_line),
            override_seq: cfg.override_seq,
            host_override_seq: cfg.host_override_seq,
            tuning: TuningBuffer::new(cfg.variant),
            role: Mutex::new(cfg.role),
        })
    }

    /// Chip variant bound at attach.
    #[must_use]
    pub const fn variant(&self) -> RepeaterVariant {
        self.variant
    }

    /// Current port role.
    pub fn role(&self) -> PortRole {
        *self.role.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Update the port role; the link framework calls this on role switches.
    pub fn set_role(&self, role: PortRole) {
        debug!("role -> {role}");
        *self.role.lock().unwrap_or_else(PoisonError::into_inner) = role;
    }

    /// Initialize the chip: play the override sequence (the host-role one
    /// wins when present and the port is a host), then replay any buffered
    /// tuning entries. Per-write failures are logged, never fatal.
    ///
    /// # Errors
    ///
    /// Currently infallible; `Result` kept for the lifecycle interface.
    pub fn init(&self) -> Result<()> {
        let role = self.role();

        match (&self.host_override_seq, role) {
            (Some(seq), PortRole::Host) => {
                debug!("{} {role} mode override seq", self.variant);
                seq.play(&self.regs);
            }
            _ => {
                if let Some(seq) = &self.override_seq {
                    seq.play(&self.regs);
                }
            }
        }

        if !self.tuning.is_empty() {
            self.tuning.apply_all(&self.regs, role);
        }

        info!("eUSB2 repeater init");
        Ok(())
    }

    /// Bring the rails up.
    ///
    /// # Errors
    ///
    /// Returns `PowerSequence` naming the first failing step; the rails
    /// have been unwound and the state remains off.
    pub fn power_up(&self) -> Result<()> {
        self.power
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .power_up()
    }

    /// Take the rails down. Individual step failures are logged and
    /// tolerated; the state is off afterwards.
    ///
    /// # Errors
    ///
    /// Never fails; `Result` kept for the lifecycle interface.
    pub fn power_down(&self) -> Result<()> {
        self.power
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .power_down()
    }

    /// Current power state.
    pub fn power_state(&self) -> PowerState {
        self.power
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .state()
    }

    /// Drive the reset line. No register I/O.
    pub fn reset(&self, assert: bool) {
        debug!("reset gpio:{}", if assert { "assert" } else { "deassert" });
        self.reset_line
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .set(assert);
    }

    /// Debug interface write: buffer `(addr, value)` and write it through.
    /// Soft failures (full buffer, exhausted bus retries) are log-only.
    pub fn tune_write(&self, addr: u8, value: u8) {
        self.tuning.insert_or_update(&self.regs, addr, value);
    }

    /// Debug interface read: dump the variant's full register table.
    ///
    /// # Errors
    ///
    /// Any unreadable register aborts the report; no partial table.
    pub fn tune_report(&self) -> Result<Vec<ReportLine>> {
        self.tuning.report(&self.regs)
    }

    /// Number of buffered tuning entries.
    pub fn tune_count(&self) -> usize {
        self.tuning.len()
    }
}
