//! Supply-rail power sequencing
//!
//! The repeater is powered by two rails brought up in a strict order:
//! vdd18 (load, voltage window, enable) then vdd3 (load, voltage window,
//! enable). A failure anywhere aborts the transition and unwinds every step
//! already taken, in reverse, so the rails are never left half-configured.
//! Outside a transition the state is exactly [`PowerState::Off`] or
//! [`PowerState::On`].

use crate::error::{RepeaterError, Result};
use eusb2_chip::rails;
use tracing::{debug, info, warn};

/// Controllable supply rail, supplied by the external regulator framework.
pub trait RailHandle: Send {
    /// Set the expected load in µA.
    ///
    /// # Errors
    ///
    /// Returns error if the regulator rejects the load request.
    fn set_load(&mut self, load_ua: u32) -> Result<()>;

    /// Set the permitted voltage window in µV.
    ///
    /// # Errors
    ///
    /// Returns error if the regulator rejects the window.
    fn set_voltage(&mut self, min_uv: u32, max_uv: u32) -> Result<()>;

    /// Enable the rail.
    ///
    /// # Errors
    ///
    /// Returns error if the rail fails to come up.
    fn enable(&mut self) -> Result<()>;

    /// Disable the rail.
    ///
    /// # Errors
    ///
    /// Returns error if the rail fails to go down.
    fn disable(&mut self) -> Result<()>;
}

/// Rail power state. Transitions only through [`PowerSequencer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    /// Both rails down.
    Off,
    /// Both rails up and in their operating windows.
    On,
}

/// Which rail a step touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rail {
    /// 1.8 V core supply.
    Vdd18,
    /// 3.0 V I/O supply.
    Vdd3,
}

impl std::fmt::Display for Rail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vdd18 => write!(f, "vdd18"),
            Self::Vdd3 => write!(f, "vdd3"),
        }
    }
}

/// One step of the bring-up sequence, reported when it is the first to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerStep {
    /// Setting a rail's load.
    SetLoad(Rail),
    /// Setting a rail's voltage window.
    SetVoltage(Rail),
    /// Enabling a rail.
    Enable(Rail),
}

impl std::fmt::Display for PowerStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SetLoad(rail) => write!(f, "set {rail} load"),
            Self::SetVoltage(rail) => write!(f, "set {rail} voltage"),
            Self::Enable(rail) => write!(f, "enable {rail}"),
        }
    }
}

/// Two-rail power state machine with unwind-on-failure.
pub struct PowerSequencer {
    vdd18: Box<dyn RailHandle>,
    vdd3: Box<dyn RailHandle>,
    state: PowerState,
}

impl std::fmt::Debug for PowerSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PowerSequencer")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl PowerSequencer {
    /// Bind the sequencer to its two rails. Starts [`PowerState::Off`].
    pub fn new(vdd18: Box<dyn RailHandle>, vdd3: Box<dyn RailHandle>) -> Self {
        Self {
            vdd18,
            vdd3,
            state: PowerState::Off,
        }
    }

    /// Current power state.
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.state
    }

    /// Bring both rails up in order. No-op when already on.
    ///
    /// # Errors
    ///
    /// Returns `PowerSequence` naming the first failing step; every step
    /// already taken has been unwound and the state remains off.
    pub fn power_up(&mut self) -> Result<()> {
        if self.state == PowerState::On {
            debug!("rails already up");
            return Ok(());
        }

        if let Some((step, completed)) = self.raise() {
            warn!("power-up failed at '{step}', unwinding {completed} step(s)");
            self.unwind(completed);
            return Err(RepeaterError::PowerSequence { step });
        }

        self.state = PowerState::On;
        info!("repeater rails up");
        Ok(())
    }

    /// Take both rails down in reverse bring-up order. No-op when already
    /// off. Individual step failures are logged and tolerated; the state is
    /// unconditionally off afterwards.
    ///
    /// # Errors
    ///
    /// Never fails; `Result` kept for lifecycle-interface symmetry.
    pub fn power_down(&mut self) -> Result<()> {
        if self.state == PowerState::Off {
            debug!("rails already down");
            return Ok(());
        }

        self.unwind(6);
        self.state = PowerState::Off;
        info!("repeater rails down");
        Ok(())
    }

    /// Run the six bring-up steps. On failure returns the failing step and
    /// how many steps completed before it.
    fn raise(&mut self) -> Option<(PowerStep, u8)> {
        if let Err(e) = self.vdd18.set_load(rails::VDD18_HPM_LOAD_UA) {
            warn!("unable to set vdd18 load: {e}");
            return Some((PowerStep::SetLoad(Rail::Vdd18), 0));
        }
        if let Err(e) = self
            .vdd18
            .set_voltage(rails::VDD18_VOL_MIN_UV, rails::VDD18_VOL_MAX_UV)
        {
            warn!("unable to set vdd18 voltage: {e}");
            return Some((PowerStep::SetVoltage(Rail::Vdd18), 1));
        }
        if let Err(e) = self.vdd18.enable() {
            warn!("unable to enable vdd18: {e}");
            return Some((PowerStep::Enable(Rail::Vdd18), 2));
        }
        if let Err(e) = self.vdd3.set_load(rails::VDD3_HPM_LOAD_UA) {
            warn!("unable to set vdd3 load: {e}");
            return Some((PowerStep::SetLoad(Rail::Vdd3), 3));
        }
        if let Err(e) = self
            .vdd3
            .set_voltage(rails::VDD3_VOL_MIN_UV, rails::VDD3_VOL_MAX_UV)
        {
            warn!("unable to set vdd3 voltage: {e}");
            return Some((PowerStep::SetVoltage(Rail::Vdd3), 4));
        }
        if let Err(e) = self.vdd3.enable() {
            warn!("unable to enable vdd3: {e}");
            return Some((PowerStep::Enable(Rail::Vdd3), 5));
        }
        None
    }

    /// Undo the first `completed` bring-up steps in reverse order.
    /// `completed = 6` is the full teardown used by [`Self::power_down`].
    /// Failures here are logged only; there is nothing left to abort to.
    fn unwind(&mut self, completed: u8) {
        if completed >= 6 {
            if let Err(e) = self.vdd3.disable() {
                warn!("unable to disable vdd3: {e}");
            }
        }
        if completed >= 5 {
            if let Err(e) = self.vdd3.set_voltage(0, rails::VDD3_VOL_MAX_UV) {
                warn!("unable to unset vdd3 voltage: {e}");
            }
        }
        if completed >= 4 {
            if let Err(e) = self.vdd3.set_load(0) {
                warn!("unable to unset vdd3 load: {e}");
            }
        }
        if completed >= 3 {
            if let Err(e) = self.vdd18.disable() {
                warn!("unable to disable vdd18: {e}");
            }
        }
        if completed >= 2 {
            if let Err(e) = self.vdd18.set_voltage(0, rails::VDD18_VOL_MAX_UV) {
                warn!("unable to unset vdd18 voltage: {e}");
            }
        }
        if completed >= 1 {
            if let Err(e) = self.vdd18.set_load(0) {
                warn!("unable to unset vdd18 load: {e}");
            }
        }
    }
}
