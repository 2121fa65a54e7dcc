//! Register sequencing and power-state control engine for eUSB2 repeaters.
//!
//! Drives one of two register-incompatible repeater chips (TI or NXP
//! PTN3222) over a caller-supplied byte-addressed bus: ordered two-rail
//! power sequencing with unwind-on-failure, a one-shot init-time register
//! override replay, and a lock-protected runtime tuning buffer behind a
//! debug interface.
//!
//! The engine owns no bus and no pins — [`TransportPort`], [`RailHandle`]
//! and [`ResetLine`] are capabilities handed in at attach. The [`sim`]
//! module supplies software renditions of all three so everything here runs
//! (and is tested) without hardware.
//!
//! # Quick start
//!
//! ```
//! use eusb2_chip::RepeaterVariant;
//! use eusb2_repeater::sim::{SimPort, SimRail, SimResetLine};
//! use eusb2_repeater::{Eusb2Repeater, RepeaterConfig};
//!
//! # fn main() -> eusb2_repeater::Result<()> {
//! let config = RepeaterConfig::new(RepeaterVariant::Nxp)
//!     .with_override_seq(vec![0xAA, 0x02, 0xBB, 0x05]);
//!
//! let dev = Eusb2Repeater::new(
//!     config,
//!     Box::new(SimPort::new()),
//!     Box::new(SimRail::new("vdd18")),
//!     Box::new(SimRail::new("vdd3")),
//!     Box::new(SimResetLine::new()),
//! )?;
//!
//! dev.power_up()?;
//! dev.init()?;
//! dev.tune_write(0x04, 0x5A);
//!
//! for line in dev.tune_report()? {
//!     println!("{:#04x} {:#04x}", line.addr, line.value);
//! }
//!
//! dev.power_down()?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

mod config;
mod device;
mod error;
mod power;
mod regio;
mod sequence;
pub mod sim;
mod transport;
mod tuning;

pub use config::{PortRole, RepeaterConfig};
pub use device::Eusb2Repeater;
pub use error::{RepeaterError, Result};
pub use power::{PowerSequencer, PowerState, PowerStep, Rail, RailHandle};
pub use regio::RegisterAccessor;
pub use sequence::OverrideSequence;
pub use transport::{ResetLine, TransportPort};
pub use tuning::{ReportLine, TuningBuffer, TuningEntry, TUNE_BUF_COUNT};

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        Eusb2Repeater, PortRole, PowerState, RepeaterConfig, RepeaterError, ReportLine, Result,
    };
    pub use eusb2_chip::RepeaterVariant;
}
