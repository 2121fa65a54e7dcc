//! Silicon model for eUSB2 signal-repeater chips.
//!
//! This crate has **no dependencies** and **no hardware access** — it is a
//! pure model of the two supported repeaters: register addresses, the
//! per-variant tuning-report tables, and the supply-rail electrical
//! constants. The two register maps are incompatible; everything that varies
//! by chip hangs off [`RepeaterVariant`].
//!
//! # Crate organisation
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`nxp`] | NXP PTN3222 register map + 17-entry tuning table |
//! | [`ti`] | TI repeater register map + 12-entry tuning table |
//! | [`rails`] | vdd18 / vdd3 load and voltage-window constants |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod nxp;
pub mod rails;
pub mod ti;

/// Repeater chip variant, fixed at device attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepeaterVariant {
    /// TI eUSB2 repeater.
    Ti,
    /// NXP PTN3222 eUSB2 repeater.
    Nxp,
}

impl RepeaterVariant {
    /// Ordered register-address table dumped by the tuning report.
    ///
    /// 17 addresses for NXP, 12 for TI; report order is table order.
    #[must_use]
    pub const fn tune_map(&self) -> &'static [u8] {
        match self {
            Self::Ti => ti::TUNE_MAP,
            Self::Nxp => nxp::TUNE_MAP,
        }
    }
}

impl std::fmt::Display for RepeaterVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ti => write!(f, "TI"),
            Self::Nxp => write!(f, "NXP"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tune_map_sizes() {
        assert_eq!(RepeaterVariant::Nxp.tune_map().len(), 17);
        assert_eq!(RepeaterVariant::Ti.tune_map().len(), 12);
    }

    #[test]
    fn tune_map_addresses_unique() {
        for variant in [RepeaterVariant::Ti, RepeaterVariant::Nxp] {
            let map = variant.tune_map();
            for (i, a) in map.iter().enumerate() {
                assert!(
                    !map[i + 1..].contains(a),
                    "{variant}: duplicate address {a:#04x}"
                );
            }
        }
    }
}
