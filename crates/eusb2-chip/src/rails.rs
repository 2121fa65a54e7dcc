//! Supply-rail electrical constants.
//!
//! The repeater is fed by two rails: a 1.8 V core supply (vdd18) and a
//! 3.0 V I/O supply (vdd3). Loads are the high-power-mode figures from the
//! reference design; the vdd3 window is deliberately wide to accommodate
//! shared-PMIC boards.

/// vdd3 minimum voltage (µV).
pub const VDD3_VOL_MIN_UV: u32 = 3_075_000;
/// vdd3 maximum voltage (µV).
pub const VDD3_VOL_MAX_UV: u32 = 3_300_000;
/// vdd3 high-power-mode load (µA).
pub const VDD3_HPM_LOAD_UA: u32 = 3_500;

/// vdd18 minimum voltage (µV).
pub const VDD18_VOL_MIN_UV: u32 = 1_800_000;
/// vdd18 maximum voltage (µV).
pub const VDD18_VOL_MAX_UV: u32 = 1_800_000;
/// vdd18 high-power-mode load (µA).
pub const VDD18_HPM_LOAD_UA: u32 = 32_000;
