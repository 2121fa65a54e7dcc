//! TI eUSB2 repeater register map.
//!
//! Unlike the PTN3222's contiguous low addresses, the TI part scatters its
//! configuration across the byte address space.

// ── GPIO and ports ───────────────────────────────────────────────────────────

/// GPIO0 configuration.
pub const GPIO0_CONFIG: u8 = 0x00;
/// GPIO1 configuration.
pub const GPIO1_CONFIG: u8 = 0x40;
/// UART port 1 configuration.
pub const UART_PORT1: u8 = 0x50;
/// Extra port 1 configuration.
pub const EXTRA_PORT1: u8 = 0x51;

// ── Global ───────────────────────────────────────────────────────────────────

/// Silicon revision.
pub const REV_ID: u8 = 0xB0;
/// Global configuration.
pub const GLOBAL_CONFIG: u8 = 0xB2;

// ── Interrupts and battery charging ──────────────────────────────────────────

/// Interrupt enable 1.
pub const INT_ENABLE_1: u8 = 0xB3;
/// Interrupt enable 2.
pub const INT_ENABLE_2: u8 = 0xB4;
/// Battery-charging control.
pub const BC_CONTROL: u8 = 0xB6;
/// Battery-charging status 1.
pub const BC_STATUS_1: u8 = 0xB7;
/// Interrupt status 1.
pub const INT_STATUS_1: u8 = 0xA3;
/// Interrupt status 2.
pub const INT_STATUS_2: u8 = 0xA4;

/// Report table: every register the tuning report dumps, in report order.
pub const TUNE_MAP: &[u8] = &[
    GPIO0_CONFIG,
    GPIO1_CONFIG,
    UART_PORT1,
    EXTRA_PORT1,
    REV_ID,
    GLOBAL_CONFIG,
    INT_ENABLE_1,
    INT_ENABLE_2,
    BC_CONTROL,
    BC_STATUS_1,
    INT_STATUS_1,
    INT_STATUS_2,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tune_map_order() {
        assert_eq!(TUNE_MAP[0], GPIO0_CONFIG);
        assert_eq!(*TUNE_MAP.last().unwrap(), INT_STATUS_2);
    }
}
