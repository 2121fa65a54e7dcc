//! NXP PTN3222 eUSB2 repeater register map.

// ── Control ──────────────────────────────────────────────────────────────────

/// Reset control.
pub const RESET_CONTROL: u8 = 0x01;
/// Link control 1. Writing the host test-mode value here while the port is
/// acting as a client breaks the link, so the tuning replay guards it.
pub const LINK_CONTROL1: u8 = 0x02;
/// Link control 2.
pub const LINK_CONTROL2: u8 = 0x03;

// ── Signal tuning ────────────────────────────────────────────────────────────

/// eUSB2-side receiver tuning.
pub const EUSB2_RX_CONTROL: u8 = 0x04;
/// eUSB2-side transmitter tuning.
pub const EUSB2_TX_CONTROL: u8 = 0x05;
/// USB2-side receiver tuning.
pub const USB2_RX_CONTROL: u8 = 0x06;
/// USB2-side transmitter tuning 1.
pub const USB2_TX_CONTROL1: u8 = 0x07;
/// USB2-side transmitter tuning 2.
pub const USB2_TX_CONTROL2: u8 = 0x08;
/// High-speed termination trim.
pub const USB2_HS_TERMINATION: u8 = 0x09;
/// High-speed disconnect threshold.
pub const USB2_HS_DISCONNECT_THRESHOLD: u8 = 0x0A;

// ── Status and identity ──────────────────────────────────────────────────────

/// RAP signature.
pub const RAP_SIGNATURE: u8 = 0x0D;
/// Device status.
pub const DEVICE_STATUS: u8 = 0x0F;
/// Link status.
pub const LINK_STATUS: u8 = 0x10;
/// Silicon revision.
pub const REVISION_ID: u8 = 0x13;
/// Chip ID byte 0.
pub const CHIP_ID_0: u8 = 0x14;
/// Chip ID byte 1.
pub const CHIP_ID_1: u8 = 0x15;
/// Chip ID byte 2.
pub const CHIP_ID_2: u8 = 0x16;

/// `LINK_CONTROL1` value that puts the repeater into host test mode.
pub const HOST_TEST_MODE: u8 = 0x03;

/// Report table: every register the tuning report dumps, in report order.
pub const TUNE_MAP: &[u8] = &[
    RESET_CONTROL,
    LINK_CONTROL1,
    LINK_CONTROL2,
    EUSB2_RX_CONTROL,
    EUSB2_TX_CONTROL,
    USB2_RX_CONTROL,
    USB2_TX_CONTROL1,
    USB2_TX_CONTROL2,
    USB2_HS_TERMINATION,
    USB2_HS_DISCONNECT_THRESHOLD,
    RAP_SIGNATURE,
    DEVICE_STATUS,
    LINK_STATUS,
    REVISION_ID,
    CHIP_ID_0,
    CHIP_ID_1,
    CHIP_ID_2,
];
