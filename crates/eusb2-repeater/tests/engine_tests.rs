//! End-to-end engine tests over the simulated transport and rails.
//!
//! Everything here is deterministic; no hardware required.

use eusb2_chip::{nxp, rails, RepeaterVariant};
use eusb2_repeater::sim::{RailOp, RailOpKind, SimPort, SimRail, SimResetLine};
use eusb2_repeater::{
    Eusb2Repeater, PortRole, PowerState, PowerStep, Rail, RepeaterConfig, RepeaterError,
    TUNE_BUF_COUNT,
};

struct Harness {
    port: SimPort,
    vdd18: SimRail,
    vdd3: SimRail,
    reset: SimResetLine,
    dev: Eusb2Repeater,
}

fn attach(config: RepeaterConfig) -> Harness {
    let port = SimPort::new();
    let vdd18 = SimRail::new("vdd18");
    let vdd3 = SimRail::new("vdd3");
    let reset = SimResetLine::new();
    let dev = Eusb2Repeater::new(
        config,
        Box::new(port.clone()),
        Box::new(vdd18.clone()),
        Box::new(vdd3.clone()),
        Box::new(reset.clone()),
    )
    .expect("valid config");
    Harness {
        port,
        vdd18,
        vdd3,
        reset,
        dev,
    }
}

#[test]
fn attach_rejects_odd_override_before_any_io() {
    let port = SimPort::new();
    let result = Eusb2Repeater::new(
        RepeaterConfig::new(RepeaterVariant::Ti).with_override_seq(vec![0xAA, 0x02, 0xBB]),
        Box::new(port.clone()),
        Box::new(SimRail::new("vdd18")),
        Box::new(SimRail::new("vdd3")),
        Box::new(SimResetLine::new()),
    );
    assert!(matches!(result, Err(RepeaterError::Config { .. })));
    assert!(port.writes().is_empty());
}

#[test]
fn init_plays_plain_override_with_or_merge() {
    let h = attach(
        RepeaterConfig::new(RepeaterVariant::Nxp).with_override_seq(vec![0xAA, 0x02, 0xBB, 0x05]),
    );
    // Existing register contents get merged, not overwritten.
    h.port.preload(0x02, 0x01);
    h.port.preload(0x05, 0x44);

    h.dev.init().unwrap();
    assert_eq!(h.port.writes(), vec![(0x02, 0xAB), (0x05, 0xFF)]);
}

#[test]
fn init_plain_override_writes_n_pairs() {
    // Length 2n array → exactly n writes, in array order.
    let bytes: Vec<u8> = (0..10u8).flat_map(|i| [0x10 + i, 0x20 + i]).collect();
    let h = attach(RepeaterConfig::new(RepeaterVariant::Ti).with_override_seq(bytes));

    h.dev.init().unwrap();
    let writes = h.port.writes();
    assert_eq!(writes.len(), 10);
    for (i, &(addr, value)) in writes.iter().enumerate() {
        let i = u8::try_from(i).unwrap();
        assert_eq!(addr, 0x20 + i);
        assert_eq!(value, 0x10 + i);
    }
}

#[test]
fn init_prefers_host_sequence_in_host_role() {
    let mut host_bytes = vec![0u8; 8];
    host_bytes[7] = 0x06; // tuple 0 address
    host_bytes[3] = 0x77; // tuple 0 value
    let config = RepeaterConfig::new(RepeaterVariant::Nxp)
        .with_override_seq(vec![0xAA, 0x02])
        .with_host_override_seq(host_bytes)
        .with_role(PortRole::Host);
    let h = attach(config);

    h.dev.init().unwrap();
    assert_eq!(h.port.writes(), vec![(0x06, 0x77)]);
}

#[test]
fn init_falls_back_to_plain_sequence_in_client_role() {
    let mut host_bytes = vec![0u8; 8];
    host_bytes[7] = 0x06;
    host_bytes[3] = 0x77;
    let config = RepeaterConfig::new(RepeaterVariant::Nxp)
        .with_override_seq(vec![0xAA, 0x02])
        .with_host_override_seq(host_bytes);
    let h = attach(config);

    h.dev.init().unwrap();
    assert_eq!(h.port.writes(), vec![(0x02, 0xAA)]);
}

#[test]
fn init_replays_tuning_buffer_after_override() {
    let h = attach(
        RepeaterConfig::new(RepeaterVariant::Ti).with_override_seq(vec![0x01, 0x40]),
    );
    h.dev.tune_write(0x50, 0x09);
    h.port.clear_writes();

    h.dev.init().unwrap();
    assert_eq!(h.port.writes(), vec![(0x40, 0x01), (0x50, 0x09)]);
}

#[test]
fn power_up_then_down_leaves_rails_unloaded() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Nxp));

    h.dev.power_up().unwrap();
    assert_eq!(h.dev.power_state(), PowerState::On);

    h.dev.power_down().unwrap();
    assert_eq!(h.dev.power_state(), PowerState::Off);

    // Teardown runs in reverse bring-up order and ends with both rails at
    // load 0 and window [0, max].
    assert_eq!(
        h.vdd3.ops()[3..],
        [
            RailOp::Disable,
            RailOp::SetVoltage(0, rails::VDD3_VOL_MAX_UV),
            RailOp::SetLoad(0),
        ]
    );
    assert_eq!(
        h.vdd18.ops()[3..],
        [
            RailOp::Disable,
            RailOp::SetVoltage(0, rails::VDD18_VOL_MAX_UV),
            RailOp::SetLoad(0),
        ]
    );
}

#[test]
fn repeated_transitions_are_no_ops() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Ti));

    h.dev.power_down().unwrap(); // already off
    assert!(h.vdd18.ops().is_empty() && h.vdd3.ops().is_empty());

    h.dev.power_up().unwrap();
    let count = h.vdd18.ops().len() + h.vdd3.ops().len();
    h.dev.power_up().unwrap(); // already on
    assert_eq!(h.vdd18.ops().len() + h.vdd3.ops().len(), count);
}

#[test]
fn failed_power_up_unwinds_and_names_the_step() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Nxp));
    h.vdd3.fail_on(RailOpKind::Enable);

    let err = h.dev.power_up().unwrap_err();
    assert!(matches!(
        err,
        RepeaterError::PowerSequence {
            step: PowerStep::Enable(Rail::Vdd3)
        }
    ));
    assert_eq!(h.dev.power_state(), PowerState::Off);

    // A later power_down is a no-op: the unwind already ran.
    let ops = h.vdd18.ops().len() + h.vdd3.ops().len();
    h.dev.power_down().unwrap();
    assert_eq!(h.vdd18.ops().len() + h.vdd3.ops().len(), ops);
}

#[test]
fn vdd3_is_never_enabled_if_vdd18_enable_failed() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Nxp));
    h.vdd18.fail_on(RailOpKind::Enable);

    assert!(h.dev.power_up().is_err());
    assert!(!h.vdd3.ops().contains(&RailOp::Enable));
}

#[test]
fn tuning_buffer_caps_at_twenty_distinct_addresses() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Ti));
    for addr in 0..=20u8 {
        h.dev.tune_write(addr, 0xF0 | (addr & 0x0F));
    }
    assert_eq!(h.dev.tune_count(), TUNE_BUF_COUNT);

    // Re-inserting an existing address updates in place.
    h.dev.tune_write(0x05, 0x3C);
    assert_eq!(h.dev.tune_count(), TUNE_BUF_COUNT);
    assert_eq!(h.port.reg(0x05), 0x3C);
}

#[test]
fn apply_all_skips_host_test_mode_entry_for_nxp_client() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Nxp));
    h.dev.tune_write(nxp::LINK_CONTROL1, nxp::HOST_TEST_MODE);
    h.dev.tune_write(0x10, 0x01);
    h.dev.tune_write(0x14, 0x02);
    h.port.clear_writes();

    h.dev.init().unwrap();
    assert_eq!(h.port.writes(), vec![(0x10, 0x01), (0x14, 0x02)]);

    // After a role switch to host the same entry is applied again.
    h.dev.set_role(PortRole::Host);
    h.port.clear_writes();
    h.dev.init().unwrap();
    assert_eq!(
        h.port.writes(),
        vec![
            (nxp::LINK_CONTROL1, nxp::HOST_TEST_MODE),
            (0x10, 0x01),
            (0x14, 0x02)
        ]
    );
}

#[test]
fn tune_write_retries_transient_bus_faults() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Nxp));
    h.port.fail_writes(0x07, 2);

    h.dev.tune_write(0x07, 0x66);
    assert_eq!(h.port.reg(0x07), 0x66);
    assert_eq!(h.dev.tune_count(), 1);
}

#[test]
fn report_is_all_or_nothing() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Nxp));
    for &addr in RepeaterVariant::Nxp.tune_map() {
        h.port.preload(addr, addr.wrapping_mul(3));
    }

    let lines = h.dev.tune_report().unwrap();
    assert_eq!(lines.len(), 17);
    assert_eq!(lines[0].addr, nxp::RESET_CONTROL);

    h.port.fail_reads(nxp::LINK_STATUS, u32::MAX);
    let err = h.dev.tune_report().unwrap_err();
    assert!(matches!(
        err,
        RepeaterError::Report {
            addr: nxp::LINK_STATUS
        }
    ));
}

#[test]
fn reset_only_drives_the_line() {
    let h = attach(RepeaterConfig::new(RepeaterVariant::Ti));
    h.dev.reset(true);
    h.dev.reset(false);
    assert_eq!(h.reset.levels(), vec![true, false]);
    assert!(h.port.writes().is_empty());
}

#[test]
fn full_lifecycle_on_sim() {
    let h = attach(
        RepeaterConfig::new(RepeaterVariant::Nxp).with_override_seq(vec![0x22, 0x04, 0x11, 0x05]),
    );

    h.dev.power_up().unwrap();
    h.dev.reset(false);
    h.dev.init().unwrap();
    h.dev.tune_write(0x09, 0x80);

    let lines = h.dev.tune_report().unwrap();
    let hs_term = lines.iter().find(|l| l.addr == 0x09).unwrap();
    assert_eq!(hs_term.value, 0x80);

    h.dev.power_down().unwrap();
    assert_eq!(h.dev.power_state(), PowerState::Off);
}
