//! `eusb2` — debug and report interface for the repeater engine.
//!
//! ```text
//! USAGE:
//!   eusb2 report --variant <ti|nxp>                 Dump the full register table
//!   eusb2 tune --variant <ti|nxp> <addr> <value>    Buffer a tuning write (hex tokens)
//!   eusb2 bringup --variant <ti|nxp> [options]      Power up, init and dump
//! ```
//!
//! Runs against the simulated transport and rails; the engine itself never
//! knows the difference. Register values are hexadecimal throughout, with
//! or without a `0x` prefix.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use eusb2_chip::RepeaterVariant;
use eusb2_repeater::sim::{SimPort, SimRail, SimResetLine};
use eusb2_repeater::{Eusb2Repeater, PortRole, RepeaterConfig, ReportLine};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eusb2", about = "eUSB2 repeater debug CLI", version)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Clone, Copy, ValueEnum)]
enum VariantArg {
    /// TI eUSB2 repeater (12-register table).
    Ti,
    /// NXP PTN3222 (17-register table).
    Nxp,
}

impl From<VariantArg> for RepeaterVariant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Ti => Self::Ti,
            VariantArg::Nxp => Self::Nxp,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    /// Downstream-facing port.
    Host,
    /// Upstream-facing port.
    Client,
}

impl From<RoleArg> for PortRole {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::Host => Self::Host,
            RoleArg::Client => Self::Client,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Dump every register of the variant's table.
    Report {
        /// Chip variant.
        #[arg(long, value_enum)]
        variant: VariantArg,
    },
    /// Buffer a tuning write and show the resulting table.
    Tune {
        /// Chip variant.
        #[arg(long, value_enum)]
        variant: VariantArg,
        /// Register address (hex).
        address: String,
        /// Value to program (hex).
        value: String,
    },
    /// Power up, run init and dump the table.
    Bringup {
        /// Chip variant.
        #[arg(long, value_enum)]
        variant: VariantArg,
        /// Plain override bytes, comma-separated hex (value,addr,...).
        #[arg(long)]
        override_seq: Option<String>,
        /// Host-role override bytes, comma-separated hex.
        #[arg(long)]
        host_override_seq: Option<String>,
        /// Port role during init.
        #[arg(long, value_enum, default_value = "client")]
        role: RoleArg,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Cmd::Report { variant } => cmd_report(variant.into()),
        Cmd::Tune {
            variant,
            address,
            value,
        } => cmd_tune(variant.into(), &address, &value),
        Cmd::Bringup {
            variant,
            override_seq,
            host_override_seq,
            role,
        } => cmd_bringup(
            variant.into(),
            override_seq.as_deref(),
            host_override_seq.as_deref(),
            role.into(),
        ),
    }
}

fn attach_sim(config: RepeaterConfig) -> Result<Eusb2Repeater> {
    let dev = Eusb2Repeater::new(
        config,
        Box::new(SimPort::new()),
        Box::new(SimRail::new("vdd18")),
        Box::new(SimRail::new("vdd3")),
        Box::new(SimResetLine::new()),
    )?;
    Ok(dev)
}

fn cmd_report(variant: RepeaterVariant) -> Result<()> {
    let dev = attach_sim(RepeaterConfig::new(variant))?;
    print_report(variant, &dev.tune_report()?);
    Ok(())
}

fn cmd_tune(variant: RepeaterVariant, address: &str, value: &str) -> Result<()> {
    let addr = parse_hex_byte(address)?;
    let value = parse_hex_byte(value)?;

    let dev = attach_sim(RepeaterConfig::new(variant))?;
    dev.tune_write(addr, value);
    println!("buffered {addr:#04x} {value:#04x} ({} entr{})", dev.tune_count(),
        if dev.tune_count() == 1 { "y" } else { "ies" });
    print_report(variant, &dev.tune_report()?);
    Ok(())
}

fn cmd_bringup(
    variant: RepeaterVariant,
    override_seq: Option<&str>,
    host_override_seq: Option<&str>,
    role: PortRole,
) -> Result<()> {
    let mut config = RepeaterConfig::new(variant).with_role(role);
    if let Some(bytes) = override_seq {
        config = config.with_override_seq(parse_hex_bytes(bytes)?);
    }
    if let Some(bytes) = host_override_seq {
        config = config.with_host_override_seq(parse_hex_bytes(bytes)?);
    }

    let dev = attach_sim(config)?;
    dev.power_up()?;
    dev.reset(false);
    dev.init()?;
    println!("bringup complete: {variant} ({role}), power {:?}", dev.power_state());
    print_report(variant, &dev.tune_report()?);
    Ok(())
}

fn print_report(variant: RepeaterVariant, lines: &[ReportLine]) {
    println!();
    println!(" Address Value - {variant}");
    for line in lines {
        println!("  {:#04x}   {:#04x}", line.addr, line.value);
    }
}

fn parse_hex_byte(token: &str) -> Result<u8> {
    let trimmed = token.trim().trim_start_matches("0x");
    u8::from_str_radix(trimmed, 16).with_context(|| format!("invalid hex byte: {token}"))
}

fn parse_hex_bytes(list: &str) -> Result<Vec<u8>> {
    if list.trim().is_empty() {
        return Err(anyhow!("empty byte list"));
    }
    list.split(',').map(parse_hex_byte).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parsing_accepts_prefixes() {
        assert_eq!(parse_hex_byte("0x1F").unwrap(), 0x1F);
        assert_eq!(parse_hex_byte(" 1f ").unwrap(), 0x1F);
        assert!(parse_hex_byte("zz").is_err());
    }

    #[test]
    fn byte_lists_are_comma_separated() {
        assert_eq!(
            parse_hex_bytes("AA,02,BB,05").unwrap(),
            vec![0xAA, 0x02, 0xBB, 0x05]
        );
        assert!(parse_hex_bytes("").is_err());
    }
}
