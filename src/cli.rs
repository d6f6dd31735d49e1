//! Command line parsing for `pve-capacity`.

use std::path::PathBuf;

use thiserror::Error;

pub const MONITOR_EXPORT_FILE: &str = "proxmox_stats.json";
pub const VMS_EXPORT_FILE: &str = "vm_details.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CliError {
    #[error("missing command")]
    MissingCommand,
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("unknown option for {command}: {option}")]
    UnknownOption { command: &'static str, option: String },
    #[error("option {0} requires a value")]
    MissingValue(String),
    #[error("option {0} does not take a value")]
    UnexpectedValue(String),
    #[error("invalid status '{0}' (expected running or stopped)")]
    InvalidStatus(String),
}

/// Options shared by both commands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonArgs {
    pub config: Option<PathBuf>,
    pub export: bool,
    pub output: PathBuf,
    pub verbose: bool,
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorArgs {
    pub common: CommonArgs,
    pub list_vms: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VmsArgs {
    pub common: CommonArgs,
    pub status: Option<String>,
    pub name: Option<String>,
    pub detailed: bool,
    pub all_details: bool,
    pub summary_only: bool,
    pub stats: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Monitor(MonitorArgs),
    Vms(VmsArgs),
    Help,
    Version,
}

pub fn usage() -> String {
    "\
Usage: pve-capacity <COMMAND> [OPTIONS]

Commands:
  monitor    Cluster capacity dashboard and growth prediction
  vms        Detailed VM listing

Common options:
  -c, --config FILE     Credentials file (default: $PVE_CREDENTIALS or proxmox_credentials.json)
  -e, --export          Export results to a JSON file
  -o, --output FILE     Export file (monitor: proxmox_stats.json, vms: vm_details.json)
  -v, --verbose         Debug logging
      --no-color        Disable colored output (also NO_COLOR)

monitor options:
  -l, --list-vms        Show the VMs of each server

vms options:
  -s, --status STATUS   Only VMs that are running or stopped
  -n, --name TEXT       Only VMs whose name contains TEXT (case-insensitive)
  -d, --detailed        Detailed view of each VM
  -a, --all-details     Detailed view including raw disk and network configs
      --summary-only    Only the summary table
      --stats           VM statistics

  -h, --help            Print this help message
  -V, --version         Print version and exit"
        .to_string()
}

/// Parses the arguments after the program name.
pub fn parse<I>(args: I) -> Result<Command, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let command = args.next().ok_or(CliError::MissingCommand)?;
    match command.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-V" | "--version" => Ok(Command::Version),
        "monitor" => parse_monitor(args),
        "vms" => parse_vms(args),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

/// Splits `--flag=value` into its parts.
fn split_inline(arg: &str) -> (&str, Option<&str>) {
    match arg.split_once('=') {
        Some((flag, value)) if flag.starts_with("--") => (flag, Some(value)),
        _ => (arg, None),
    }
}

struct Cursor<I> {
    args: I,
}

impl<I: Iterator<Item = String>> Cursor<I> {
    fn value(&mut self, flag: &str, inline: Option<&str>) -> Result<String, CliError> {
        match inline {
            Some(value) => Ok(value.to_string()),
            None => self
                .args
                .next()
                .ok_or_else(|| CliError::MissingValue(flag.to_string())),
        }
    }
}

fn switch(flag: &str, inline: Option<&str>) -> Result<bool, CliError> {
    match inline {
        Some(_) => Err(CliError::UnexpectedValue(flag.to_string())),
        None => Ok(true),
    }
}

/// Applies a common option; returns false when `flag` is not one.
fn parse_common<I: Iterator<Item = String>>(
    common: &mut CommonArgs,
    flag: &str,
    inline: Option<&str>,
    cursor: &mut Cursor<I>,
) -> Result<bool, CliError> {
    match flag {
        "-c" | "--config" => common.config = Some(PathBuf::from(cursor.value(flag, inline)?)),
        "-e" | "--export" => common.export = switch(flag, inline)?,
        "-o" | "--output" => common.output = PathBuf::from(cursor.value(flag, inline)?),
        "-v" | "--verbose" => common.verbose = switch(flag, inline)?,
        "--no-color" => common.no_color = switch(flag, inline)?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn parse_monitor<I: Iterator<Item = String>>(args: I) -> Result<Command, CliError> {
    let mut cursor = Cursor { args };
    let mut parsed = MonitorArgs {
        common: CommonArgs {
            output: PathBuf::from(MONITOR_EXPORT_FILE),
            ..CommonArgs::default()
        },
        list_vms: false,
    };

    while let Some(arg) = cursor.args.next() {
        let (flag, inline) = split_inline(&arg);
        if parse_common(&mut parsed.common, flag, inline, &mut cursor)? {
            continue;
        }
        match flag {
            "-l" | "--list-vms" => parsed.list_vms = switch(flag, inline)?,
            "-h" | "--help" => return Ok(Command::Help),
            _ => {
                return Err(CliError::UnknownOption {
                    command: "monitor",
                    option: arg.clone(),
                });
            }
        }
    }
    Ok(Command::Monitor(parsed))
}

fn parse_vms<I: Iterator<Item = String>>(args: I) -> Result<Command, CliError> {
    let mut cursor = Cursor { args };
    let mut parsed = VmsArgs {
        common: CommonArgs {
            output: PathBuf::from(VMS_EXPORT_FILE),
            ..CommonArgs::default()
        },
        status: None,
        name: None,
        detailed: false,
        all_details: false,
        summary_only: false,
        stats: false,
    };

    while let Some(arg) = cursor.args.next() {
        let (flag, inline) = split_inline(&arg);
        if parse_common(&mut parsed.common, flag, inline, &mut cursor)? {
            continue;
        }
        match flag {
            "-s" | "--status" => {
                let status = cursor.value(flag, inline)?;
                if !matches!(status.as_str(), "running" | "stopped") {
                    return Err(CliError::InvalidStatus(status));
                }
                parsed.status = Some(status);
            }
            "-n" | "--name" => parsed.name = Some(cursor.value(flag, inline)?),
            "-d" | "--detailed" => parsed.detailed = switch(flag, inline)?,
            "-a" | "--all-details" => parsed.all_details = switch(flag, inline)?,
            "--summary-only" => parsed.summary_only = switch(flag, inline)?,
            "--stats" => parsed.stats = switch(flag, inline)?,
            "-h" | "--help" => return Ok(Command::Help),
            _ => {
                return Err(CliError::UnknownOption {
                    command: "vms",
                    option: arg.clone(),
                });
            }
        }
    }
    Ok(Command::Vms(parsed))
}
