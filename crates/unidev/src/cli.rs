//! Clap derive structures for the `unidev` binary.
//!
//! Running with no arguments lists the configured site's devices.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// unidev -- list the devices of a UniFi site
#[derive(Debug, Parser)]
#[command(
    name = "unidev",
    version,
    about = "List the devices of a UniFi site through the Integration API",
    long_about = "List the devices of a UniFi site through the Integration API.\n\n\
        Reads UNIFI_HOST, UNIFI_TOKEN and UNIFI_SITE_ID from the environment\n\
        or from the config file, then prints one line per device."
)]
pub struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short = 'o', default_value = "plain")]
    pub output: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One `ID: .., Name: .., Model: .., MAC: ..` line per device
    Plain,
    /// Pretty table
    Table,
    /// Pretty-printed JSON
    Json,
}
