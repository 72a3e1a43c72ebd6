use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// iFL03 bridge client: drive the overlay backend from the command line.
#[derive(Parser, Debug)]
#[command(name = "ifl03", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Backend host executable; overrides `bridge.host_command`.
    #[arg(long)]
    pub host: Option<String>,

    /// Extra arguments for the host executable.
    #[arg(long = "host-arg", allow_hyphen_values = true)]
    pub host_args: Vec<String>,

    #[command(subcommand)]
    pub command: Option<Action>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Action {
    /// Print the current backend state (default).
    State {
        /// Print the host-side push script for the state instead.
        #[arg(long)]
        script: bool,
    },
    /// Enable, disable or toggle an overlay by config key (e.g. OverlayDDU).
    Overlay {
        key: String,
        /// `true`/`false`; omit to toggle.
        #[arg(action = clap::ArgAction::Set)]
        on: Option<bool>,
    },
    /// Turn overlay edit mode on or off.
    UiEdit {
        #[arg(action = clap::ArgAction::Set)]
        on: bool,
    },
    /// Turn preview mode on or off.
    Preview {
        #[arg(action = clap::ArgAction::Set)]
        on: bool,
    },
    /// Set one config value.
    Set {
        component: String,
        key: String,
        value: String,
        #[arg(long, value_enum, default_value_t = ValueKind::String)]
        kind: ValueKind,
    },
    /// Move an overlay by whole nudge steps.
    Nudge {
        /// Overlay slug (e.g. standings, ddu, track).
        overlay: String,
        #[arg(allow_negative_numbers = true)]
        dx: i32,
        #[arg(allow_negative_numbers = true)]
        dy: i32,
    },
    /// Center an overlay on screen.
    Center { overlay: String },
    /// Persist the current settings.
    Save,
    /// Revert every setting to its default.
    Reset {
        /// Confirm the reset.
        #[arg(long)]
        yes: bool,
    },
    /// Check GitHub for a newer release.
    CheckUpdate,
    /// Print the release notes for the installed version.
    ReleaseNotes,
    /// Print state changes pushed by the host until it exits.
    Watch,
    /// Print the effective client config as JSON.
    Config,
}

/// Value type for `set`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    /// Comma-separated string list.
    List,
}

pub fn parse() -> Args {
    Args::parse()
}
