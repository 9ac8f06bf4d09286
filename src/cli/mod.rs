//! CLI argument parsing types.
//!
//! This module provides the command-line interface structure for the tfcvars binary.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::client::DEFAULT_ADDRESS;

/// Terraform Cloud workspace variables command-line interface.
#[derive(Parser, Debug)]
#[command(
    name = "tfcvars",
    about = "Read and load Terraform Cloud workspace variables",
    version
)]
pub struct Cli {
    /// Bearer token. Falls back to TF_TOKEN, then ~/.terraform.d/credentials.tfrc.json.
    #[arg(long, global = true, env = "TF_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Terraform Cloud / Enterprise address.
    #[arg(long, global = true, env = "TFE_ADDRESS", default_value = DEFAULT_ADDRESS)]
    pub address: String,

    /// Log debug output to stderr.
    #[arg(short, long, global = true, default_value = "false")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a workspace's variables.
    Read {
        /// Workspace ID to read from.
        #[arg(long, visible_alias = "ws")]
        workspace: Option<String>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Print JSON on a single line.
        #[arg(long, default_value = "false")]
        compact: bool,

        /// Declare a variable's type for tfvars output, as KEY=string|number|bool|list|map.
        #[arg(long = "type", value_name = "KEY=KIND")]
        types: Vec<String>,
    },

    /// Create variables in a workspace from a JSON:API document.
    Load {
        /// Workspace ID to create the variables in.
        #[arg(long, visible_alias = "ws")]
        workspace: Option<String>,

        /// Document to load. Reads stdin when omitted.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

impl Command {
    pub fn workspace(&self) -> Option<&str> {
        match self {
            Self::Read { workspace, .. } | Self::Load { workspace, .. } => workspace
                .as_deref()
                .filter(|w| !w.trim().is_empty()),
        }
    }
}

/// Output formats for `read`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// The JSON:API document as returned by the API.
    Json,
    /// A flat key → value object usable as a `.tfvars.json` file.
    Tfvars,
    /// A human-readable table.
    Table,
}
