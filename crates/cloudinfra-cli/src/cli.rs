//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::commands::{export::ExportArgs, list::ListArgs, users::UsersArgs};

/// Credential manager and client for the Infinity Portal gateway.
#[derive(Parser, Debug)]
#[command(name = "cloudinfra")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print shell-exportable assignments for a profile
    Export(ExportArgs),

    /// List stored profile names
    List(ListArgs),

    /// Print the gateway's user list
    Users(UsersArgs),
}
