//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// okrd - OKR decomposition and deadline reminder daemon
#[derive(Parser)]
#[command(
    name = "okrd",
    about = "Parses OKRs into structured objectives, decomposes them into micro-tasks, and schedules deadline reminders",
    version,
    after_help = "Logs are written to: ~/.local/share/okrd/logs/okrd.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Parse raw OKR text into a structured objective (JSON on stdout)
    Parse {
        /// OKR text; reads stdin when omitted
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },

    /// Parse an OKR and decompose it into micro-tasks (JSON on stdout)
    Decompose {
        /// OKR text; reads stdin when omitted
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },

    /// Run one reminder scheduling cycle over task and user files
    Remind {
        /// YAML file with the task list
        #[arg(short, long)]
        tasks: PathBuf,

        /// YAML file with the user contexts
        #[arg(short, long)]
        users: PathBuf,
    },
}
