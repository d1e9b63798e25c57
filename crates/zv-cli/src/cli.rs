//! CLI argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use zv_core::EnvVars;

use crate::styles::STYLES;

/// zv - Zig toolchain version manager
#[derive(Parser, Debug)]
#[command(name = "zv")]
#[command(author, version, about = "A fast Zig toolchain version manager")]
#[command(long_about = None)]
#[command(propagate_version = true)]
#[command(styles = STYLES)]
#[command(after_help = "Use `zv help <command>` for more information about a command.")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global arguments available to all commands.
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true, env = EnvVars::ZV_VERBOSE)]
    pub verbose: bool,

    /// Suppress status output
    #[arg(short, long, global = true, env = EnvVars::ZV_QUIET)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = EnvVars::ZV_NO_COLOR)]
    pub no_color: bool,

    /// Override the zv root directory (default: ~/.zv)
    #[arg(long, global = true, env = EnvVars::ZV_ROOT, value_name = "DIR")]
    pub root: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List installed versions
    List {
        /// List releases available for download instead
        #[arg(long)]
        online: bool,
    },

    /// Download and install a release
    #[command(disable_version_flag = true)]
    Install {
        /// A release key from the index, or the stable/master channel
        #[arg(default_value = "stable")]
        version: String,

        /// Activate the version after installing
        #[arg(long = "use")]
        activate: bool,

        /// Reinstall even if the version is already installed
        #[arg(long)]
        force: bool,
    },

    /// Switch the active version
    #[command(disable_version_flag = true)]
    Use {
        /// An installed version
        version: String,
    },

    /// Remove an installed version
    #[command(disable_version_flag = true)]
    Uninstall {
        /// An installed version
        version: String,
    },

    /// Update an installed channel to its latest release
    Update {
        /// Channel to update (stable or master)
        #[arg(default_value = "stable")]
        channel: String,
    },

    /// Manage the download cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },

    /// Run a pinned version of zig
    #[command(disable_version_flag = true)]
    Spawn {
        /// An installed version
        version: String,

        /// Arguments passed through to zig
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CacheCommands {
    /// Remove all cached downloads
    Clear,
    /// Show cache statistics
    Status,
}
