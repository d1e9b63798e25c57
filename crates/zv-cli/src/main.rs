//! zv - Zig toolchain version manager
//!
//! Installs, updates and switches between Zig releases from the official
//! release index.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod styles;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    zv_telemetry::init(cli.global.verbose);

    if cli.global.no_color || !zv_ui::style::colors_enabled() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let exit_code = commands::run(cli).await?;

    std::process::exit(exit_code);
}
