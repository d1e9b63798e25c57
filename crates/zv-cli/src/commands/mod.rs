//! Command implementations.

mod cache;
mod install;
mod list;
mod spawn;
mod uninstall;
mod update;
mod use_cmd;

use crate::cli::{CacheCommands, Cli, Commands};
use anyhow::Result;
use zv_core::{EnvVars, ExitCode};
use zv_toolchain::{IndexClient, ZvRoot};
use zv_ui::Output;

/// Build the index client, honoring the URL override.
pub(crate) fn index_client() -> IndexClient {
    match std::env::var(EnvVars::ZV_INDEX_URL) {
        Ok(url) => IndexClient::new().with_url(url),
        Err(_) => IndexClient::new(),
    }
}

/// Report a failed operation and map it to an exit code.
pub(crate) fn fail(error: &zv_core::Error, output: &Output) -> i32 {
    output.print_error(error);
    ExitCode::from(error).into()
}

/// Run the CLI command.
pub async fn run(cli: Cli) -> Result<i32> {
    let output = Output::from_flags(cli.global.quiet, cli.global.verbose);

    let root = match cli.global.root {
        Some(dir) => ZvRoot::at(dir),
        None => match ZvRoot::from_env() {
            Ok(root) => root,
            Err(e) => return Ok(fail(&e, &output)),
        },
    };

    match cli.command {
        Some(Commands::List { online }) => list::run(&root, online, &output).await,
        Some(Commands::Install {
            version,
            activate,
            force,
        }) => install::run(&root, &version, activate, force, &output).await,
        Some(Commands::Use { version }) => use_cmd::run(&root, &version, &output),
        Some(Commands::Uninstall { version }) => uninstall::run(&root, &version, &output),
        Some(Commands::Update { channel }) => update::run(&root, &channel, &output).await,
        Some(Commands::Cache { command }) => match command {
            CacheCommands::Clear => cache::clear(&root, &output),
            CacheCommands::Status => cache::status(&root, &output),
        },
        Some(Commands::Spawn { version, args }) => spawn::run(&root, &version, &args, &output),
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            Ok(0)
        }
    }
}
