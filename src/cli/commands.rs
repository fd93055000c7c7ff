use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use tracing::{debug, instrument};

use crate::arena::Tree;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, local_config_path, Settings, LOCAL_CONFIG_FILE};
use crate::exitcode;

/// Run the selected command and return the process exit code.
pub fn execute_command(cli: &Cli) -> CliResult<i32> {
    match &cli.command {
        Some(Commands::Show) => _show(cli),
        Some(Commands::Search { from }) => _search(cli, *from),
        Some(Commands::Check) => _check(cli),
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Completion { shell }) => _completion(*shell),
        None => Ok(exitcode::OK),
    }
}

/// Layered settings plus command line overrides.
#[instrument(level = "debug", skip(cli))]
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let local = cli.config.clone().or_else(local_config_path);
    let mut settings = Settings::load(local.as_deref())?;
    if let Some(max_degree) = cli.max_degree {
        settings.max_degree = max_degree;
    }
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn build_tree(cli: &Cli) -> CliResult<(Settings, Tree)> {
    let settings = load_settings(cli)?;
    let tree = settings.build_tree()?;
    Ok((settings, tree))
}

#[instrument(skip(cli))]
fn _show(cli: &Cli) -> CliResult<i32> {
    let (_, tree) = build_tree(cli)?;
    output::info(tree.render().trim_end());
    Ok(exitcode::OK)
}

#[instrument(skip(cli))]
fn _search(cli: &Cli, from: Option<i64>) -> CliResult<i32> {
    let (settings, tree) = build_tree(cli)?;
    let start = match from.or(settings.start_key) {
        Some(key) => tree.find(key).ok_or(CliError::UnknownKey(key))?,
        None => tree.root(),
    };

    let result = tree.nearest_eligible(start)?;
    output::info(tree.render().trim_end());
    output::header("Closest vertex with spare capacity:");
    output::info(&result.summary(&tree));
    if result.is_found() {
        output::info(&format!("Path: {}", result.path_string(&tree)));
    }
    Ok(exitcode::OK)
}

#[instrument(skip(cli))]
fn _check(cli: &Cli) -> CliResult<i32> {
    let (settings, tree) = build_tree(cli)?;

    let code = match tree.check_capacity() {
        Some(idx) => {
            let node = &tree[idx];
            output::failure(&format!(
                "node {} holds {} children, more than its bound",
                node.key,
                node.children().len()
            ));
            exitcode::DATAERR
        }
        None => {
            output::success(&format!("degree bound holds (max_degree = {})", settings.max_degree));
            exitcode::OK
        }
    };

    output::header("Eligible nodes:");
    for (idx, node) in tree.iter().filter(|(idx, _)| tree.is_eligible(*idx)) {
        output::detail(&format!(
            "{} ({} of {} children)",
            node.key,
            node.children().len(),
            tree.child_limit(idx)
        ));
    }
    Ok(code)
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<i32> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(settings.to_toml()?.trim_end());
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::info(&format!("global: {}", path.display())),
                None => output::info("global: <unavailable>"),
            }
            match cli.config.as_ref() {
                Some(path) => output::info(&format!("local:  {}", path.display())),
                None => output::info(&format!("local:  ./{}", LOCAL_CONFIG_FILE)),
            }
        }
        ConfigCommands::Template => output::info(Settings::template().trim_end()),
    }
    Ok(exitcode::OK)
}

fn _completion(shell: Shell) -> CliResult<i32> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(exitcode::OK)
}
