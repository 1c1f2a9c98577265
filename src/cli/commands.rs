//! Command dispatch: wires parsed arguments to application services

use std::cell::RefCell;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{CountdownService, JournalService, Scene, SceneService};
use crate::cli::args::{Cli, Commands, ConfigCommands, DecoratorArg, ShapeCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings, TimerSettings};
use crate::domain::{DecoratorKind, Point, Severity};

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Shapes { command }) => execute_shapes(command, &load_settings(cli)?),
        Some(Commands::Timer { ticks, interval_ms }) => {
            cmd_timer(&load_settings(cli)?.timer, *ticks, *interval_ms)
        }
        Some(Commands::Log {
            message,
            error,
            decorators,
            plain,
        }) => cmd_log(&load_settings(cli)?, message, *error, decorators, *plain),
        Some(Commands::Config { command }) => execute_config(command, cli),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Err(CliError::InvalidArgs(
            "no command given, see --help".to_string(),
        )),
    }
}

/// Settings are loaded per command so `completion` and `config path` keep
/// working with a broken config file.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let settings = Settings::load(cli.config.as_deref())?;
    debug!("settings: {:?}", settings);
    Ok(settings)
}

fn load_scene(scene: Option<&Path>, settings: &Settings) -> CliResult<Scene> {
    let path: Option<PathBuf> = scene
        .map(Path::to_path_buf)
        .or_else(|| settings.shapes.scene.clone());
    Ok(SceneService::new().load_or_demo(path.as_deref())?)
}

fn execute_shapes(cmd: &ShapeCommands, settings: &Settings) -> CliResult<()> {
    match cmd {
        ShapeCommands::Describe { scene } => {
            let scene = load_scene(scene.as_deref(), settings)?;
            let text = scene.describe();
            if text.is_empty() {
                output::warning("scene contains no shapes");
            } else {
                output::info(&text);
            }
            Ok(())
        }
        ShapeCommands::Contains { x, y, scene } => {
            if !x.is_finite() || !y.is_finite() {
                return Err(CliError::InvalidArgs(format!(
                    "point must be finite, got ({}, {})",
                    x, y
                )));
            }
            let scene = load_scene(scene.as_deref(), settings)?;
            let inside = scene.contains(Point::new(*x, *y));
            debug!("contains({}, {}) = {}", x, y, inside);
            output::info(&inside);
            Ok(())
        }
        ShapeCommands::Tree { scene } => {
            let scene = load_scene(scene.as_deref(), settings)?;
            output::info(&scene.render());
            Ok(())
        }
    }
}

#[instrument(skip(settings))]
fn cmd_timer(
    settings: &TimerSettings,
    ticks: Option<u64>,
    interval_ms: Option<u64>,
) -> CliResult<()> {
    let effective = TimerSettings {
        ticks: ticks.unwrap_or(settings.ticks),
        interval_ms: interval_ms.unwrap_or(settings.interval_ms),
    };
    let service = CountdownService::from_settings(&effective);
    let emitted = service.run(Rc::new(RefCell::new(io::stdout())))?;
    debug!("timer emitted {} ticks", emitted);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_log(
    settings: &Settings,
    message: &str,
    error: bool,
    decorators: &[DecoratorArg],
    plain: bool,
) -> CliResult<()> {
    let kinds: Vec<DecoratorKind> = if plain {
        Vec::new()
    } else if decorators.is_empty() {
        settings.logger.decorators.clone()
    } else {
        decorators.iter().map(|&d| d.into()).collect()
    };
    let severity = if error {
        Severity::Error
    } else {
        Severity::Warning
    };
    let mut journal = JournalService::new(io::stdout(), &kinds);
    journal.write(severity, message)?;
    Ok(())
}

fn execute_config(cmd: &ConfigCommands, cli: &Cli) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::header("# effective settings");
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => {
                output::info(&path.display());
                Ok(())
            }
            None => Err(CliError::InvalidArgs(
                "no home directory, cannot locate config".to_string(),
            )),
        },
    }
}
