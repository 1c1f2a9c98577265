//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::DecoratorKind;

/// Classic object-oriented patterns: composite shapes, observer timer, decorated logger
#[derive(Parser, Debug)]
#[command(name = "oopatterns")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Config file (default: XDG config dir)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query a composite shape tree
    Shapes {
        #[command(subcommand)]
        command: ShapeCommands,
    },

    /// Run the event timer until it has ticked N times
    Timer {
        /// Ticks before stopping (default from settings)
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Milliseconds between ticks (default from settings)
        #[arg(short, long)]
        interval_ms: Option<u64>,
    },

    /// Write a message through the decorated logger
    Log {
        /// Message text
        message: String,
        /// Log as error instead of warning
        #[arg(short, long)]
        error: bool,
        /// Decorators in application order (default from settings)
        #[arg(long = "decorator", value_enum)]
        decorators: Vec<DecoratorArg>,
        /// Do not apply any decorator
        #[arg(long, conflicts_with = "decorators")]
        plain: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShapeCommands {
    /// Print the description of every shape
    Describe {
        /// Scene file (default: settings, else demo scene)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },

    /// Check whether a point lies inside the scene
    Contains {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        /// Scene file (default: settings, else demo scene)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },

    /// Show the scene as a tree
    Tree {
        /// Scene file (default: settings, else demo scene)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        scene: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Print the global config file path
    Path,
}

/// Decorator names accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoratorArg {
    Emphasis,
    Timestamp,
}

impl From<DecoratorArg> for DecoratorKind {
    fn from(arg: DecoratorArg) -> Self {
        match arg {
            DecoratorArg::Emphasis => DecoratorKind::Emphasis,
            DecoratorArg::Timestamp => DecoratorKind::Timestamp,
        }
    }
}
