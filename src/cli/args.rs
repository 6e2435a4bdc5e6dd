//! Command-line interface definitions.

use crate::identicon::Color;
use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Deterministic identicon generator
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: hashicon.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default config file
    #[command(visible_alias = "i")]
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Render identicons to SVG files
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Print the colors, geometry and rectangles of one identicon as JSON
    #[command(visible_alias = "q")]
    Inspect {
        #[command(flatten)]
        args: InspectArgs,
    },

    /// Serve identicons over HTTP
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        style: StyleArgs,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Memoize rendered documents
        #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        cache: Option<bool>,
    },
}

/// Generator overrides shared by every rendering command.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct StyleArgs {
    /// Canvas side length in px
    #[arg(short, long)]
    pub size: Option<u32>,

    /// Grid cells per side
    #[arg(short = 'n', long)]
    pub pixels: Option<u32>,

    /// Margin as a fraction of the size
    #[arg(short, long)]
    pub margin: Option<f64>,

    /// Saturation of the hash color, in [0, 1]
    #[arg(long)]
    pub saturation: Option<f64>,

    /// Lightness of the hash color, in [0, 1]
    #[arg(long)]
    pub lightness: Option<f64>,

    /// Use the hash color as the page fill
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub inverted: Option<bool>,

    /// Fixed color, e.g. "#f0f0f0" or "rgba(240, 240, 240, 1.0)"
    #[arg(short, long)]
    pub background: Option<Color>,
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Hex hashes to render. A `-` reads more from stdin (one per line) in its place.
    #[arg(value_name = "HASH", required = true)]
    pub hashes: Vec<String>,

    /// Treat inputs as text and render the digest of each
    #[arg(short, long)]
    pub text: bool,

    /// Output directory (relative to current directory)
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Print documents to stdout instead of writing files
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,

    #[command(flatten)]
    pub style: StyleArgs,
}

/// Inspect command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct InspectArgs {
    /// Hex hash to inspect
    #[arg(value_name = "HASH")]
    pub hash: String,

    /// Treat the input as text and inspect its digest
    #[arg(short, long)]
    pub text: bool,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pub pretty: bool,

    /// Include unlit cells in the rectangle list
    #[arg(short, long)]
    pub all: bool,

    #[command(flatten)]
    pub style: StyleArgs,
}

#[allow(unused)]
impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
    pub const fn is_render(&self) -> bool {
        matches!(self.command, Commands::Render { .. })
    }
}
