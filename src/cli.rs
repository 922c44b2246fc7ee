use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::format::ColorFormat;

/// Pick, convert and organize colors from the terminal.
#[derive(Parser, Debug)]
#[command(name = "colorsmith", version, about)]
pub struct Args {
    /// Directory holding palettes, recent colors and settings
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Extract dominant colors from an image
    Extract {
        /// Path to the input image
        image: PathBuf,

        /// Number of K-means clusters
        #[arg(short = 'k', long = "colors", default_value_t = 5)]
        colors: usize,

        /// Output notation (defaults to the saved preference)
        #[arg(short, long, value_enum)]
        format: Option<ColorFormat>,

        /// Save the colors as a new palette with this name
        #[arg(long)]
        save_as: Option<String>,

        /// Print a colored swatch next to each color
        #[arg(long)]
        preview: bool,
    },

    /// Convert a color between notations
    Convert {
        /// Color in any supported notation
        color: String,

        /// Target notation (defaults to the saved preference)
        #[arg(short, long, value_enum, conflicts_with = "all")]
        to: Option<ColorFormat>,

        /// Print every notation
        #[arg(long)]
        all: bool,

        /// Remember the target notation as the default
        #[arg(long, requires = "to")]
        remember: bool,
    },

    /// Report the WCAG contrast between two colors
    Contrast {
        /// Text color
        foreground: String,

        /// Background color
        background: String,

        /// Suggest a text color that reaches this ratio
        #[arg(long)]
        fix: Option<f32>,
    },

    /// Show or update recently picked colors
    Recent {
        #[command(subcommand)]
        action: Option<RecentAction>,
    },

    /// Manage palettes
    Palette {
        #[command(subcommand)]
        action: PaletteAction,
    },

    /// Build a gradient and print it as CSS or SVG
    Gradient(GradientArgs),

    /// Print a random color
    Random {
        /// Output notation (defaults to the saved preference)
        #[arg(short, long, value_enum)]
        format: Option<ColorFormat>,
    },
}

#[derive(Subcommand, Debug)]
pub enum RecentAction {
    /// Record a picked color
    Add { color: String },
}

/// Palettes are addressed by id or, failing that, by name.
#[derive(Subcommand, Debug)]
pub enum PaletteAction {
    /// List every palette
    List,
    /// Show the colors of a palette (the current one by default)
    Show { palette: Option<String> },
    /// Create an empty palette
    Create { name: String },
    /// Delete a user palette
    Delete { palette: String },
    /// Rename a palette
    Rename { palette: String, name: String },
    /// Append a color to a palette
    Add {
        palette: String,
        color: String,
        /// Display name for the color
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Remove the color at a zero-based index
    Remove { palette: String, index: usize },
    /// Make a palette current
    Use { palette: String },
}

#[derive(ClapArgs, Debug)]
pub struct GradientArgs {
    /// Radial instead of linear
    #[arg(long)]
    pub radial: bool,

    /// Linear rotation in degrees
    #[arg(long, default_value_t = 45)]
    pub rotation: u32,

    /// Color stop as COLOR@POSITION, position in 0..=1 (repeatable)
    #[arg(long = "stop", value_name = "COLOR@POS")]
    pub stops: Vec<String>,

    /// Emit an SVG document instead of CSS
    #[arg(long)]
    pub svg: bool,

    /// Random stops and rotation
    #[arg(long, conflicts_with = "stops")]
    pub random: bool,
}
