use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fgc_store::{Color, RANDOM_COLOR_COUNT};
use uuid::Uuid;

/// Manage Fluid Gradient Composer presets.
#[derive(Debug, Parser)]
#[command(name = "fgc", version, about)]
pub(crate) struct Cli {
    /// Config document to operate on.
    #[arg(long, env = "FGC_CONFIG", global = true)]
    pub(crate) config: Option<PathBuf>,

    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List presets, pinned first.
    List,
    /// Create a preset with random colors.
    Create { name: String },
    /// Delete a preset by id.
    Delete { id: Uuid },
    /// Delete the presets at the given positions, all or nothing.
    DeleteAt {
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Move the presets at the given positions before `--to`.
    Move {
        #[arg(long)]
        to: usize,
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    Pin { id: Uuid },
    Unpin { id: Uuid },
    Lock { id: Uuid },
    Unlock { id: Uuid },
    /// Edit an unlocked preset.
    Edit {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        speed: Option<f64>,
        /// Comma separated built-in names or hex values.
        #[arg(long, value_delimiter = ',')]
        colors: Option<Vec<Color>>,
        #[arg(long, value_delimiter = ',')]
        highlights: Option<Vec<Color>>,
    },
    /// Draw new random colors and highlights.
    Randomize {
        id: Uuid,
        #[arg(long, default_value_t = RANDOM_COLOR_COUNT)]
        count: usize,
    },
    /// Import one or more exported preset files.
    Import {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Export a preset to `<dir>/<name>.fgcpreset`.
    Export {
        id: Uuid,
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
    /// Write the whole configuration to a file, or stdout.
    ExportConfig {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Replace every preset with the contents of a config file.
    Apply {
        file: PathBuf,
        /// Confirm overwriting the current configuration.
        #[arg(long)]
        yes: bool,
    },
}
