//! Command-line interface definitions for `nft-metadata`.

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

use crate::config::ListingOrder;

/// Parsed CLI arguments for `nft-metadata`.
#[derive(Debug, Parser)]
#[command(name = "nft-metadata")]
#[command(about = "Generate NFT metadata JSON for a directory of images and stamp image URIs")]
#[command(version)]
pub struct Cli {
    /// Overrides shared by every subcommand.
    #[command(flatten)]
    pub globals: GlobalArgs,
    /// Pass to execute; both passes run when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// Returns the selected command, defaulting to [`Command::Run`].
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}

/// Passes selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Write one `<index>.json` document per source image.
    Generate,
    /// Rewrite the `image` field of every `.json` document in place.
    Update,
    /// Generate, then update.
    Run,
}

/// CLI overrides layered above the configuration file and environment.
#[derive(Debug, Default, Clone, PartialEq, Eq, Args)]
pub struct GlobalArgs {
    /// Configuration file to load instead of `nft-metadata.toml`.
    #[arg(long, value_name = "path", global = true)]
    pub config: Option<Utf8PathBuf>,
    /// Directory holding the source images.
    #[arg(long, value_name = "path", global = true)]
    pub images_dir: Option<Utf8PathBuf>,
    /// Directory receiving the metadata documents.
    #[arg(long, value_name = "path", global = true)]
    pub jsons_dir: Option<Utf8PathBuf>,
    /// Prefix for every stamped image URI.
    #[arg(long, value_name = "uri", global = true)]
    pub base_uri: Option<String>,
    /// Extension appended to each record name when stamping the image URI.
    #[arg(long, value_name = "ext", global = true)]
    pub image_extension: Option<String>,
    /// Order in which directory entries are processed.
    #[arg(long, value_enum, global = true)]
    pub listing_order: Option<ListingOrder>,
    /// Skip source entries that are not regular files.
    #[arg(long = "skip-non-files", global = true)]
    pub should_skip_non_files: bool,
    /// Log failing entries and carry on instead of stopping at the first error.
    #[arg(long = "keep-going", global = true)]
    pub should_keep_going: bool,
}
