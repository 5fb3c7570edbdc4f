//! Run configuration and its layered loading.
//!
//! Layers are merged lowest precedence first: built-in defaults, the TOML
//! configuration file, `NFT_METADATA_*` environment variables, then CLI
//! flags.

use camino::{Utf8Path, Utf8PathBuf};
use clap::ValueEnum;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Deserializer, Serialize};

use crate::cli::GlobalArgs;
use crate::error::{NftMetadataError, Result};
use crate::fs_helpers::read_optional_file;

/// Prefix shared by every configuration environment variable.
pub const ENV_PREFIX: &str = "NFT_METADATA_";

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV: &str = "NFT_METADATA_CONFIG_PATH";

/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "nft-metadata.toml";

/// Order in which directory entries are visited.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ListingOrder {
    /// Byte-wise lexicographic order of entry names.
    #[default]
    Sorted,
    /// Whatever order the filesystem returns.
    Native,
}

/// What a pass does when a single entry fails.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Abort the run on the first error.
    #[default]
    FailFast,
    /// Log the error, record it, and continue with the next entry.
    KeepGoing,
}

/// Fully resolved settings for both passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Directory holding the source images.
    #[serde(deserialize_with = "scalar_text")]
    pub images_dir: Utf8PathBuf,
    /// Directory receiving the metadata documents.
    #[serde(deserialize_with = "scalar_text")]
    pub jsons_dir: Utf8PathBuf,
    /// Prefix for every stamped image URI.
    #[serde(deserialize_with = "scalar_text")]
    pub base_uri: String,
    /// Extension appended to the record name in the image URI.
    #[serde(deserialize_with = "scalar_text")]
    pub image_extension: String,
    /// Order in which directory entries are processed.
    pub listing_order: ListingOrder,
    /// Exclude source entries that are not regular files.
    pub skip_non_files: bool,
    /// Per-entry error handling.
    pub failure_policy: FailurePolicy,
}

/// A scalar as figment may hand it over; environment values that look like
/// numbers or booleans arrive typed.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Flag(bool),
}

impl From<Scalar> for String {
    fn from(scalar: Scalar) -> Self {
        match scalar {
            Scalar::Text(text) => text,
            Scalar::Unsigned(number) => number.to_string(),
            Scalar::Signed(number) => number.to_string(),
            Scalar::Float(number) => number.to_string(),
            Scalar::Flag(flag) => flag.to_string(),
        }
    }
}

/// Deserialises a textual setting from any scalar, so
/// `NFT_METADATA_JSONS_DIR=2024` names the directory `2024`.
fn scalar_text<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Scalar::deserialize(deserializer).map(|scalar| T::from(String::from(scalar)))
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            images_dir: Utf8PathBuf::from("images"),
            jsons_dir: Utf8PathBuf::from("jsons"),
            base_uri: String::from("ipfs://"),
            image_extension: String::from("png"),
            listing_order: ListingOrder::default(),
            skip_non_files: false,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// CLI layer; unset flags serialise to nothing so lower layers show through.
#[derive(Debug, Serialize)]
struct CliLayer<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    images_dir: Option<&'a Utf8Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jsons_dir: Option<&'a Utf8Path>,
    #[serde(skip_serializing_if = "Option::is_none")]
    base_uri: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_extension: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    listing_order: Option<ListingOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    skip_non_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_policy: Option<FailurePolicy>,
}

impl<'a> CliLayer<'a> {
    fn from_args(args: &'a GlobalArgs) -> Self {
        Self {
            images_dir: args.images_dir.as_deref(),
            jsons_dir: args.jsons_dir.as_deref(),
            base_uri: args.base_uri.as_deref(),
            image_extension: args.image_extension.as_deref(),
            listing_order: args.listing_order,
            skip_non_files: args.should_skip_non_files.then_some(true),
            failure_policy: args
                .should_keep_going
                .then_some(FailurePolicy::KeepGoing),
        }
    }
}

/// Where the configuration file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ConfigSource {
    /// Named by `--config` or the environment; it must exist.
    Explicit(Utf8PathBuf),
    /// The default file; skipped when absent.
    Default(Utf8PathBuf),
}

fn config_source(args: &GlobalArgs) -> ConfigSource {
    if let Some(path) = &args.config {
        return ConfigSource::Explicit(path.clone());
    }
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => ConfigSource::Explicit(Utf8PathBuf::from(path)),
        _ => ConfigSource::Default(Utf8PathBuf::from(DEFAULT_CONFIG_FILE)),
    }
}

fn read_config_file(source: &ConfigSource) -> Result<Option<String>> {
    match source {
        ConfigSource::Explicit(path) => read_optional_file(path)?
            .map(Some)
            .ok_or_else(|| NftMetadataError::MissingConfigFile(path.clone())),
        ConfigSource::Default(path) => read_optional_file(path),
    }
}

/// Merges defaults, the configuration file, environment and CLI overrides.
///
/// # Errors
///
/// Returns [`NftMetadataError::MissingConfigFile`] when an explicitly named
/// file is absent, [`NftMetadataError::Io`] when it cannot be read, and
/// [`NftMetadataError::Configuration`] when the merged layers do not
/// deserialise into a [`RunConfig`].
pub fn load_config(args: &GlobalArgs) -> Result<RunConfig> {
    let source = config_source(args);
    let mut figment = Figment::from(Serialized::defaults(RunConfig::default()));
    if let Some(contents) = read_config_file(&source)? {
        tracing::debug!(source = ?source, "merging configuration file");
        figment = figment.merge(Toml::string(&contents));
    }
    figment
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config_path", "log"]))
        .merge(Serialized::defaults(CliLayer::from_args(args)))
        .extract()
        .map_err(|err| NftMetadataError::Configuration(Box::new(err)))
}
