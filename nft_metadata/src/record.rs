//! The metadata record written for every source image.

use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

/// Trait type carried by the single attribute on every record.
pub const TRAIT_TYPE: &str = "Architectural Style";

/// Value carried by the single attribute on every record.
pub const TRAIT_VALUE: &str = "style";

/// Indentation used for every serialised document.
const INDENT: &[u8] = b"    ";

/// One NFT-style asset description.
///
/// Field order matches the serialised document: `name`, `description`,
/// `image`, `attributes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Source filename with its extension stripped.
    pub name: String,
    /// Human-readable blurb mentioning `name`.
    pub description: String,
    /// Image URI; empty until the update pass stamps it.
    pub image: String,
    /// Trait list.
    pub attributes: Vec<Attribute>,
}

/// A `trait_type`/`value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Trait category.
    pub trait_type: String,
    /// Trait value.
    pub value: String,
}

impl MetadataRecord {
    /// Builds a fresh record for the directory entry called `file_name`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use nft_metadata::record::MetadataRecord;
    ///
    /// let record = MetadataRecord::for_file("loft.jpg");
    /// assert_eq!(record.name, "loft");
    /// assert!(record.image.is_empty());
    /// assert!(record.description.contains("'loft'"));
    /// ```
    #[must_use]
    pub fn for_file(file_name: &str) -> Self {
        let name = strip_extension(file_name).to_owned();
        Self {
            description: describe(&name),
            name,
            image: String::new(),
            attributes: vec![Attribute {
                trait_type: TRAIT_TYPE.to_owned(),
                value: TRAIT_VALUE.to_owned(),
            }],
        }
    }
}

/// Renders the fixed description template around `name`.
#[must_use]
pub fn describe(name: &str) -> String {
    format!(
        "Introducing a captivating NFT from the world of style: '{name}'. \
         Immerse yourself in the artistic realm of style with this extraordinary creation."
    )
}

/// Removes the final extension from `file_name`.
///
/// Only the last `.suffix` is removed, and dots that lead the name never start
/// an extension, so `.hidden` and `..` come back unchanged.
///
/// ```rust
/// use nft_metadata::record::strip_extension;
///
/// assert_eq!(strip_extension("archive.tar.gz"), "archive.tar");
/// assert_eq!(strip_extension(".hidden"), ".hidden");
/// ```
#[must_use]
pub fn strip_extension(file_name: &str) -> &str {
    let Some(dot) = file_name.rfind('.') else {
        return file_name;
    };
    let (stem, _extension) = file_name.split_at(dot);
    if stem.chars().all(|ch| ch == '.') {
        file_name
    } else {
        stem
    }
}

/// Builds the image URI for a record: `<base_uri>/<name>.<extension>`.
///
/// The base URI is used verbatim, with no normalisation of slashes.
///
/// ```rust
/// use nft_metadata::record::image_uri;
///
/// assert_eq!(image_uri("ipfs://abc", "loft", "png"), "ipfs://abc/loft.png");
/// assert_eq!(image_uri("ipfs://", "loft", "png"), "ipfs:///loft.png");
/// ```
#[must_use]
pub fn image_uri(base_uri: &str, name: &str, extension: &str) -> String {
    format!("{base_uri}/{name}.{extension}")
}

/// Serialises `value` as JSON indented by four spaces.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] when `value` cannot be represented as JSON.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(buffer)
}
