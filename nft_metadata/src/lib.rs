//! Library interface for `nft-metadata`.
//!
//! Scans a directory of images, writes one NFT metadata JSON document per
//! entry, then stamps each document's `image` field with a URI built from a
//! base URI and the document's own `name`.
//!
//! The two passes are [`generator::generate_metadata`] and
//! [`updater::update_image_uris`]. Both take a resolved
//! [`config::RunConfig`] and a progress sink, so callers can drive them
//! without touching process-wide state.

pub mod cli;
pub mod config;
pub mod error;
pub mod fs_helpers;
pub mod generator;
pub mod logging;
pub mod record;
pub mod report;
pub mod updater;

pub use config::{FailurePolicy, ListingOrder, RunConfig, load_config};
pub use error::NftMetadataError;
pub use generator::generate_metadata;
pub use record::MetadataRecord;
pub use report::{Pass, PassReport};
pub use updater::update_image_uris;
