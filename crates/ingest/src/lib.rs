#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use serde_json::Value;

pub mod compact;
pub use compact::{decode, encode, CompactDocument, StringTable};

mod migrate;
pub use migrate::migrate;

/// Errors produced while ingesting a document.
///
/// Malformed *per-entity* data (missing arrays, absent fields) is not an
/// error: it is repaired locally with empty collections so that a partial
/// dump still loads. These variants are the only hard failures.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The document is not a JSON object. The only hard failure of the
    /// ingestion path for well-versioned input.
    #[error("document is not a JSON object")]
    NotAnObject,
    /// The declared `version` is not one we know how to normalize. Unknown
    /// versions fail closed rather than passing through mis-shapen.
    #[error("unsupported ion.json schema version {0}")]
    UnsupportedVersion(u64),
    /// The declared `version` is not a non-negative integer.
    #[error("schema version is not an integer: {0}")]
    MalformedVersion(Value),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
