//! Wire format decoding for module configuration streams.
//!
//! # Module Structure
//!
//! ```text
//! wire/
//! ├── error      # DecodeError
//! ├── null       # NullString (nullable wire values)
//! └── mod.rs     # Codec, ConfigData, ConfigParam (this file)
//! ```
//!
//! The input is a single self-describing CBOR envelope: a map holding the
//! list of module names present and the flat, ordered list of parameter
//! records across those modules.

mod error;
mod null;

pub use error::DecodeError;
pub use null::NullString;

use std::io::Read;

use serde::Deserialize;

// ============================================================================
// Codec
// ============================================================================

/// Reusable decoder settings: constructed once at process start and passed
/// by reference into each decode call.
///
/// Holds no mutable state; one instance may serve concurrent decode calls
/// on independent streams.
#[derive(Debug, Clone)]
pub struct Codec {
    /// Maximum nesting depth accepted before decoding is aborted.
    recursion_limit: usize,
}

impl Default for Codec {
    fn default() -> Self {
        Self {
            recursion_limit: 128,
        }
    }
}

impl Codec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Codec with a non-default bound on nesting depth.
    pub fn with_recursion_limit(limit: usize) -> Self {
        Self {
            recursion_limit: limit,
        }
    }

    /// Decode one configuration envelope from `reader`.
    ///
    /// Truncated or malformed input fails the batch as a whole; no partial
    /// [`ConfigData`] is ever returned.
    pub fn decode<R: Read>(&self, reader: R) -> Result<ConfigData, DecodeError> {
        ciborium::de::from_reader_with_recursion_limit(reader, self.recursion_limit)
            .map_err(DecodeError::from)
    }
}

// ============================================================================
// Decoded records
// ============================================================================

/// One decode batch: the module names present and the ordered parameter
/// records across possibly multiple modules.
///
/// Constructed once per [`Codec::decode`] call and immutable afterward.
/// The caller splits it by module before handing parameter lists to the
/// writer.
#[derive(Debug, Deserialize)]
pub struct ConfigData {
    /// Module names present in this batch.
    pub modules: Vec<String>,
    /// Parameter records in wire order.
    pub nodes: Vec<ConfigParam>,
}

impl ConfigData {
    /// Records belonging to one module, in wire order.
    pub fn params_for<'a>(&'a self, module: &'a str) -> impl Iterator<Item = &'a ConfigParam> {
        self.nodes.iter().filter(move |p| p.name == module)
    }
}

/// A single configuration entry decoded from the wire.
///
/// `id` is unique within a batch; uniqueness is an upstream guarantee and
/// is not re-checked here.
#[derive(Debug, Deserialize)]
pub struct ConfigParam {
    #[serde(rename = "ID")]
    pub id: i64,
    /// Content-type tag for the value (drives e.g. the JSON-tag decision
    /// downstream).
    #[serde(rename = "ContentType")]
    pub content_type: String,
    /// The value itself; explicitly nullable on the wire.
    #[serde(rename = "Value")]
    pub value: NullString,
    #[serde(rename = "Version")]
    pub version: i64,
    /// Hierarchical key, slash-delimited.
    #[serde(rename = "Path")]
    pub path: String,
    /// Owning module name.
    #[serde(rename = "Name")]
    pub name: String,
    /// Last-modified marker as delivered by the producer.
    #[serde(rename = "MTime")]
    pub mtime: String,
}
