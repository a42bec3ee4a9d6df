//! Module configuration snapshots rendered as deterministic on-disk files.
//!
//! Two components, consumed in sequence by the surrounding process:
//!
//! - [`wire`] decodes a self-describing binary (CBOR) record stream into
//!   typed parameters grouped under a module-name list.
//! - [`writer`] renders one module's ordered parameters into the
//!   line-oriented `path[:JSON] value` format and replaces the target file
//!   only when the content really changed, ignoring comment and blank
//!   lines in the comparison.
//!
//! Fetching the byte stream, choosing which module goes to which file, and
//! mapping decoded records onto renderable parameters all belong to the
//! caller.
//!
//! # Example
//!
//! ```ignore
//! let codec = Codec::new();
//! let data = codec.decode(stream)?;
//!
//! let mut writer = ConfWriter::new(&target, "core", mtime);
//! writer.render(&params);
//! if writer.is_modified(&fs::read(&target).unwrap_or_default()) {
//!     writer.close()?;
//! }
//! ```

pub mod wire;
pub mod writer;

pub use wire::{Codec, ConfigData, ConfigParam, DecodeError, NullString};
pub use writer::{ConfWriter, ModuleParam, WriteError};
