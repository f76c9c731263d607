//! Retrieval of the ISO 3166-1 source document.
//!
//! [`fetch_entries`] downloads and decodes the document, [`parse_entries`] turns its
//! text into [`RawEntry`](crate::models::RawEntry) values. Both return `Ok(None)` when the
//! document is well-formed but does not have the expected shape.

mod document;
mod source;

// Re-export public API
pub use document::parse_entries;
pub use source::fetch_entries;
