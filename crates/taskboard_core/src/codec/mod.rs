//! Line codec for the persisted table files.
//!
//! # Responsibility
//! - Encode one record as always-quoted, comma-separated fields.
//! - Decode one line back into fields, honoring commas inside quotes.
//! - Split a stream into record lines without their terminators.
//!
//! # Invariants
//! - Encoding never escapes embedded quote characters; a field that contains
//!   `"` will not decode back to itself.

pub mod record;

pub use record::{decode_record, encode_record, read_record_lines, FIELD_DELIMITER, QUOTE};
