//! Delimited file output
//!
//! Writes one comma-separated file per export run, named after the range it
//! covers.

pub mod writer;

pub use writer::{derive_file_name, format_fields, DelimitedFileWriter, HEADER};
