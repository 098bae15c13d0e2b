//! # Input File Chunking
//!
//! Turns assay descriptions into the flat files the Medical Text Indexer batch
//! client reads: one `"<id>"|<description>` line per assay, a fixed number of
//! assays per file, a fixed number of files per numbered directory.

pub mod writer;

pub use writer::{
    correct_known_typos, directory_name, format_input_line, write_input_files, ChunkingSummary,
};
