//! # Result Ingestion
//!
//! Reads the pipe-delimited files MTI writes for each job array member and
//! stores one row per suggested term, or a sentinel row when MTI suggested
//! nothing for an assay.

pub mod ingestor;
pub mod parser;
pub mod sink;

pub use ingestor::{ingest_outputs, IngestSummary};
pub use parser::{parse_output_line, ParsedLine, EMPTY_RESULT_MARKER};
pub use sink::{AnnotationSink, MemoryAnnotationSink};
