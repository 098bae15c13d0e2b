pub mod annotation_record;
pub mod assay_record;

pub use annotation_record::{
    AnnotationRecord, AnnotationRow, SentinelRow, NOT_APPLICABLE_DESCRIPTOR, NO_TERMS_SUGGESTED,
};
pub use assay_record::{build_description_query, fetch_assay_descriptions, AssayRecord};
