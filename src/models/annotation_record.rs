use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Descriptor placeholder stored for assays without suggested terms
pub const NOT_APPLICABLE_DESCRIPTOR: &str = "not applicable";

/// Comment stored for assays without suggested terms
pub const NO_TERMS_SUGGESTED: &str = "no terms suggested";

/// AnnotationRecord is one MeSH term suggested for one assay
/// Maps to a row of the configured annotation table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationRecord {
    pub assay_id: i64,
    pub descriptor_ui: String,
    pub descriptor_text: String,
    pub umls_id: String,
    pub score: i32,
    pub term_type: String,
    pub misc: String,
    pub paths: String,
    pub comments: Option<String>,
}

/// Marks an assay for which the indexer suggested no terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentinelRow {
    pub assay_id: i64,
}

impl SentinelRow {
    pub fn new(assay_id: i64) -> Self {
        Self { assay_id }
    }

    pub fn descriptor_ui(&self) -> &'static str {
        NOT_APPLICABLE_DESCRIPTOR
    }

    pub fn comments(&self) -> &'static str {
        NO_TERMS_SUGGESTED
    }
}

/// A stored annotation row as read back from the database
///
/// Sentinel rows leave every column except `assay_id`, `descriptor_ui` and
/// `comments` NULL, hence the options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AnnotationRow {
    pub assay_id: i64,
    pub descriptor_ui: Option<String>,
    pub descriptor_text: Option<String>,
    pub umls_id: Option<String>,
    pub score: Option<i32>,
    pub term_type: Option<String>,
    pub misc: Option<String>,
    pub paths: Option<String>,
    pub comments: Option<String>,
}

impl AnnotationRow {
    pub fn is_sentinel(&self) -> bool {
        self.comments.as_deref() == Some(NO_TERMS_SUGGESTED)
    }
}

impl From<&AnnotationRecord> for AnnotationRow {
    fn from(record: &AnnotationRecord) -> Self {
        Self {
            assay_id: record.assay_id,
            descriptor_ui: Some(record.descriptor_ui.clone()),
            descriptor_text: Some(record.descriptor_text.clone()),
            umls_id: Some(record.umls_id.clone()),
            score: Some(record.score),
            term_type: Some(record.term_type.clone()),
            misc: Some(record.misc.clone()),
            paths: Some(record.paths.clone()),
            comments: record.comments.clone(),
        }
    }
}

impl From<&SentinelRow> for AnnotationRow {
    fn from(sentinel: &SentinelRow) -> Self {
        Self {
            assay_id: sentinel.assay_id,
            descriptor_ui: Some(sentinel.descriptor_ui().to_string()),
            descriptor_text: None,
            umls_id: None,
            score: None,
            term_type: None,
            misc: None,
            paths: None,
            comments: Some(sentinel.comments().to_string()),
        }
    }
}
