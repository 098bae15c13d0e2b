use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::Result;
use crate::models::{AnnotationRecord, AnnotationRow, SentinelRow};

/// Destination for parsed annotation lines
///
/// Each call is one immediate insert; implementations must not batch or wrap
/// several calls in a transaction.
#[async_trait]
pub trait AnnotationSink: Send + Sync {
    async fn insert_annotation(&self, record: &AnnotationRecord) -> Result<()>;

    async fn insert_sentinel(&self, sentinel: &SentinelRow) -> Result<()>;
}

/// Keeps rows in memory, in insertion order
///
/// Used for dry runs and tests.
#[derive(Debug, Default)]
pub struct MemoryAnnotationSink {
    rows: Mutex<Vec<AnnotationRow>>,
}

impl MemoryAnnotationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> Vec<AnnotationRow> {
        self.rows.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait]
impl AnnotationSink for MemoryAnnotationSink {
    async fn insert_annotation(&self, record: &AnnotationRecord) -> Result<()> {
        self.rows.lock().push(AnnotationRow::from(record));
        Ok(())
    }

    async fn insert_sentinel(&self, sentinel: &SentinelRow) -> Result<()> {
        self.rows.lock().push(AnnotationRow::from(sentinel));
        Ok(())
    }
}
