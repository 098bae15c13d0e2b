use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{PipelineError, Result};
use crate::ingest::AnnotationSink;
use crate::models::{AnnotationRecord, AnnotationRow, SentinelRow};
use crate::validation::validate_table_name;

/// Writes annotation rows into the configured PostgreSQL table
///
/// Values are bound as parameters, so quotes inside descriptor text are
/// stored exactly as the indexer produced them.
#[derive(Clone)]
pub struct PgAnnotationStore {
    pool: PgPool,
    table: String,
    insert_annotation_sql: String,
    insert_sentinel_sql: String,
}

impl std::fmt::Debug for PgAnnotationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgAnnotationStore")
            .field("pool", &"PgPool")
            .field("table", &self.table)
            .finish()
    }
}

impl PgAnnotationStore {
    pub fn new(pool: PgPool, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        validate_table_name(&table).map_err(PipelineError::validation)?;

        let insert_annotation_sql = format!(
            "INSERT INTO {table} (assay_id, descriptor_ui, descriptor_text, umls_id, score, term_type, misc, paths) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        );
        let insert_sentinel_sql =
            format!("INSERT INTO {table} (assay_id, descriptor_ui, comments) VALUES ($1, $2, $3)");

        Ok(Self {
            pool,
            table,
            insert_annotation_sql,
            insert_sentinel_sql,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// All rows stored for one assay
    pub async fn find_by_assay(&self, assay_id: i64) -> Result<Vec<AnnotationRow>> {
        let sql = format!(
            "SELECT assay_id, descriptor_ui, descriptor_text, umls_id, score, term_type, misc, paths, comments \
             FROM {} WHERE assay_id = $1 ORDER BY descriptor_ui",
            self.table
        );

        let rows = sqlx::query_as::<_, AnnotationRow>(&sql)
            .bind(assay_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}

#[async_trait]
impl AnnotationSink for PgAnnotationStore {
    async fn insert_annotation(&self, record: &AnnotationRecord) -> Result<()> {
        sqlx::query(&self.insert_annotation_sql)
            .bind(record.assay_id)
            .bind(&record.descriptor_ui)
            .bind(&record.descriptor_text)
            .bind(&record.umls_id)
            .bind(record.score)
            .bind(&record.term_type)
            .bind(&record.misc)
            .bind(&record.paths)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn insert_sentinel(&self, sentinel: &SentinelRow) -> Result<()> {
        sqlx::query(&self.insert_sentinel_sql)
            .bind(sentinel.assay_id)
            .bind(sentinel.descriptor_ui())
            .bind(sentinel.comments())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
