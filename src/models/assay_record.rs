use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

use crate::error::{PipelineError, Result};
use crate::validation::validate_table_name;

/// AssayRecord is one assay description read from the record store
/// Maps to `(assay_id, description)` of the configured source table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AssayRecord {
    pub id: i64,
    pub description: String,
}

impl AssayRecord {
    pub fn new(id: i64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    /// Fetch every non-null description, trailing periods trimmed
    ///
    /// `condition` is appended verbatim as `AND <condition>`; it is trusted
    /// SQL supplied by the operator. Rows are fetched eagerly.
    pub async fn fetch_descriptions(
        pool: &PgPool,
        source_table: &str,
        condition: Option<&str>,
    ) -> Result<Vec<AssayRecord>> {
        let sql = build_description_query(source_table, condition)?;

        let records = sqlx::query_as::<_, AssayRecord>(&sql)
            .fetch_all(pool)
            .await?;

        crate::log_database!(info, "Fetched assay descriptions",
            table: source_table,
            rows: records.len(),
            filtered: condition.is_some()
        );

        Ok(records)
    }
}

/// Build the description query for `source_table`
///
/// A trailing '.' makes the annotation service answer `ERROR`, so it is
/// trimmed in SQL.
pub fn build_description_query(source_table: &str, condition: Option<&str>) -> Result<String> {
    validate_table_name(source_table).map_err(PipelineError::validation)?;

    let mut sql = format!(
        "SELECT assay_id::bigint AS id, trim(trailing '.' FROM description) AS description \
         FROM {source_table} WHERE description IS NOT NULL"
    );

    if let Some(condition) = condition.map(str::trim).filter(|c| !c.is_empty()) {
        sql.push_str(" AND ");
        sql.push_str(condition);
    }

    Ok(sql)
}

/// Query gateway entry point; see [`AssayRecord::fetch_descriptions`]
pub async fn fetch_assay_descriptions(
    pool: &PgPool,
    source_table: &str,
    condition: Option<&str>,
) -> Result<Vec<AssayRecord>> {
    AssayRecord::fetch_descriptions(pool, source_table, condition).await
}
