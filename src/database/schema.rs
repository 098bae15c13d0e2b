//! # Annotation Table Setup
//!
//! One-shot DDL for the destination table. Neither function is idempotent:
//! running `create_annotation_table` against an existing table fails with the
//! database's "relation already exists" error, which is propagated.

use sqlx::PgPool;

use crate::error::{PipelineError, Result};
use crate::validation::validate_table_name;

const COLUMN_COMMENTS: [(&str, &str); 8] = [
    ("assay_id", "ChEMBL assay_id"),
    (
        "descriptor_ui",
        "Unique identifier for the subject heading. Every identifier begins with the letter D (for descriptor). Unique IDs starting with C are supplementary concepts.",
    ),
    (
        "descriptor_text",
        "Preferred term for the concept, unique for the descriptor ID.",
    ),
    (
        "umls_id",
        "Concept Unique Identifier for the MeSH Term. A single descriptor record will have one or more concepts, one of which is the preferred concept of the record.",
    ),
    ("score", "Medical Text Indexer score for this term"),
    (
        "term_type",
        "Type of the term. MeSH Heading (MH), Heading Mapped to (HM), Entry Term (ET), Supplemental Concept (NM), MeSH SubHeading (SH), MeSH CheckTag (CT)",
    ),
    (
        "misc",
        "If via entry term, this explains the replacement. If not, blank",
    ),
    (
        "paths",
        "One or more designators showing which of the pathways recommended the term. MetaMap's MMI (MM), PubMed Related Citations (RC)",
    ),
];

/// Strip an optional schema prefix; index names may not be qualified
fn unqualified(table: &str) -> &str {
    table.rsplit('.').next().unwrap_or(table)
}

/// Escape a value for use inside a single-quoted SQL literal
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// DDL statements that create the table and attach column comments
pub fn annotation_table_statements(table: &str) -> Result<Vec<String>> {
    validate_table_name(table).map_err(PipelineError::validation)?;

    let mut statements = vec![format!(
        "CREATE TABLE {table} (\
         assay_id bigint, \
         descriptor_ui varchar(50), \
         descriptor_text varchar(200), \
         umls_id varchar(50), \
         score int, \
         term_type varchar(50), \
         misc varchar(1000), \
         paths varchar(50), \
         comments varchar(400))"
    )];

    statements.extend(COLUMN_COMMENTS.iter().map(|(column, comment)| {
        format!(
            "COMMENT ON COLUMN {table}.{column} IS {}",
            quote_literal(comment)
        )
    }));

    Ok(statements)
}

/// DDL statements for the three secondary indexes
pub fn annotation_index_statements(table: &str) -> Result<Vec<String>> {
    validate_table_name(table).map_err(PipelineError::validation)?;
    let base = unqualified(table);

    Ok(vec![
        format!("CREATE INDEX {base}_dui ON {table}(descriptor_ui)"),
        format!("CREATE INDEX {base}_dtext ON {table}(descriptor_text)"),
        format!("CREATE INDEX {base}_idx ON {table}(assay_id, descriptor_ui, descriptor_text)"),
    ])
}

/// Create the annotation table with column comments
pub async fn create_annotation_table(pool: &PgPool, table: &str) -> Result<()> {
    for statement in annotation_table_statements(table)? {
        sqlx::query(&statement).execute(pool).await?;
    }

    crate::log_database!(info, "Annotation table created", table: table);
    Ok(())
}

/// Create the secondary indexes on the annotation table
pub async fn create_annotation_indexes(pool: &PgPool, table: &str) -> Result<()> {
    for statement in annotation_index_statements(table)? {
        sqlx::query(&statement).execute(pool).await?;
    }

    crate::log_database!(info, "Indexes on annotation table created", table: table);
    Ok(())
}
