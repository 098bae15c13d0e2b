//! Input validation for values that end up interpolated into SQL or shell text.
//!
//! Table names cannot be bound as query parameters, so they are checked
//! against a conservative identifier grammar before use.

use regex::Regex;
use std::sync::OnceLock;

/// Maximum identifier length accepted by PostgreSQL without truncation
const MAX_IDENTIFIER_LENGTH: usize = 63;

fn table_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
            .expect("table name pattern is valid")
    })
}

/// Validates a table name, optionally schema-qualified (`schema.table`)
pub fn validate_table_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("table name must not be empty".to_string());
    }

    if !table_name_pattern().is_match(name) {
        return Err(format!(
            "'{name}' is not a plain identifier (letters, digits, underscores, one optional schema prefix)"
        ));
    }

    if let Some(part) = name.split('.').find(|part| part.len() > MAX_IDENTIFIER_LENGTH) {
        return Err(format!(
            "identifier '{part}' is longer than {MAX_IDENTIFIER_LENGTH} characters"
        ));
    }

    Ok(())
}

/// Validates a batch subdirectory name such as `0001`
///
/// The name is joined onto the input, output and error roots and ends up in
/// the scheduler's job command, so it must be one plain path component.
pub fn validate_subdir_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("subdirectory name must not be empty".to_string());
    }

    if name == "." || name == ".." {
        return Err(format!("'{name}' does not name a subdirectory"));
    }

    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return Err(format!(
            "subdirectory name '{name}' contains unsupported character {bad:?}"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_plain_and_qualified_names() {
        assert!(validate_table_name("assay_mesh_annotations").is_ok());
        assert!(validate_table_name("chembl_21.assays").is_ok());
        assert!(validate_table_name("_scratch").is_ok());
    }

    #[test]
    fn test_rejects_injection_attempts() {
        assert!(validate_table_name("").is_err());
        assert!(validate_table_name("a b").is_err());
        assert!(validate_table_name("results; drop table x").is_err());
        assert!(validate_table_name("1table").is_err());
        assert!(validate_table_name("a.b.c").is_err());
        assert!(validate_table_name("quoted\"name").is_err());
    }

    #[test]
    fn test_rejects_overlong_identifier() {
        let long = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        assert!(validate_table_name(&long).is_err());
        assert!(validate_table_name(&format!("schema.{long}")).is_err());
    }

    #[test]
    fn test_subdir_names() {
        assert!(validate_subdir_name("0001").is_ok());
        assert!(validate_subdir_name("00011").is_ok());
        assert!(validate_subdir_name("batch_2.retry").is_ok());

        assert!(validate_subdir_name("").is_err());
        assert!(validate_subdir_name("..").is_err());
        assert!(validate_subdir_name("0001/../etc").is_err());
        assert!(validate_subdir_name("0001 0002").is_err());
        assert!(validate_subdir_name("$(id)").is_err());
    }
}
