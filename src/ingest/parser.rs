use crate::events::SkipReason;
use crate::models::{AnnotationRecord, SentinelRow};

/// Emitted by MTI in place of the term fields when it suggests nothing
pub const EMPTY_RESULT_MARKER: &str = "||||";

/// Fields in an annotation line, `"<id>"` included
const ANNOTATION_FIELD_COUNT: usize = 9;

/// Outcome of parsing one line of an MTI output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Annotation(AnnotationRecord),
    NoTermsSuggested(SentinelRow),
    /// Empty or whitespace-only line
    Blank,
    Skipped(SkipReason),
}

/// Parse one output line
///
/// Annotation lines have the shape
///
/// ```text
/// "<id>"|<descriptor text>|<umls id>|<score>|<term type>|<misc>|<unused>|<paths>|<descriptor ui>
/// ```
///
/// Any line containing `||||` is an empty result for the first quoted id on
/// it. Values are returned verbatim; quoting for storage is the sink's job.
pub fn parse_output_line(line: &str) -> ParsedLine {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return ParsedLine::Blank;
    }

    if line.contains(EMPTY_RESULT_MARKER) {
        return match quoted_assay_id(line) {
            Some(assay_id) => ParsedLine::NoTermsSuggested(SentinelRow::new(assay_id)),
            None => ParsedLine::Skipped(SkipReason::Malformed(
                "empty-result marker without a quoted assay id".to_string(),
            )),
        };
    }

    let fields: Vec<&str> = line.split('|').collect();

    let assay_id = match fields[0].trim().trim_matches('"').parse::<i64>() {
        Ok(id) => id,
        Err(_) if line.contains("ERROR") => return ParsedLine::Skipped(SkipReason::ErrorReported),
        Err(_) => return ParsedLine::Skipped(SkipReason::Unparseable),
    };

    if fields.len() < ANNOTATION_FIELD_COUNT {
        return ParsedLine::Skipped(SkipReason::Malformed(format!(
            "expected at least {ANNOTATION_FIELD_COUNT} fields, found {}",
            fields.len()
        )));
    }

    let score = match fields[3].trim().parse::<i32>() {
        Ok(score) => score,
        Err(_) => {
            return ParsedLine::Skipped(SkipReason::Malformed(format!(
                "score '{}' is not an integer",
                fields[3]
            )))
        }
    };

    ParsedLine::Annotation(AnnotationRecord {
        assay_id,
        descriptor_ui: fields[8].to_string(),
        descriptor_text: fields[1].trim_matches('*').to_string(),
        umls_id: fields[2].to_string(),
        score,
        term_type: fields[4].to_string(),
        misc: fields[5].to_string(),
        paths: fields[7].to_string(),
        comments: None,
    })
}

/// Integer between the first pair of double quotes
fn quoted_assay_id(line: &str) -> Option<i64> {
    let mut parts = line.split('"');
    parts.next()?;
    let candidate = parts.next()?;
    // A lone quote leaves no closing part
    parts.next()?;
    candidate.trim().parse().ok()
}
