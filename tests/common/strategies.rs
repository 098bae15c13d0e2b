use mti_pipeline::models::AssayRecord;
use proptest::prelude::*;

/// Descriptions as ChEMBL writes them: words, punctuation, the odd typo
pub fn description_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z0-9 ,;:()%-]{1,80}",
        Just("Inhibition of human prostrate cancer cell line".to_string()),
        Just("Prostrate specific antigen binding".to_string()),
        Just("Activity at rat prostate".to_string()),
    ]
}

/// Records with unique ascending ids
pub fn assay_records_strategy(max_len: usize) -> impl Strategy<Value = Vec<AssayRecord>> {
    prop::collection::vec(description_strategy(), 0..=max_len).prop_map(|descriptions| {
        descriptions
            .into_iter()
            .enumerate()
            .map(|(offset, description)| AssayRecord::new(offset as i64 + 1, description))
            .collect()
    })
}
