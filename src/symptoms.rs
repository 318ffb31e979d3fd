use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::models::SymptomLogEntry;

/// Collapse the log to one symptom set per date, unioning duplicates.
pub fn merge_by_date(symptoms: &[SymptomLogEntry]) -> BTreeMap<NaiveDate, BTreeSet<String>> {
    let mut merged: BTreeMap<NaiveDate, BTreeSet<String>> = BTreeMap::new();
    for entry in symptoms {
        merged
            .entry(entry.date)
            .or_default()
            .extend(entry.symptoms.iter().cloned());
    }
    merged
}

/// Symptoms from the `limit` most recently logged dates, newest date first.
pub fn recent_symptoms(symptoms: &[SymptomLogEntry], limit: usize) -> Vec<String> {
    merge_by_date(symptoms)
        .into_iter()
        .rev()
        .take(limit)
        .flat_map(|(_, set)| set)
        .collect()
}
