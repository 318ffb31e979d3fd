use chrono::NaiveDate;

use crate::dates;
use crate::models::{DataAvailability, EntryIssue, IssueKind, PeriodEntry};

/// Longest span, in days, accepted for a logged period or a predicted window.
pub const MAX_SPAN_DAYS: i64 = 31;

/// Period history cleaned for aggregation: well-formed entries, ascending by
/// `start_date`, no two ranges sharing a day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeriodLog {
    entries: Vec<PeriodEntry>,
}

impl PeriodLog {
    pub fn entries(&self) -> &[PeriodEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&PeriodEntry> {
        self.entries.last()
    }

    pub fn availability(&self) -> DataAvailability {
        DataAvailability::from_count(self.entries.len())
    }

    /// Days between consecutive starts, oldest first.
    pub fn cycle_lengths(&self) -> Vec<i64> {
        self.entries
            .windows(2)
            .map(|w| dates::days_between(w[0].start_date, w[1].start_date))
            .collect()
    }

    /// The most recent `n` entries, oldest first.
    pub fn recent(&self, n: usize) -> &[PeriodEntry] {
        let skip = self.entries.len().saturating_sub(n);
        &self.entries[skip..]
    }

    pub fn contains_day(&self, day: NaiveDate) -> bool {
        self.entries
            .iter()
            .any(|e| e.start_date <= day && day <= e.end_date)
    }
}

/// Split raw entries into a clean `PeriodLog` plus a report of everything
/// that was excluded or looked suspicious. Never fails.
pub fn validate(entries: &[PeriodEntry]) -> (PeriodLog, Vec<EntryIssue>) {
    let mut issues = Vec::new();

    let mut candidates: Vec<(usize, &PeriodEntry)> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match entry.span_days() {
            None => issues.push(issue(index, entry, IssueKind::InvertedRange)),
            Some(days) if days > MAX_SPAN_DAYS => {
                issues.push(issue(index, entry, IssueKind::ImplausibleSpan { days }))
            }
            Some(_) => candidates.push((index, entry)),
        }
    }
    candidates.sort_by_key(|(_, e)| e.start_date);

    let mut accepted: Vec<PeriodEntry> = Vec::with_capacity(candidates.len());
    for (index, entry) in candidates {
        if let Some(prev) = accepted.last() {
            if entry.start_date <= prev.end_date {
                issues.push(issue(
                    index,
                    entry,
                    IssueKind::Overlap {
                        with_start: prev.start_date,
                    },
                ));
                continue;
            }
        }

        match (entry.period_length, entry.span_days()) {
            (None, _) => issues.push(issue(index, entry, IssueKind::MissingPeriodLength)),
            (Some(recorded), Some(computed)) if recorded != computed => issues.push(issue(
                index,
                entry,
                IssueKind::PeriodLengthMismatch { recorded, computed },
            )),
            _ => {}
        }
        accepted.push(entry.clone());
    }

    issues.sort_by_key(|i| i.index);
    for i in &issues {
        tracing::warn!(
            index = i.index,
            start = %i.start_date,
            end = %i.end_date,
            issue = ?i.kind,
            excluded = i.is_excluded(),
            "period entry failed validation"
        );
    }

    (PeriodLog { entries: accepted }, issues)
}

fn issue(index: usize, entry: &PeriodEntry, kind: IssueKind) -> EntryIssue {
    EntryIssue {
        index,
        start_date: entry.start_date,
        end_date: entry.end_date,
        kind,
    }
}
