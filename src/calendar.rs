use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::dates;
use crate::models::{CalendarAnnotation, DayAnnotation, DayTag, PredictionEstimate, SymptomLogEntry};
use crate::symptoms;
use crate::validation::{PeriodLog, MAX_SPAN_DAYS};

/// Build the per-day tag map from scratch. Tags accumulate: a predicted day
/// that also has symptoms carries both.
pub fn annotate(
    log: &PeriodLog,
    symptom_logs: &[SymptomLogEntry],
    estimate: Option<&PredictionEstimate>,
    show_fertility: bool,
) -> CalendarAnnotation {
    let mut calendar = CalendarAnnotation::default();

    for entry in log.entries() {
        calendar.tag_range(entry.start_date, entry.end_date, DayTag::PastPeriod);
    }

    if let Some(estimate) = estimate {
        calendar.tag_range(
            estimate.next_period_start,
            estimate.next_period_end,
            DayTag::PredictedPeriod,
        );
        if show_fertility {
            if let Some((start, end)) = estimate.fertile_window() {
                calendar.tag_range(start, end, DayTag::FertileWindow);
            }
        }
    }

    for (date, set) in symptoms::merge_by_date(symptom_logs) {
        let day = calendar.days.entry(date).or_default();
        day.tags.insert(DayTag::SymptomLogged);
        day.symptoms.extend(set);
    }

    calendar
}

impl CalendarAnnotation {
    fn tag_range(&mut self, start: NaiveDate, end: NaiveDate, tag: DayTag) {
        if dates::days_between(start, end) + 1 > MAX_SPAN_DAYS {
            tracing::warn!(%start, %end, ?tag, "skipping implausibly long range");
            return;
        }
        for date in dates::inclusive_days(start, end) {
            self.days.entry(date).or_default().tags.insert(tag);
        }
    }

    /// Tags on `date`; empty for untagged days.
    pub fn tags_on(&self, date: NaiveDate) -> BTreeSet<DayTag> {
        self.days
            .get(&date)
            .map(|day| day.tags.clone())
            .unwrap_or_default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayAnnotation> {
        self.days.get(&date)
    }

    pub fn dates_tagged(&self, tag: DayTag) -> BTreeSet<NaiveDate> {
        self.days
            .iter()
            .filter(|(_, day)| day.tags.contains(&tag))
            .map(|(date, _)| *date)
            .collect()
    }

    /// The slice of the calendar shown in one month view.
    pub fn month(&self, year: i32, month: u32) -> Option<CalendarAnnotation> {
        let (first_day, last_day) = dates::month_bounds(year, month)?;
        Some(CalendarAnnotation {
            days: self
                .days
                .range(first_day..=last_day)
                .map(|(date, day)| (*date, day.clone()))
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
