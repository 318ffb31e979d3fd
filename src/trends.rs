use crate::dates;
use crate::models::{TrendPoint, TrendSeries};
use crate::validation::PeriodLog;

/// Chart series over the last `window` entries. The first retained entry has
/// no predecessor, so the cycle series is one point shorter than the period
/// series rather than starting with a gap.
pub fn trends(log: &PeriodLog, window: usize, label_format: &str) -> TrendSeries {
    let recent = log.recent(window);

    let period_series = recent
        .iter()
        .map(|e| TrendPoint {
            label: dates::label(e.start_date, label_format),
            value: e.period_length,
        })
        .collect();

    let cycle_series = recent
        .windows(2)
        .map(|w| TrendPoint {
            label: dates::label(w[1].start_date, label_format),
            value: Some(dates::days_between(w[0].start_date, w[1].start_date)),
        })
        .collect();

    TrendSeries {
        cycle_series,
        period_series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PeriodEntry;
    use crate::validation::validate;
    use chrono::{Duration, NaiveDate};

    fn make_entry(start: &str, end: &str) -> PeriodEntry {
        PeriodEntry::new(
            NaiveDate::parse_from_str(start, "%Y-%m-%d").unwrap(),
            NaiveDate::parse_from_str(end, "%Y-%m-%d").unwrap(),
        )
    }

    #[test]
    fn empty_log_gives_empty_series() {
        let series = trends(&PeriodLog::default(), 6, dates::SHORT_LABEL);
        assert!(series.cycle_series.is_empty());
        assert!(series.period_series.is_empty());
    }

    #[test]
    fn single_entry_has_period_point_only() {
        let (log, _) = validate(&[make_entry("2025-01-01", "2025-01-05")]);
        let series = trends(&log, 6, dates::SHORT_LABEL);
        assert!(series.cycle_series.is_empty());
        assert_eq!(
            series.period_series,
            vec![TrendPoint {
                label: "Jan 01".into(),
                value: Some(5)
            }]
        );
    }

    #[test]
    fn two_entries_give_one_cycle_point() {
        let (log, _) = validate(&[
            make_entry("2025-01-01", "2025-01-05"),
            make_entry("2025-01-29", "2025-02-02"),
        ]);
        let series = trends(&log, 6, dates::SHORT_LABEL);
        assert_eq!(
            series.cycle_series,
            vec![TrendPoint {
                label: "Jan 29".into(),
                value: Some(28)
            }]
        );
        assert_eq!(series.period_series.len(), 2);
    }

    #[test]
    fn only_last_six_entries_are_charted() {
        let mut start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut entries = Vec::new();
        for gap in [30, 27, 29, 28, 31, 26, 28, 29] {
            entries.push(PeriodEntry::new(start, start + Duration::days(4)));
            start += Duration::days(gap);
        }
        let (log, _) = validate(&entries);
        let series = trends(&log, 6, dates::SHORT_LABEL);

        assert_eq!(series.period_series.len(), 6);
        assert_eq!(series.cycle_series.len(), 5);
        let values: Vec<_> = series.cycle_series.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![Some(29), Some(28), Some(31), Some(26), Some(28)]);
        assert_eq!(series.cycle_series[0].label, series.period_series[1].label);
    }

    #[test]
    fn missing_length_is_a_null_point() {
        let mut blank = make_entry("2025-01-29", "2025-02-02");
        blank.period_length = None;
        let (log, _) = validate(&[make_entry("2025-01-01", "2025-01-05"), blank]);
        let series = trends(&log, 6, dates::SHORT_LABEL);
        assert_eq!(series.period_series[1].value, None);
        assert_eq!(series.cycle_series[0].value, Some(28));
    }
}
