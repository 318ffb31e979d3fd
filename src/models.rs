use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates;

/// One logged period, as recorded by the log store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// `None` when the record carried no usable day count.
    pub period_length: Option<i64>,
    #[serde(default)]
    pub cycle_length: Option<i64>,
}

impl PeriodEntry {
    /// Build an entry whose `period_length` is the inclusive span.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        let mut entry = Self {
            id: None,
            start_date,
            end_date,
            period_length: None,
            cycle_length: None,
        };
        entry.period_length = entry.span_days();
        entry
    }

    /// Inclusive day count of `[start_date, end_date]`, or `None` if inverted.
    pub fn span_days(&self) -> Option<i64> {
        if self.is_well_formed() {
            Some(dates::days_between(self.start_date, self.end_date) + 1)
        } else {
            None
        }
    }

    pub fn is_well_formed(&self) -> bool {
        self.start_date <= self.end_date
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        dates::inclusive_days(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomLogEntry {
    pub date: NaiveDate,
    pub symptoms: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_day: Option<i64>,
}

/// Next-period estimate supplied by the remote predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionEstimate {
    pub next_period_start: NaiveDate,
    pub next_period_end: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle_progress: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertile_window_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fertile_window_end: Option<NaiveDate>,
}

impl PredictionEstimate {
    pub fn new(next_period_start: NaiveDate, next_period_end: NaiveDate) -> Self {
        Self {
            next_period_start,
            next_period_end,
            cycle_progress: None,
            fertile_window_start: None,
            fertile_window_end: None,
        }
    }

    pub fn fertile_window(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.fertile_window_start?, self.fertile_window_end?))
    }
}

/// A statistic that is either measured or not computable from the data at hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Measurement<T> {
    Known(T),
    InsufficientData,
}

impl Measurement<f64> {
    /// Mean of `samples`, or `InsufficientData` when there are none.
    pub fn mean(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::InsufficientData;
        }
        Self::Known(samples.iter().sum::<f64>() / samples.len() as f64)
    }

    /// Numeric sentinel for summary cards: `0` when not computable.
    pub fn or_zero(&self) -> f64 {
        match self {
            Self::Known(v) => *v,
            Self::InsufficientData => 0.0,
        }
    }
}

impl fmt::Display for Measurement<f64> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{v:.1} days"),
            Self::InsufficientData => f.write_str("insufficient data"),
        }
    }
}

/// A whole-day quantity that may not be derivable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum DayCount {
    Known(i64),
    Unknown,
}

impl From<Option<i64>> for DayCount {
    fn from(value: Option<i64>) -> Self {
        value.map_or(Self::Unknown, Self::Known)
    }
}

impl fmt::Display for DayCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(v) => write!(f, "{v}"),
            Self::Unknown => f.write_str("N/A"),
        }
    }
}

/// How much period history exists; gates which statistics are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataAvailability {
    NoData,
    SingleEntry,
    MultiEntry,
}

impl DataAvailability {
    pub fn from_count(count: usize) -> Self {
        match count {
            0 => Self::NoData,
            1 => Self::SingleEntry,
            _ => Self::MultiEntry,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleStats {
    pub availability: DataAvailability,
    pub total_cycles: usize,
    pub avg_cycle_length: Measurement<f64>,
    pub avg_period_length: Measurement<f64>,
    pub total_symptoms_logged: usize,
    pub shortest_cycle: Option<i64>,
    pub longest_cycle: Option<i64>,
    pub last_period_start: Option<NaiveDate>,
    pub last_period_end: Option<NaiveDate>,
}

/// Irregularity verdict over the most recent cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Regularity {
    Regular { last_cycle_length: i64, std_dev: f64 },
    Irregular { last_cycle_length: i64, std_dev: f64 },
    InsufficientData,
}

impl Regularity {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Regular { .. } => "Your cycle looks regular",
            Self::Irregular { .. } => "Your cycle looks irregular",
            Self::InsufficientData => "insufficient data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePhase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
    Unknown,
}

impl CyclePhase {
    pub fn label(self) -> &'static str {
        match self {
            Self::Menstrual => "Menstrual",
            Self::Follicular => "Follicular",
            Self::Ovulation => "Ovulation",
            Self::Luteal => "Luteal",
            Self::Unknown => "Unknown",
        }
    }

    /// Opaque color token picked by the presentation layer.
    pub fn color_token(self) -> &'static str {
        match self {
            Self::Menstrual => "phase-menstrual",
            Self::Follicular => "phase-follicular",
            Self::Ovulation => "phase-ovulation",
            Self::Luteal => "phase-luteal",
            Self::Unknown => "phase-unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionWindow {
    pub next_period_start: Option<NaiveDate>,
    pub next_period_end: Option<NaiveDate>,
    pub days_remaining: DayCount,
    pub current_cycle_day: DayCount,
    /// The predicted start has passed without a new period being logged.
    pub lapsed: bool,
    /// Percent of the current cycle elapsed, 0..=100.
    pub progress: Option<f64>,
}

impl PredictionWindow {
    pub fn summary(&self) -> String {
        match (self.days_remaining, self.current_cycle_day) {
            (DayCount::Known(d), _) if d > 0 => {
                format!("{d} day{} until next period", if d == 1 { "" } else { "s" })
            }
            (DayCount::Known(0), _) => "Next period expected today".to_string(),
            (DayCount::Known(_), DayCount::Known(day)) => format!("Day {day} of cycle"),
            _ => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayTag {
    PastPeriod,
    PredictedPeriod,
    FertileWindow,
    SymptomLogged,
}

impl DayTag {
    pub fn css_class(self) -> &'static str {
        match self {
            Self::PastPeriod => "past-period-day",
            Self::PredictedPeriod => "predicted-period-day",
            Self::FertileWindow => "fertile-window-day",
            Self::SymptomLogged => "symptom-logged-day",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayAnnotation {
    pub tags: BTreeSet<DayTag>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub symptoms: BTreeSet<String>,
}

/// Per-day display tags for a calendar widget.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarAnnotation {
    pub days: BTreeMap<NaiveDate, DayAnnotation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub cycle_series: Vec<TrendPoint>,
    pub period_series: Vec<TrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    InvertedRange,
    /// Longer than any period could plausibly last.
    ImplausibleSpan { days: i64 },
    Overlap { with_start: NaiveDate },
    MissingPeriodLength,
    PeriodLengthMismatch { recorded: i64, computed: i64 },
}

/// A period entry the validation pass rejected or flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryIssue {
    /// Position of the entry in the input sequence.
    pub index: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl EntryIssue {
    /// Whether the entry was left out of the validated log.
    pub fn is_excluded(&self) -> bool {
        matches!(
            self.kind,
            IssueKind::InvertedRange | IssueKind::ImplausibleSpan { .. } | IssueKind::Overlap { .. }
        )
    }
}

/// Everything the tracker page renders, derived in one pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub availability: DataAvailability,
    pub stats: CycleStats,
    pub regularity: Regularity,
    pub prediction: PredictionWindow,
    pub phase: CyclePhase,
    pub calendar: CalendarAnnotation,
    pub trends: TrendSeries,
    pub recent_symptoms: Vec<String>,
    pub issues: Vec<EntryIssue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn period_length_round_trips_through_span() {
        let fixtures = [
            ("2025-01-01", "2025-01-05", 5),
            ("2025-01-29", "2025-02-02", 5),
            ("2024-02-27", "2024-03-01", 4),
            ("2025-03-10", "2025-03-10", 1),
        ];
        for (start, end, len) in fixtures {
            let entry = PeriodEntry::new(date(start), date(end));
            assert_eq!(entry.period_length, Some(len), "{start}..{end}");
            assert_eq!(entry.span_days(), entry.period_length);
        }
    }

    #[test]
    fn inverted_entry_has_no_span() {
        let entry = PeriodEntry::new(date("2025-01-05"), date("2025-01-01"));
        assert!(!entry.is_well_formed());
        assert_eq!(entry.period_length, None);
        assert_eq!(entry.days().count(), 0);
    }

    #[test]
    fn measurement_mean_never_divides_by_zero() {
        assert_eq!(Measurement::mean(&[]), Measurement::InsufficientData);
        assert_eq!(Measurement::mean(&[]).or_zero(), 0.0);
        assert_eq!(Measurement::mean(&[4.0, 6.0]), Measurement::Known(5.0));
    }

    #[test]
    fn unknown_values_render_as_placeholders() {
        assert_eq!(Measurement::<f64>::InsufficientData.to_string(), "insufficient data");
        assert_eq!(Measurement::Known(28.0).to_string(), "28.0 days");
        assert_eq!(DayCount::Unknown.to_string(), "N/A");
    }

    #[test]
    fn measurement_serializes_with_status() {
        let json = serde_json::to_value(Measurement::Known(28.0)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "known", "value": 28.0}));
        let json = serde_json::to_value(Measurement::<f64>::InsufficientData).unwrap();
        assert_eq!(json, serde_json::json!({"status": "insufficient_data"}));
    }

    #[test]
    fn prediction_summary_text() {
        let mut window = PredictionWindow {
            next_period_start: None,
            next_period_end: None,
            days_remaining: DayCount::Known(3),
            current_cycle_day: DayCount::Known(25),
            lapsed: false,
            progress: None,
        };
        assert_eq!(window.summary(), "3 days until next period");
        window.days_remaining = DayCount::Known(1);
        assert_eq!(window.summary(), "1 day until next period");
        window.days_remaining = DayCount::Known(0);
        assert_eq!(window.summary(), "Next period expected today");
        window.days_remaining = DayCount::Known(-3);
        window.current_cycle_day = DayCount::Known(3);
        assert_eq!(window.summary(), "Day 3 of cycle");
        window.days_remaining = DayCount::Unknown;
        assert_eq!(window.summary(), "N/A");
    }

    #[test]
    fn day_tags_serialize_as_css_stems() {
        let json = serde_json::to_string(&DayTag::PastPeriod).unwrap();
        assert_eq!(json, "\"past-period\"");
        assert_eq!(DayTag::SymptomLogged.css_class(), "symptom-logged-day");
    }
}
