//! JSON shapes returned by the tracker endpoints, before they are trusted.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dates;
use crate::models::{PeriodEntry, PredictionEstimate, SymptomLogEntry};
use crate::validation::MAX_SPAN_DAYS;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("record is missing `{0}`")]
    MissingField(&'static str),
    #[error("invalid date in `{field}`: {value:?}")]
    InvalidDate { field: &'static str, value: String },
    #[error("prediction window ends ({end}) before it starts ({start})")]
    InvertedPrediction { start: NaiveDate, end: NaiveDate },
    #[error("`{field}` window {start}..{end} is longer than {max} days", max = MAX_SPAN_DAYS)]
    ImplausibleWindow {
        field: &'static str,
        start: NaiveDate,
        end: NaiveDate,
    },
}

/// `GET /period-entries` item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPeriodEntry {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub period_length: Option<Value>,
    #[serde(default)]
    pub cycle_length: Option<Value>,
}

/// `GET /symptom-logs` item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSymptomLog {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub symptoms: Vec<String>,
    #[serde(default)]
    pub cycle_day: Option<Value>,
}

/// `GET /predict-cycle` body. All date fields are null when the predictor
/// has nothing to go on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPrediction {
    #[serde(default)]
    pub next_period_start: Option<String>,
    #[serde(default)]
    pub next_period_end: Option<String>,
    #[serde(default)]
    pub fertile_window_start: Option<String>,
    #[serde(default)]
    pub fertile_window_end: Option<String>,
    #[serde(default)]
    pub cycle_progress: Option<f64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub suggestion: Option<String>,
}

/// A positive whole number of days. Numeric strings are accepted; anything
/// else (absent, text, zero, negative, fractional) is `None`.
pub fn day_count(value: Option<&Value>) -> Option<i64> {
    let n = match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))?,
        Value::String(s) => s.trim().parse::<i64>().ok()?,
        _ => return None,
    };
    (n > 0).then_some(n)
}

fn required_date(field: &'static str, value: Option<&str>) -> Result<NaiveDate, RecordError> {
    parse_date(field, value.ok_or(RecordError::MissingField(field))?)
}

fn optional_date(field: &'static str, value: Option<&str>) -> Result<Option<NaiveDate>, RecordError> {
    value.map(|s| parse_date(field, s)).transpose()
}

fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, RecordError> {
    dates::parse_iso(value).map_err(|_| RecordError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

fn check_span(field: &'static str, start: NaiveDate, end: NaiveDate) -> Result<(), RecordError> {
    if dates::days_between(start, end) + 1 > MAX_SPAN_DAYS {
        return Err(RecordError::ImplausibleWindow { field, start, end });
    }
    Ok(())
}

impl TryFrom<RawPeriodEntry> for PeriodEntry {
    type Error = RecordError;

    fn try_from(raw: RawPeriodEntry) -> Result<Self, Self::Error> {
        Ok(PeriodEntry {
            id: raw.id,
            start_date: required_date("start_date", raw.start_date.as_deref())?,
            end_date: required_date("end_date", raw.end_date.as_deref())?,
            period_length: day_count(raw.period_length.as_ref()),
            cycle_length: day_count(raw.cycle_length.as_ref()),
        })
    }
}

impl TryFrom<RawSymptomLog> for SymptomLogEntry {
    type Error = RecordError;

    fn try_from(raw: RawSymptomLog) -> Result<Self, Self::Error> {
        Ok(SymptomLogEntry {
            date: required_date("date", raw.date.as_deref())?,
            symptoms: raw
                .symptoms
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<BTreeSet<_>>(),
            cycle_day: day_count(raw.cycle_day.as_ref()),
        })
    }
}

impl RawPrediction {
    /// `Ok(None)` for the "no data yet" response.
    pub fn into_estimate(self) -> Result<Option<PredictionEstimate>, RecordError> {
        let Some(start) = optional_date("next_period_start", self.next_period_start.as_deref())?
        else {
            return Ok(None);
        };
        let end = required_date("next_period_end", self.next_period_end.as_deref())?;
        if end < start {
            return Err(RecordError::InvertedPrediction { start, end });
        }
        check_span("next_period", start, end)?;

        let fertile_start =
            optional_date("fertile_window_start", self.fertile_window_start.as_deref())?;
        let fertile_end = optional_date("fertile_window_end", self.fertile_window_end.as_deref())?;
        if let (Some(start), Some(end)) = (fertile_start, fertile_end) {
            check_span("fertile_window", start, end)?;
        }

        Ok(Some(PredictionEstimate {
            next_period_start: start,
            next_period_end: end,
            cycle_progress: self.cycle_progress.filter(|p| p.is_finite()),
            fertile_window_start: fertile_start,
            fertile_window_end: fertile_end,
        }))
    }
}
