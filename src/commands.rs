use chrono::NaiveDate;
use serde::Serialize;

use crate::engine::CycleEngine;
use crate::models::{
    CycleStats, CyclePhase, EntryIssue, PeriodEntry, PredictionEstimate, PredictionWindow,
    Regularity, SymptomLogEntry,
};
use crate::records::RecordError;
use crate::storage::LogSnapshot;
use crate::validation;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{collection}[{index}]: {error}")]
    Record {
        collection: &'static str,
        index: usize,
        #[source]
        error: RecordError,
    },
    #[error("invalid month: {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A record dropped at ingest because its shape could not be trusted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    pub collection: &'static str,
    pub index: usize,
    pub reason: String,
}

/// Typed engine inputs parsed from a snapshot.
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub entries: Vec<PeriodEntry>,
    pub symptom_logs: Vec<SymptomLogEntry>,
    pub estimate: Option<PredictionEstimate>,
    pub rejected: Vec<RejectedRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Dashboard,
    Stats,
    Calendar { year: i32, month: u32 },
    Trends,
    Validate,
}

/// Text for the summary cards, with "N/A" wherever a value is not known.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCards {
    pub last_period: String,
    pub next_period: String,
    pub average_cycle: String,
    pub average_period: String,
    pub symptoms_logged: usize,
    pub countdown: String,
    pub phase: String,
    /// Presentation token for the phase indicator color.
    pub phase_color: String,
    pub regularity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct StatsReport {
    stats: CycleStats,
    regularity: Regularity,
    prediction: PredictionWindow,
    phase: CyclePhase,
    cards: SummaryCards,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct ValidateReport {
    accepted: usize,
    issues: Vec<EntryIssue>,
    rejected_records: Vec<RejectedRecord>,
}

/// Parse raw records. Unparseable records are dropped with a warning, or
/// abort the command when `strict` is set.
pub fn ingest(snapshot: LogSnapshot, strict: bool) -> Result<Inputs, CommandError> {
    let mut inputs = Inputs::default();

    for (index, raw) in snapshot.period_entries.into_iter().enumerate() {
        match PeriodEntry::try_from(raw) {
            Ok(entry) => inputs.entries.push(entry),
            Err(error) => reject(&mut inputs, "period_entries", index, error, strict)?,
        }
    }

    for (index, raw) in snapshot.symptom_logs.into_iter().enumerate() {
        match SymptomLogEntry::try_from(raw) {
            Ok(entry) => inputs.symptom_logs.push(entry),
            Err(error) => reject(&mut inputs, "symptom_logs", index, error, strict)?,
        }
    }

    if let Some(raw) = snapshot.prediction {
        match raw.into_estimate() {
            Ok(estimate) => inputs.estimate = estimate,
            Err(error) => reject(&mut inputs, "prediction", 0, error, strict)?,
        }
    }

    Ok(inputs)
}

fn reject(
    inputs: &mut Inputs,
    collection: &'static str,
    index: usize,
    error: RecordError,
    strict: bool,
) -> Result<(), CommandError> {
    if strict {
        return Err(CommandError::Record {
            collection,
            index,
            error,
        });
    }
    tracing::warn!(collection, index, %error, "dropping unreadable record");
    inputs.rejected.push(RejectedRecord {
        collection,
        index,
        reason: error.to_string(),
    });
    Ok(())
}

pub fn summary_cards(
    stats: &CycleStats,
    regularity: &Regularity,
    prediction: &PredictionWindow,
    phase: CyclePhase,
) -> SummaryCards {
    let long_date = |d: Option<NaiveDate>| {
        d.map_or_else(|| "N/A".to_string(), |d| d.format("%B %-d, %Y").to_string())
    };
    SummaryCards {
        last_period: long_date(stats.last_period_start),
        next_period: long_date(prediction.next_period_start),
        average_cycle: stats.avg_cycle_length.to_string(),
        average_period: stats.avg_period_length.to_string(),
        symptoms_logged: stats.total_symptoms_logged,
        countdown: prediction.summary(),
        phase: phase.label().to_string(),
        phase_color: phase.color_token().to_string(),
        regularity: regularity.message().to_string(),
    }
}

/// Run one report and render it as pretty JSON.
pub fn run(
    report: &Report,
    inputs: &Inputs,
    today: NaiveDate,
    engine: &CycleEngine,
) -> Result<String, CommandError> {
    let estimate = inputs.estimate.as_ref();
    let json = match report {
        Report::Dashboard => serde_json::to_string_pretty(&engine.dashboard(
            &inputs.entries,
            &inputs.symptom_logs,
            estimate,
            today,
        ))?,
        Report::Stats => {
            let dashboard =
                engine.dashboard(&inputs.entries, &inputs.symptom_logs, estimate, today);
            let cards = summary_cards(
                &dashboard.stats,
                &dashboard.regularity,
                &dashboard.prediction,
                dashboard.phase,
            );
            serde_json::to_string_pretty(&StatsReport {
                stats: dashboard.stats,
                regularity: dashboard.regularity,
                prediction: dashboard.prediction,
                phase: dashboard.phase,
                cards,
            })?
        }
        Report::Calendar { year, month } => {
            let (log, _) = validation::validate(&inputs.entries);
            let calendar = engine
                .annotate(&log, &inputs.symptom_logs, estimate)
                .month(*year, *month)
                .ok_or(CommandError::InvalidMonth {
                    year: *year,
                    month: *month,
                })?;
            serde_json::to_string_pretty(&calendar)?
        }
        Report::Trends => {
            let (log, _) = validation::validate(&inputs.entries);
            serde_json::to_string_pretty(&engine.trends(&log))?
        }
        Report::Validate => {
            let (log, issues) = validation::validate(&inputs.entries);
            serde_json::to_string_pretty(&ValidateReport {
                accepted: log.len(),
                issues,
                rejected_records: inputs.rejected.clone(),
            })?
        }
    };
    Ok(json)
}
