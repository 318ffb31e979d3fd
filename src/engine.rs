use chrono::NaiveDate;

use crate::calendar;
use crate::config::EngineConfig;
use crate::models::{
    CalendarAnnotation, CycleStats, CyclePhase, Dashboard, DayCount, Measurement, PeriodEntry,
    PredictionEstimate, PredictionWindow, Regularity, SymptomLogEntry, TrendSeries,
};
use crate::phase;
use crate::prediction;
use crate::stats;
use crate::symptoms;
use crate::trends;
use crate::validation::{self, PeriodLog};

/// Entry point for the presentation layer. Every method is a pure function
/// of its arguments and the engine's configuration.
#[derive(Debug, Clone, Default)]
pub struct CycleEngine {
    config: EngineConfig,
}

impl CycleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn stats(&self, log: &PeriodLog, symptom_logs: &[SymptomLogEntry]) -> CycleStats {
        stats::cycle_stats(log, symptom_logs)
    }

    pub fn regularity(&self, log: &PeriodLog) -> Regularity {
        stats::regularity(log, &self.config)
    }

    pub fn prediction_window(
        &self,
        log: &PeriodLog,
        estimate: Option<&PredictionEstimate>,
        today: NaiveDate,
    ) -> PredictionWindow {
        let avg_cycle_length = stats::cycle_stats(log, &[]).avg_cycle_length;
        prediction::project(estimate, today, log, avg_cycle_length, self.config.lapse_policy)
    }

    /// Phase of today's cycle day, or `Unknown` when no cycle length is known.
    pub fn phase(
        &self,
        log: &PeriodLog,
        estimate: Option<&PredictionEstimate>,
        today: NaiveDate,
    ) -> CyclePhase {
        let window = self.prediction_window(log, estimate, today);
        let avg_cycle_length = stats::cycle_stats(log, &[]).avg_cycle_length;
        phase_for(&window, log, estimate, avg_cycle_length)
    }

    pub fn annotate(
        &self,
        log: &PeriodLog,
        symptom_logs: &[SymptomLogEntry],
        estimate: Option<&PredictionEstimate>,
    ) -> CalendarAnnotation {
        calendar::annotate(log, symptom_logs, estimate, self.config.show_fertility)
    }

    pub fn trends(&self, log: &PeriodLog) -> TrendSeries {
        trends::trends(log, self.config.trend_window, &self.config.label_format)
    }

    /// Validate the raw entries once and derive everything the tracker shows.
    pub fn dashboard(
        &self,
        entries: &[PeriodEntry],
        symptom_logs: &[SymptomLogEntry],
        estimate: Option<&PredictionEstimate>,
        today: NaiveDate,
    ) -> Dashboard {
        let (log, issues) = validation::validate(entries);

        let stats = self.stats(&log, symptom_logs);
        let prediction = prediction::project(
            estimate,
            today,
            &log,
            stats.avg_cycle_length,
            self.config.lapse_policy,
        );
        let phase = phase_for(&prediction, &log, estimate, stats.avg_cycle_length);

        tracing::debug!(
            entries = entries.len(),
            accepted = log.len(),
            issues = issues.len(),
            symptom_logs = symptom_logs.len(),
            phase = phase.label(),
            "recomputed dashboard"
        );

        Dashboard {
            today,
            availability: log.availability(),
            regularity: self.regularity(&log),
            calendar: self.annotate(&log, symptom_logs, estimate),
            trends: self.trends(&log),
            recent_symptoms: symptoms::recent_symptoms(
                symptom_logs,
                self.config.recent_symptom_limit,
            ),
            stats,
            prediction,
            phase,
            issues,
        }
    }
}

fn phase_for(
    window: &PredictionWindow,
    log: &PeriodLog,
    estimate: Option<&PredictionEstimate>,
    avg_cycle_length: Measurement<f64>,
) -> CyclePhase {
    match (
        window.current_cycle_day,
        prediction::effective_cycle_length(log, estimate, avg_cycle_length),
    ) {
        (DayCount::Known(day), Some(len)) => phase::classify(day, len),
        _ => CyclePhase::Unknown,
    }
}
