use chrono::NaiveDate;

use crate::config::LapsePolicy;
use crate::dates;
use crate::models::{DayCount, Measurement, PredictionEstimate, PredictionWindow};
use crate::phase;
use crate::validation::PeriodLog;

/// 1-based day of the current cycle, counted from the latest logged start.
/// `Unknown` with no history or when the latest start is after `today`.
pub fn raw_cycle_day(log: &PeriodLog, today: NaiveDate) -> DayCount {
    log.latest()
        .map(|latest| dates::days_between(latest.start_date, today) + 1)
        .filter(|day| *day > 0)
        .into()
}

/// Cycle length used to wrap overdue cycle days: the measured average when
/// there is one, otherwise the length the predictor itself implied.
pub fn effective_cycle_length(
    log: &PeriodLog,
    estimate: Option<&PredictionEstimate>,
    avg_cycle_length: Measurement<f64>,
) -> Option<f64> {
    if let Measurement::Known(avg) = avg_cycle_length {
        return Some(avg).filter(|len| *len >= 1.0);
    }
    let (latest, estimate) = (log.latest()?, estimate?);
    let implied = dates::days_between(latest.start_date, estimate.next_period_start);
    (implied >= 1).then_some(implied as f64)
}

/// Map the external estimate onto a countdown, cycle day and progress
/// fraction for display.
pub fn project(
    estimate: Option<&PredictionEstimate>,
    today: NaiveDate,
    log: &PeriodLog,
    avg_cycle_length: Measurement<f64>,
    policy: LapsePolicy,
) -> PredictionWindow {
    let days_remaining: DayCount = estimate
        .map(|e| dates::days_between(today, e.next_period_start))
        .into();
    let lapsed = matches!(days_remaining, DayCount::Known(d) if d < 0);
    let cycle_length = effective_cycle_length(log, estimate, avg_cycle_length);

    let mut current_cycle_day = raw_cycle_day(log, today);
    if lapsed {
        if let (LapsePolicy::PredictedStart, Some(e)) = (policy, estimate) {
            current_cycle_day = DayCount::Known(dates::days_between(e.next_period_start, today) + 1);
        }
        if let (DayCount::Known(day), Some(len)) = (current_cycle_day, cycle_length) {
            current_cycle_day = phase::normalize_cycle_day(day, len).into();
        }
    }

    let progress = match estimate.and_then(|e| e.cycle_progress) {
        Some(p) if p.is_finite() => Some(p.clamp(0.0, 100.0)),
        _ => match (current_cycle_day, cycle_length) {
            (DayCount::Known(day), Some(len)) => Some((day as f64 / len * 100.0).clamp(0.0, 100.0)),
            _ => None,
        },
    };

    tracing::debug!(
        %days_remaining,
        %current_cycle_day,
        lapsed,
        "projected prediction window"
    );

    PredictionWindow {
        next_period_start: estimate.map(|e| e.next_period_start),
        next_period_end: estimate.map(|e| e.next_period_end),
        days_remaining,
        current_cycle_day,
        lapsed,
        progress,
    }
}
