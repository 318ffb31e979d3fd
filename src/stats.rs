use crate::config::EngineConfig;
use crate::models::{CycleStats, Measurement, Regularity, SymptomLogEntry};
use crate::symptoms;
use crate::validation::PeriodLog;

/// Compute the summary-card statistics.
pub fn cycle_stats(log: &PeriodLog, symptom_logs: &[SymptomLogEntry]) -> CycleStats {
    let cycle_lengths = log.cycle_lengths();
    let cycle_samples: Vec<f64> = cycle_lengths.iter().map(|&d| d as f64).collect();

    // Entries without a usable length are skipped, not counted as zero.
    let period_samples: Vec<f64> = log
        .entries()
        .iter()
        .filter_map(|e| e.period_length)
        .map(|d| d as f64)
        .collect();

    let last = log.latest();

    CycleStats {
        availability: log.availability(),
        total_cycles: log.len(),
        avg_cycle_length: Measurement::mean(&cycle_samples),
        avg_period_length: Measurement::mean(&period_samples),
        total_symptoms_logged: symptoms::merge_by_date(symptom_logs).len(),
        shortest_cycle: cycle_lengths.iter().copied().min(),
        longest_cycle: cycle_lengths.iter().copied().max(),
        last_period_start: last.map(|e| e.start_date),
        last_period_end: last.map(|e| e.end_date),
    }
}

/// Regular when the latest cycle sits inside the configured bounds and the
/// recent cycles do not vary too much.
pub fn regularity(log: &PeriodLog, config: &EngineConfig) -> Regularity {
    let cycle_lengths = log.cycle_lengths();
    let Some(&last_cycle_length) = cycle_lengths.last() else {
        return Regularity::InsufficientData;
    };

    let skip = cycle_lengths.len().saturating_sub(config.variation_window);
    let recent: Vec<f64> = cycle_lengths[skip..].iter().map(|&d| d as f64).collect();
    let std_dev = population_std_dev(&recent);

    let in_range =
        (config.regular_min_days..=config.regular_max_days).contains(&last_cycle_length);
    if in_range && std_dev < config.max_std_dev {
        Regularity::Regular {
            last_cycle_length,
            std_dev,
        }
    } else {
        Regularity::Irregular {
            last_cycle_length,
            std_dev,
        }
    }
}

fn population_std_dev(values: &[f64]) -> f64 {
    let Measurement::Known(avg) = Measurement::mean(values) else {
        return 0.0;
    };
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
