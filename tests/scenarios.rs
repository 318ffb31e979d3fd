use std::collections::BTreeSet;

use std::path::Path;

use chrono::{Duration, NaiveDate};
use cykel_insights::commands::{self, Report};
use cykel_insights::{
    phase, prediction, storage, validate, CycleEngine, CyclePhase, DayCount, DayTag, LapsePolicy,
    Measurement, PeriodEntry, PredictionEstimate, SymptomLogEntry, TrendPoint,
};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn two_periods() -> Vec<PeriodEntry> {
    vec![
        PeriodEntry::new(date("2025-01-01"), date("2025-01-05")),
        PeriodEntry::new(date("2025-01-29"), date("2025-02-02")),
    ]
}

#[test]
fn twenty_eight_day_scenario() {
    let engine = CycleEngine::default();
    let (log, issues) = validate(&two_periods());
    assert!(issues.is_empty());

    let stats = engine.stats(&log, &[]);
    assert_eq!(stats.avg_cycle_length, Measurement::Known(28.0));
    assert_eq!(stats.avg_period_length, Measurement::Known(5.0));

    let trends = engine.trends(&log);
    assert_eq!(
        trends.cycle_series,
        vec![TrendPoint {
            label: "Jan 29".into(),
            value: Some(28)
        }]
    );
}

#[test]
fn symptom_on_period_day() {
    let engine = CycleEngine::default();
    let (log, _) = validate(&two_periods());
    let symptoms = vec![SymptomLogEntry {
        date: date("2025-01-03"),
        symptoms: BTreeSet::from(["Cramps".to_string()]),
        cycle_day: None,
    }];
    let calendar = engine.annotate(&log, &symptoms, None);
    assert_eq!(
        calendar.tags_on(date("2025-01-03")),
        BTreeSet::from([DayTag::PastPeriod, DayTag::SymptomLogged])
    );
}

#[test]
fn day_thirty_of_twenty_eight_is_menstrual() {
    assert_eq!(phase::classify(30, 28.0), CyclePhase::Menstrual);
}

#[test]
fn lapsed_prediction_normalizes_day() {
    let (log, _) = validate(&two_periods());
    let today = date("2025-02-28");
    let estimate = PredictionEstimate::new(today - Duration::days(3), today + Duration::days(1));

    let window = prediction::project(
        Some(&estimate),
        today,
        &log,
        Measurement::Known(28.0),
        LapsePolicy::LatestEntry,
    );
    assert_eq!(prediction::raw_cycle_day(&log, today), DayCount::Known(31));
    assert_eq!(window.days_remaining, DayCount::Known(-3));
    assert_eq!(window.current_cycle_day, DayCount::Known(3));
}

#[test]
fn single_entry_trends() {
    let (log, _) = validate(&[PeriodEntry::new(date("2025-03-10"), date("2025-03-15"))]);
    let trends = CycleEngine::default().trends(&log);
    assert!(trends.cycle_series.is_empty());
    assert_eq!(
        trends.period_series,
        vec![TrendPoint {
            label: "Mar 10".into(),
            value: Some(6)
        }]
    );
}

#[test]
fn empty_history_never_produces_nan() {
    let engine = CycleEngine::default();
    let (log, _) = validate(&[]);
    let stats = engine.stats(&log, &[]);
    assert_eq!(stats.avg_cycle_length.or_zero(), 0.0);
    assert_eq!(stats.avg_period_length.or_zero(), 0.0);
    let json = serde_json::to_string(&engine.dashboard(&[], &[], None, date("2025-01-01"))).unwrap();
    assert!(!json.contains("NaN"));
}

#[test]
fn past_period_tags_match_ranges_for_a_long_history() {
    let mut start = date("2023-01-03");
    let mut entries = Vec::new();
    for (gap, len) in [(29, 5), (27, 4), (31, 6), (28, 5), (26, 3), (30, 7), (28, 5)] {
        entries.push(PeriodEntry::new(start, start + Duration::days(len - 1)));
        start += Duration::days(gap);
    }
    let (log, issues) = validate(&entries);
    assert!(issues.is_empty());

    let calendar = CycleEngine::default().annotate(&log, &[], None);
    let expected: BTreeSet<NaiveDate> = entries.iter().flat_map(|e| e.days()).collect();
    assert_eq!(calendar.dates_tagged(DayTag::PastPeriod), expected);
    assert_eq!(expected.len(), 35);
    for entry in &entries {
        assert_eq!(entry.span_days(), entry.period_length);
    }
}

#[test]
fn bundled_demo_snapshot_renders_a_dashboard() {
    let path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/demos/snapshot.json"));
    let snapshot = storage::load(path).unwrap();
    let inputs = commands::ingest(snapshot, true).unwrap();
    assert_eq!(inputs.entries.len(), 3);

    let out = commands::run(
        &Report::Dashboard,
        &inputs,
        date("2025-03-10"),
        &CycleEngine::default(),
    )
    .unwrap();
    let dashboard: serde_json::Value = serde_json::from_str(&out).unwrap();

    assert_eq!(dashboard["availability"], "multi_entry");
    assert_eq!(dashboard["stats"]["avg_cycle_length"]["value"], 28.0);
    assert_eq!(dashboard["prediction"]["days_remaining"]["value"], 16);
    assert_eq!(dashboard["prediction"]["current_cycle_day"]["value"], 13);
    assert_eq!(dashboard["phase"], "follicular");
    assert_eq!(
        dashboard["calendar"]["2025-02-27"]["tags"],
        serde_json::json!(["past-period", "symptom-logged"])
    );
    assert!(dashboard["calendar"].get("2025-03-12").is_none());
    assert_eq!(dashboard["issues"], serde_json::json!([]));
}
