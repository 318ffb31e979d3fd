use std::ops::RangeInclusive;

use crate::models::CyclePhase;

const MENSTRUAL_DAYS: i64 = 5;
const OVULATION_DAYS: i64 = 3;

/// Day ranges of each phase for one cycle length. Ranges may be empty for
/// very short cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseBands {
    pub length: i64,
    pub menstrual: RangeInclusive<i64>,
    pub follicular: RangeInclusive<i64>,
    pub ovulation: RangeInclusive<i64>,
    pub luteal: RangeInclusive<i64>,
}

impl PhaseBands {
    /// `None` when `cycle_length` cannot describe a cycle of at least one day.
    pub fn new(cycle_length: f64) -> Option<Self> {
        let length = whole_length(cycle_length)?;
        let half = length / 2;
        Some(Self {
            length,
            menstrual: 1..=MENSTRUAL_DAYS.min(length),
            follicular: MENSTRUAL_DAYS + 1..=half,
            ovulation: half + 1..=half + OVULATION_DAYS,
            luteal: half + OVULATION_DAYS + 1..=length,
        })
    }

    pub fn range_of(&self, phase: CyclePhase) -> Option<RangeInclusive<i64>> {
        match phase {
            CyclePhase::Menstrual => Some(self.menstrual.clone()),
            CyclePhase::Follicular => Some(self.follicular.clone()),
            CyclePhase::Ovulation => Some(self.ovulation.clone()),
            CyclePhase::Luteal => Some(self.luteal.clone()),
            CyclePhase::Unknown => None,
        }
    }

    /// Phase of an already-normalized day, first matching band wins.
    fn phase_of(&self, day: i64) -> CyclePhase {
        [
            (CyclePhase::Menstrual, &self.menstrual),
            (CyclePhase::Follicular, &self.follicular),
            (CyclePhase::Ovulation, &self.ovulation),
            (CyclePhase::Luteal, &self.luteal),
        ]
        .into_iter()
        .find(|(_, range)| range.contains(&day))
        .map_or(CyclePhase::Unknown, |(phase, _)| phase)
    }
}

fn whole_length(cycle_length: f64) -> Option<i64> {
    if !cycle_length.is_finite() || cycle_length < 1.0 {
        return None;
    }
    Some(cycle_length.floor() as i64)
}

/// Wrap a cycle day that ran past the cycle length back into `1..=length`.
pub fn normalize_cycle_day(cycle_day: i64, cycle_length: f64) -> Option<i64> {
    let length = whole_length(cycle_length)?;
    if cycle_day <= 0 {
        return None;
    }
    if cycle_day > length {
        Some((cycle_day - 1).rem_euclid(length) + 1)
    } else {
        Some(cycle_day)
    }
}

pub fn classify(cycle_day: i64, cycle_length: f64) -> CyclePhase {
    let (Some(bands), Some(day)) = (
        PhaseBands::new(cycle_length),
        normalize_cycle_day(cycle_day, cycle_length),
    ) else {
        return CyclePhase::Unknown;
    };
    bands.phase_of(day)
}
