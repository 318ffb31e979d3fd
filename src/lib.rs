//! Cycle analytics for a period tracker: statistics, phase, prediction
//! display, calendar tags and chart series derived from logged periods and
//! symptoms.

pub mod calendar;
pub mod commands;
pub mod config;
pub mod dates;
pub mod engine;
pub mod models;
pub mod phase;
pub mod prediction;
pub mod records;
pub mod stats;
pub mod storage;
pub mod symptoms;
pub mod trends;
pub mod validation;

pub use config::{EngineConfig, LapsePolicy, Settings};
pub use engine::CycleEngine;
pub use models::*;
pub use validation::{validate, PeriodLog};
