//! Weight and Step MCP Tools

use chrono::NaiveDate;
use serde::Serialize;

use super::error_message;
use crate::models::FieldInput;
use crate::store::KeyValueStore;
use crate::tracker::Tracker;

/// Response for log_weight
#[derive(Debug, Serialize)]
pub struct LogWeightResponse {
    pub date: String,
    pub weight: f64,
    /// The value this one replaced, if any
    pub previous: Option<f64>,
}

/// Response for log_steps
#[derive(Debug, Serialize)]
pub struct LogStepsResponse {
    pub date: String,
    pub steps: u64,
    pub previous: Option<u64>,
}

pub fn log_weight<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    date: NaiveDate,
    weight: FieldInput,
) -> Result<LogWeightResponse, String> {
    let previous = tracker.weight_history().get(&date).copied();
    let weight = tracker.log_weight(date, weight).map_err(error_message)?;
    Ok(LogWeightResponse { date: date.to_string(), weight, previous })
}

pub fn log_steps<S: KeyValueStore>(
    tracker: &mut Tracker<S>,
    date: NaiveDate,
    steps: FieldInput,
) -> Result<LogStepsResponse, String> {
    let previous = tracker.step_history().get(&date).copied();
    let steps = tracker.log_steps(date, steps).map_err(error_message)?;
    Ok(LogStepsResponse { date: date.to_string(), steps, previous })
}
