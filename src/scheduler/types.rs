use crate::model::{ShiftId, StaffId};
use crate::scoring::ScoringWeights;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationPriority {
    #[default]
    Balanced,
    StaffPreference,
    Coverage,
}

/// Options for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerOptions {
    pub optimization_priority: OptimizationPriority,
    pub consider_training_status: bool,
    pub consider_performance_metrics: bool,
    pub allow_partial_fill: bool,
    pub max_iterations: u32,
    /// Clock for urgency and `assignedAt`. Defaults to the rota start at midnight UTC.
    pub reference_time: Option<DateTime<Utc>>,
    pub generated_by: String,
    pub weights: ScoringWeights,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            optimization_priority: OptimizationPriority::Balanced,
            consider_training_status: true,
            consider_performance_metrics: true,
            allow_partial_fill: true,
            max_iterations: 1000,
            reference_time: None,
            generated_by: "ai-scheduler".to_string(),
            weights: ScoringWeights::default(),
        }
    }
}

/// Result of one scheduler iteration
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Assigned { shift: ShiftId, staff: StaffId },
    /// No eligible candidate and partial fill disallowed.
    Conflict { shift: ShiftId },
    /// No eligible candidate; the shift keeps its status and is not retried.
    Exhausted { shift: ShiftId },
    Converged,
}

#[derive(Error, Debug)]
pub enum SchedError {
    #[error("invalid date range: end {end} is before start {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    #[error("configuration has no shift patterns")]
    NoShiftPatterns,
    #[error("maxIterations must be greater than zero")]
    InvalidMaxIterations,
    #[error("invalid time slot: {0}")]
    InvalidTimeSlot(String),
    #[error("unknown shift: {0}")]
    UnknownShift(String),
    #[error("unknown staff: {0}")]
    UnknownStaff(String),
    #[error("cannot assign {staff} to {shift}: {reason}")]
    AssignmentRejected {
        staff: String,
        shift: String,
        reason: String,
    },
    #[error("invalid rota transition from {from} to {to}")]
    InvalidTransition {
        from: &'static str,
        to: &'static str,
    },
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
