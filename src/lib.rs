#![forbid(unsafe_code)]
//! Rota engine: constraint-based auto-scheduling of care-home staff onto shifts.
//!
//! - Pure, synchronous, in-memory: the caller supplies staff, configuration and options.
//! - Hard constraints (availability, role, rest, contracted hours, consecutive days).
//! - Weighted multi-factor scoring, ranked suggestions, iterative fill loop.
//! - Post-hoc validation and statistics; understaffing is data, never an error.

pub mod config;
pub mod model;
pub mod scheduler;
pub mod scoring;
pub mod stats;
pub mod suggestions;
pub mod time;

pub use config::{HoursWindow, RotaConfiguration, ShiftPattern, StaffingRules};
pub use model::{
    Assignment, LeavePeriod, LeaveStatus, PerformanceMetrics, Role, RoleRequirement, Rota, RotaId,
    RotaStatus, Shift, ShiftId, ShiftStatus, ShiftType, Staff, StaffId, StaffPreferences,
    TrainingCategory, TrainingModule,
};
pub use scheduler::{
    assign_staff, can_assign_staff, generate_rota, swap_staff, unassign_staff, validate_rota,
    OptimizationPriority, RotaValidationError, SchedError, Scheduler, SchedulerOptions, Severity,
    StepOutcome, ValidationKind,
};
pub use scoring::{score_candidate, CandidateScore, ScoringWeights};
pub use stats::{generate_rota_stats, RotaStats};
pub use suggestions::{
    generate_shift_suggestions, suggest_staff, ShiftSuggestions, StaffSuggestion, SuggestionMode,
};
pub use time::{calculate_shift_hours, parse_shift_time, ShiftTime};
