mod assignment;
pub mod constraints;
mod mutate;
mod types;
mod util;
mod validate;

pub use assignment::{can_fill_role, determine_optimal_role, shift_priority};
pub use constraints::{
    can_assign_staff, check_constraints, exceeds_consecutive_days, exceeds_working_hours,
    has_adequate_rest, has_required_role, is_staff_available, overlapping_shift,
    ConstraintViolation,
};
pub use mutate::{assign_staff, swap_staff, unassign_staff};
pub use types::{OptimizationPriority, SchedError, SchedulerOptions, StepOutcome};
pub use validate::{validate_rota, RotaValidationError, Severity, ValidationKind};

use crate::config::RotaConfiguration;
use crate::model::{Rota, Shift, ShiftId, Staff};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

/// Scheduler: owns the rota being generated; staff and options are borrowed.
#[derive(Debug)]
pub struct Scheduler<'a> {
    rota: Rota,
    staff: &'a [Staff],
    options: &'a SchedulerOptions,
    index: HashMap<ShiftId, usize>,
    exhausted: HashSet<ShiftId>,
    iterations: u32,
    now: DateTime<Utc>,
}

impl<'a> Scheduler<'a> {
    /// Validates the inputs and lays out the unfilled shifts for `[start, end]`.
    pub fn new(
        start: NaiveDate,
        end: NaiveDate,
        staff: &'a [Staff],
        configuration: &RotaConfiguration,
        options: &'a SchedulerOptions,
    ) -> Result<Self, SchedError> {
        if end < start {
            return Err(SchedError::InvalidDateRange { start, end });
        }
        if configuration.shift_patterns.is_empty() {
            return Err(SchedError::NoShiftPatterns);
        }
        if options.max_iterations == 0 {
            return Err(SchedError::InvalidMaxIterations);
        }
        configuration.validate()?;

        let now = options
            .reference_time
            .unwrap_or_else(|| Utc.from_utc_datetime(&start.and_time(NaiveTime::MIN)));
        let mut rota = Rota::new(
            start,
            end,
            configuration.clone(),
            &options.generated_by,
            now,
        );
        rota.shifts = configuration.build_shifts(start, end)?;
        let index = rota
            .shifts
            .iter()
            .enumerate()
            .map(|(idx, s)| (s.id.clone(), idx))
            .collect();

        Ok(Self {
            rota,
            staff,
            options,
            index,
            exhausted: HashSet::new(),
            iterations: 0,
            now,
        })
    }

    pub fn rota(&self) -> &Rota {
        &self.rota
    }

    pub fn shift(&self, id: &ShiftId) -> Option<&Shift> {
        self.index.get(id).map(|&idx| &self.rota.shifts[idx])
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Fills one slot of the most urgent shift. The iteration cap is enforced by `run`.
    pub fn step(&mut self) -> StepOutcome {
        assignment::step(self)
    }

    /// Steps until every shift is resolved or `maxIterations` is spent.
    pub fn run(mut self) -> Rota {
        info!(
            rota = %self.rota.id.as_str(),
            shifts = self.rota.shifts.len(),
            staff = self.staff.len(),
            "generating rota"
        );
        while self.iterations < self.options.max_iterations {
            if self.step() == StepOutcome::Converged {
                break;
            }
        }
        let converged = assignment::next_shift(&self).is_none();
        if !converged {
            warn!(
                max_iterations = self.options.max_iterations,
                "iteration cap reached before every shift was resolved"
            );
        }
        info!(
            rota = %self.rota.id.as_str(),
            iterations = self.iterations,
            converged,
            "rota generated"
        );
        self.rota
    }
}

/// Generates a rota for `[start, end]` from the configuration's shift patterns.
pub fn generate_rota(
    start: NaiveDate,
    end: NaiveDate,
    staff: &[Staff],
    configuration: &RotaConfiguration,
    options: &SchedulerOptions,
) -> Result<Rota, SchedError> {
    Ok(Scheduler::new(start, end, staff, configuration, options)?.run())
}
