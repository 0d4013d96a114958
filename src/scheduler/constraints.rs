//! Hard constraints on placing a staff member on a shift.
//!
//! Every checker reads the staffing rules from the rota being built and
//! ignores the shift itself when it looks at the staff's other assignments.

use super::util;
use crate::model::{Rota, Shift, ShiftId, Staff};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::fmt;

const HOURS_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintViolation {
    Unavailable,
    MissingRole,
    /// Already booked on a shift overlapping this one.
    DoubleBooked { shift: ShiftId },
    InsufficientRest { rest_hours: f64, required: f64 },
    ExceedsHours { total: f64, contracted: f64 },
    TooManyConsecutiveDays { run: u32, max: u32 },
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintViolation::Unavailable => f.write_str("unavailable or on leave"),
            ConstraintViolation::MissingRole => f.write_str("does not hold a required role"),
            ConstraintViolation::DoubleBooked { shift } => {
                write!(f, "already working overlapping shift {shift}")
            }
            ConstraintViolation::InsufficientRest {
                rest_hours,
                required,
            } => write!(f, "only {rest_hours:.1}h rest (needs {required:.1}h)"),
            ConstraintViolation::ExceedsHours { total, contracted } => {
                write!(f, "{total:.1}h would exceed {contracted:.1} contracted hours")
            }
            ConstraintViolation::TooManyConsecutiveDays { run, max } => {
                write!(f, "{run} consecutive days (max {max})")
            }
        }
    }
}

pub fn is_staff_available(staff: &Staff, shift: &Shift) -> bool {
    !staff.is_unavailable_on(shift.date)
}

/// An empty requirement list accepts any role.
pub fn has_required_role(staff: &Staff, shift: &Shift) -> bool {
    shift.required_roles.is_empty()
        || shift.required_roles.iter().any(|r| staff.has_role(&r.role))
}

/// False on any overlap, whatever the minimum rest is.
pub fn has_adequate_rest(staff: &Staff, shift: &Shift, rota: &Rota) -> bool {
    if overlapping_shift(staff, shift, rota).is_some() {
        return false;
    }
    let min_rest = rota.configuration.staffing_rules.min_rest_between_shifts;
    shortest_rest(staff, shift, rota).map_or(true, |rest| rest + HOURS_EPSILON >= min_rest)
}

/// First of the staff's other shifts whose window overlaps this one.
pub fn overlapping_shift<'r>(staff: &Staff, shift: &Shift, rota: &'r Rota) -> Option<&'r Shift> {
    rota.shifts
        .iter()
        .filter(|other| other.id != shift.id && other.has_staff(&staff.id))
        .find(|other| util::rest_between(other, shift).is_none())
}

/// Shortest rest, in hours, between this shift and any other non-overlapping
/// shift of the staff, in either direction.
pub fn shortest_rest(staff: &Staff, shift: &Shift, rota: &Rota) -> Option<f64> {
    rota.shifts_for(&staff.id)
        .filter(|other| other.id != shift.id)
        .filter_map(|other| util::rest_between(other, shift))
        .reduce(f64::min)
}

/// Hours the staff would work in the configured window if given this shift.
pub fn projected_hours(staff: &Staff, shift: &Shift, rota: &Rota) -> f64 {
    let window = rota.configuration.staffing_rules.hours_window;
    let assigned: f64 = rota
        .shifts_for(&staff.id)
        .filter(|other| other.id != shift.id && window.contains(shift.date, other.date))
        .map(Shift::hours)
        .sum();
    assigned + shift.hours()
}

pub fn exceeds_working_hours(staff: &Staff, shift: &Shift, rota: &Rota) -> bool {
    projected_hours(staff, shift, rota) > staff.contracted_hours + HOURS_EPSILON
}

/// Length of the run of worked calendar days through the shift's date.
pub fn consecutive_days_with(staff: &Staff, shift: &Shift, rota: &Rota) -> u32 {
    let worked: BTreeSet<NaiveDate> = rota
        .shifts_for(&staff.id)
        .filter(|other| other.id != shift.id)
        .map(|other| other.date)
        .collect();

    let mut run = 1;
    let mut day = shift.date.pred_opt();
    while let Some(d) = day.filter(|d| worked.contains(d)) {
        run += 1;
        day = d.pred_opt();
    }
    let mut day = shift.date.succ_opt();
    while let Some(d) = day.filter(|d| worked.contains(d)) {
        run += 1;
        day = d.succ_opt();
    }
    run
}

pub fn exceeds_consecutive_days(staff: &Staff, shift: &Shift, rota: &Rota) -> bool {
    consecutive_days_with(staff, shift, rota) > rota.configuration.staffing_rules.max_consecutive_days
}

pub fn can_assign_staff(staff: &Staff, shift: &Shift, rota: &Rota) -> bool {
    is_staff_available(staff, shift)
        && has_required_role(staff, shift)
        && has_adequate_rest(staff, shift, rota)
        && !exceeds_working_hours(staff, shift, rota)
        && !exceeds_consecutive_days(staff, shift, rota)
}

/// Every constraint the assignment would break; empty iff `can_assign_staff`.
pub fn check_constraints(staff: &Staff, shift: &Shift, rota: &Rota) -> Vec<ConstraintViolation> {
    let rules = &rota.configuration.staffing_rules;
    let mut out = Vec::new();

    if !is_staff_available(staff, shift) {
        out.push(ConstraintViolation::Unavailable);
    }
    if !has_required_role(staff, shift) {
        out.push(ConstraintViolation::MissingRole);
    }
    if let Some(other) = overlapping_shift(staff, shift, rota) {
        out.push(ConstraintViolation::DoubleBooked {
            shift: other.id.clone(),
        });
    } else if !has_adequate_rest(staff, shift, rota) {
        out.push(ConstraintViolation::InsufficientRest {
            rest_hours: shortest_rest(staff, shift, rota).unwrap_or(0.0),
            required: rules.min_rest_between_shifts,
        });
    }
    if exceeds_working_hours(staff, shift, rota) {
        out.push(ConstraintViolation::ExceedsHours {
            total: projected_hours(staff, shift, rota),
            contracted: staff.contracted_hours,
        });
    }
    if exceeds_consecutive_days(staff, shift, rota) {
        out.push(ConstraintViolation::TooManyConsecutiveDays {
            run: consecutive_days_with(staff, shift, rota),
            max: rules.max_consecutive_days,
        });
    }
    out
}
