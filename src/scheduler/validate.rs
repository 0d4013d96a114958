use super::{can_fill_role, constraints, util};
use crate::model::{Rota, Shift, ShiftId, Staff, StaffId};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationKind {
    MissingRole,
    Unavailable,
    OverHours,
    RestPeriod,
    ConsecutiveDays,
    UnknownStaff,
    Overlap,
    RoleNotHeld,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotaValidationError {
    #[serde(rename = "type")]
    pub kind: ValidationKind,
    pub message: String,
    pub severity: Severity,
    pub shift_id: ShiftId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staff_id: Option<StaffId>,
}

impl RotaValidationError {
    fn error(kind: ValidationKind, shift: &Shift, staff: Option<&StaffId>, message: String) -> Self {
        Self {
            kind,
            message,
            severity: Severity::Error,
            shift_id: shift.id.clone(),
            staff_id: staff.cloned(),
        }
    }
}

/// Checks a finished rota against the hard constraints. Never mutates it.
pub fn validate_rota(rota: &Rota, staff: &[Staff]) -> Vec<RotaValidationError> {
    let rules = &rota.configuration.staffing_rules;
    let by_id: HashMap<&StaffId, &Staff> = staff.iter().map(|s| (&s.id, s)).collect();
    let mut out = Vec::new();

    for shift in &rota.shifts {
        for slot in shift.open_slots() {
            let needed = slot
                .role
                .as_ref()
                .map_or_else(|| "staff".to_string(), |r| r.to_string());
            out.push(RotaValidationError::error(
                ValidationKind::MissingRole,
                shift,
                None,
                format!(
                    "{} {} on {} needs {} more {needed}",
                    shift.shift_type.as_str(),
                    shift.time,
                    shift.date,
                    slot.remaining
                ),
            ));
        }

        for assignment in &shift.assigned_staff {
            let Some(member) = by_id.get(&assignment.user_id) else {
                out.push(RotaValidationError::error(
                    ValidationKind::UnknownStaff,
                    shift,
                    Some(&assignment.user_id),
                    format!("{} is not on the staff roster", assignment.user_id),
                ));
                continue;
            };
            if !constraints::is_staff_available(member, shift) {
                out.push(RotaValidationError::error(
                    ValidationKind::Unavailable,
                    shift,
                    Some(&member.id),
                    format!("{} is unavailable on {}", member.name, shift.date),
                ));
            }
            if !can_fill_role(member, shift, &assignment.role) {
                out.push(RotaValidationError::error(
                    ValidationKind::RoleNotHeld,
                    shift,
                    Some(&member.id),
                    format!(
                        "{} is booked as {} without holding that role",
                        member.name, assignment.role
                    ),
                ));
            }
        }
    }

    for member in staff {
        let mut shifts: Vec<&Shift> = rota.shifts_for(&member.id).collect();
        shifts.sort_by_key(|s| s.start_at());

        for (idx, shift) in shifts.iter().enumerate() {
            let worked: f64 = shifts[..=idx]
                .iter()
                .filter(|s| rules.hours_window.contains(shift.date, s.date))
                .map(|s| s.hours())
                .sum();
            if worked > member.contracted_hours + 1e-9 {
                out.push(RotaValidationError::error(
                    ValidationKind::OverHours,
                    shift,
                    Some(&member.id),
                    format!(
                        "{} reaches {worked:.1}h against {:.1} contracted hours",
                        member.name, member.contracted_hours
                    ),
                ));
            }

            for earlier in &shifts[..idx] {
                let Some(rest) = util::rest_between(earlier, shift) else {
                    out.push(RotaValidationError::error(
                        ValidationKind::Overlap,
                        shift,
                        Some(&member.id),
                        format!(
                            "{} is double-booked: {} on {} overlaps {} on {}",
                            member.name, shift.time, shift.date, earlier.time, earlier.date
                        ),
                    ));
                    continue;
                };
                if rest + 1e-9 < rules.min_rest_between_shifts {
                    out.push(RotaValidationError {
                        kind: ValidationKind::RestPeriod,
                        message: format!(
                            "{} has {rest:.1}h rest before {} on {} (minimum {:.1}h)",
                            member.name, shift.time, shift.date, rules.min_rest_between_shifts
                        ),
                        severity: Severity::Warning,
                        shift_id: shift.id.clone(),
                        staff_id: Some(member.id.clone()),
                    });
                }
            }
        }

        let days: BTreeSet<NaiveDate> = shifts.iter().map(|s| s.date).collect();
        let mut reported = BTreeSet::new();
        for shift in &shifts {
            if !reported.insert(shift.date) {
                continue;
            }
            let run = run_ending_on(&days, shift.date);
            if run > rules.max_consecutive_days {
                out.push(RotaValidationError::error(
                    ValidationKind::ConsecutiveDays,
                    shift,
                    Some(&member.id),
                    format!(
                        "{} works {run} consecutive days up to {} (max {})",
                        member.name, shift.date, rules.max_consecutive_days
                    ),
                ));
            }
        }
    }

    out
}

/// Consecutive worked days ending on `date` (inclusive).
fn run_ending_on(days: &BTreeSet<NaiveDate>, date: NaiveDate) -> u32 {
    let mut run = 0;
    let mut day = Some(date);
    while let Some(d) = day.filter(|d| days.contains(d)) {
        run += 1;
        day = d.pred_opt();
    }
    run
}
