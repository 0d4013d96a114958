//! Checked manual edits on a generated rota.

use super::{can_fill_role, constraints, determine_optimal_role, util, SchedError};
use crate::model::{Assignment, Role, Rota, ShiftId, Staff, StaffId};
use chrono::{DateTime, Utc};

fn shift_index(rota: &Rota, shift_id: &ShiftId) -> Result<usize, SchedError> {
    util::find_shift_index(&rota.shifts, shift_id)
        .ok_or_else(|| SchedError::UnknownShift(shift_id.as_str().to_string()))
}

fn rejected(staff: &Staff, shift_id: &ShiftId, reason: String) -> SchedError {
    SchedError::AssignmentRejected {
        staff: staff.id.as_str().to_string(),
        shift: shift_id.as_str().to_string(),
        reason,
    }
}

/// Recomputes status from scratch, clearing any `Conflict`.
fn settle(rota: &mut Rota, pos: usize, by: &str, at: DateTime<Utc>) {
    let shift = &mut rota.shifts[pos];
    shift.status = shift.derived_status();
    rota.touch(by, at);
}

/// Adds `staff` to the shift as `role` (their best matching role when `None`).
/// The role must be one they hold.
pub fn assign_staff(
    rota: &mut Rota,
    shift_id: &ShiftId,
    staff: &Staff,
    role: Option<Role>,
    by: &str,
    at: DateTime<Utc>,
) -> Result<(), SchedError> {
    let pos = shift_index(rota, shift_id)?;
    let shift = &rota.shifts[pos];
    if shift.has_staff(&staff.id) {
        return Err(rejected(staff, shift_id, "already assigned".to_string()));
    }
    let violations = constraints::check_constraints(staff, shift, rota);
    if !violations.is_empty() {
        let reason = violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(rejected(staff, shift_id, reason));
    }

    let role = role.unwrap_or_else(|| determine_optimal_role(staff, shift));
    if !can_fill_role(staff, shift, &role) {
        return Err(rejected(staff, shift_id, format!("does not hold the {role} role")));
    }
    rota.shifts[pos].assigned_staff.push(Assignment {
        user_id: staff.id.clone(),
        role,
        assigned_at: at,
        assigned_by: by.to_string(),
    });
    settle(rota, pos, by, at);
    Ok(())
}

pub fn unassign_staff(
    rota: &mut Rota,
    shift_id: &ShiftId,
    staff_id: &StaffId,
    by: &str,
    at: DateTime<Utc>,
) -> Result<(), SchedError> {
    let pos = shift_index(rota, shift_id)?;
    let shift = &mut rota.shifts[pos];
    let before = shift.assigned_staff.len();
    shift.assigned_staff.retain(|a| &a.user_id != staff_id);
    if shift.assigned_staff.len() == before {
        return Err(SchedError::UnknownStaff(staff_id.as_str().to_string()));
    }
    settle(rota, pos, by, at);
    Ok(())
}

/// Hands `from`'s place on the shift to `to`. The rota is left untouched on error.
pub fn swap_staff(
    rota: &mut Rota,
    shift_id: &ShiftId,
    from: &StaffId,
    to: &Staff,
    by: &str,
    at: DateTime<Utc>,
) -> Result<(), SchedError> {
    let pos = shift_index(rota, shift_id)?;
    let Some(slot) = rota.shifts[pos]
        .assigned_staff
        .iter()
        .position(|a| &a.user_id == from)
    else {
        return Err(SchedError::UnknownStaff(from.as_str().to_string()));
    };
    if rota.shifts[pos].has_staff(&to.id) {
        return Err(rejected(to, shift_id, "already assigned".to_string()));
    }

    let previous = rota.shifts[pos].assigned_staff.remove(slot);
    let violations = constraints::check_constraints(to, &rota.shifts[pos], rota);
    if !violations.is_empty() {
        rota.shifts[pos].assigned_staff.insert(slot, previous);
        let reason = violations
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        return Err(rejected(to, shift_id, reason));
    }

    let role = if to.has_role(&previous.role) {
        previous.role
    } else {
        determine_optimal_role(to, &rota.shifts[pos])
    };
    rota.shifts[pos].assigned_staff.insert(
        slot,
        Assignment {
            user_id: to.id.clone(),
            role,
            assigned_at: at,
            assigned_by: by.to_string(),
        },
    );
    settle(rota, pos, by, at);
    Ok(())
}
