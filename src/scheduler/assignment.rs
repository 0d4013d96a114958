use super::{Scheduler, StepOutcome};
use crate::model::{Assignment, OpenSlot, Role, Shift, ShiftStatus, Staff};
use crate::suggestions::{rank_candidates, SuggestionMode};
use chrono::NaiveDate;
use tracing::{debug, warn};

/// Urgency bonus for a shift starting today; decays by 2 per day to 0 at a week.
const MAX_URGENCY_BONUS: i64 = 14;
const URGENCY_WINDOW_DAYS: i64 = 7;

/// First of the staff's roles the shift asks for, else Care Staff.
pub fn determine_optimal_role(staff: &Staff, shift: &Shift) -> Role {
    staff
        .roles
        .iter()
        .find(|role| shift.requires_role(role))
        .cloned()
        .unwrap_or(Role::CareStaff)
}

/// Whether `staff` may be booked on the shift as `role`: a role they hold, or
/// the Care Staff fallback when none of their roles is requested.
pub fn can_fill_role(staff: &Staff, shift: &Shift, role: &Role) -> bool {
    staff.has_role(role) || *role == determine_optimal_role(staff, shift)
}

/// Role scarcity of the still-open slots plus an urgency bonus relative to `today`.
pub fn shift_priority(shift: &Shift, today: NaiveDate) -> u32 {
    let scarcity: u32 = shift
        .open_slots()
        .iter()
        .map(|slot| slot.role.as_ref().map_or(1, Role::scarcity_weight) * slot.remaining)
        .sum();
    let days_ahead = (shift.date - today).num_days().max(0);
    let urgency = if days_ahead < URGENCY_WINDOW_DAYS {
        MAX_URGENCY_BONUS * (URGENCY_WINDOW_DAYS - days_ahead) / URGENCY_WINDOW_DAYS
    } else {
        0
    };
    scarcity + urgency as u32
}

pub(super) fn step(scheduler: &mut Scheduler<'_>) -> StepOutcome {
    let Some(pos) = next_shift(scheduler) else {
        return StepOutcome::Converged;
    };
    scheduler.iterations += 1;

    let shift = scheduler.rota.shifts[pos].clone();
    let mut slots: Vec<OpenSlot> = shift.open_slots();
    if slots.is_empty() {
        scheduler.rota.shifts[pos].refresh_status();
        scheduler.exhausted.insert(shift.id.clone());
        return StepOutcome::Exhausted { shift: shift.id };
    }
    // Shift Leader slots go first; the sort is stable for the rest.
    slots.sort_by_key(|slot| slot.role != Some(Role::ShiftLeader));

    let staff = scheduler.staff;
    let ranked = rank_candidates(
        &shift,
        staff,
        &scheduler.rota,
        scheduler.options,
        SuggestionMode::Eligible,
    );

    let chosen = slots.iter().find_map(|slot| {
        ranked
            .iter()
            .find(|c| slot.role.as_ref().map_or(true, |role| c.staff.has_role(role)))
            .map(|c| {
                let role = slot
                    .role
                    .clone()
                    .unwrap_or_else(|| determine_optimal_role(c.staff, &shift));
                (c, role)
            })
    });

    match chosen {
        Some((candidate, role)) => {
            let staff_id = candidate.staff.id.clone();
            debug!(
                shift = %shift.id,
                staff = %staff_id,
                role = %role,
                score = candidate.score.score,
                "assigned"
            );
            let target = &mut scheduler.rota.shifts[pos];
            target.assigned_staff.push(Assignment {
                user_id: staff_id.clone(),
                role,
                assigned_at: scheduler.now,
                assigned_by: scheduler.options.generated_by.clone(),
            });
            target.refresh_status();
            StepOutcome::Assigned {
                shift: shift.id,
                staff: staff_id,
            }
        }
        None if !scheduler.options.allow_partial_fill => {
            warn!(shift = %shift.id, date = %shift.date, time = %shift.time, "no eligible staff, marking conflict");
            scheduler.rota.shifts[pos].status = ShiftStatus::Conflict;
            StepOutcome::Conflict { shift: shift.id }
        }
        None => {
            debug!(shift = %shift.id, "no eligible staff, leaving partially filled");
            scheduler.exhausted.insert(shift.id.clone());
            StepOutcome::Exhausted { shift: shift.id }
        }
    }
}

/// Highest-priority shift still needing staff; ties go to the earliest.
pub(super) fn next_shift(scheduler: &Scheduler<'_>) -> Option<usize> {
    let today = scheduler.now.date_naive();
    let mut best: Option<(usize, u32)> = None;
    for (idx, shift) in scheduler.rota.shifts.iter().enumerate() {
        let open = matches!(
            shift.status,
            ShiftStatus::Unfilled | ShiftStatus::PartiallyStaffed
        );
        if !open || scheduler.exhausted.contains(&shift.id) {
            continue;
        }
        let priority = shift_priority(shift, today);
        if best.map_or(true, |(_, top)| priority > top) {
            best = Some((idx, priority));
        }
    }
    best.map(|(idx, _)| idx)
}
