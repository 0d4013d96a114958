use crate::model::{Rota, ShiftStatus, Staff, StaffId};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Rota-level reporting metrics. Percentages are on `0..=100`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotaStats {
    pub total_shifts: usize,
    pub filled_shifts: usize,
    pub partially_staffed_shifts: usize,
    pub unfilled_shifts: usize,
    pub conflict_shifts: usize,
    pub fill_rate: f64,
    pub total_assignments: usize,
    pub role_distribution: BTreeMap<String, usize>,
    pub staff_hours: BTreeMap<StaffId, f64>,
    pub staff_utilization: BTreeMap<StaffId, f64>,
    pub role_gaps: BTreeMap<String, u32>,
    pub preference_match_rate: f64,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

pub fn generate_rota_stats(rota: &Rota, staff: &[Staff]) -> RotaStats {
    let by_id: HashMap<&StaffId, &Staff> = staff.iter().map(|s| (&s.id, s)).collect();

    let count = |status: ShiftStatus| rota.shifts.iter().filter(|s| s.status == status).count();
    let total_shifts = rota.shifts.len();
    let filled_shifts = count(ShiftStatus::FullyStaffed);

    let mut role_distribution = BTreeMap::new();
    let mut role_gaps = BTreeMap::new();
    let mut staff_hours: BTreeMap<StaffId, f64> =
        staff.iter().map(|s| (s.id.clone(), 0.0)).collect();
    let mut total_assignments = 0;
    let mut preference_matches = 0;

    for shift in &rota.shifts {
        let hours = shift.hours();
        for assignment in &shift.assigned_staff {
            total_assignments += 1;
            *role_distribution
                .entry(assignment.role.to_string())
                .or_insert(0) += 1;
            *staff_hours.entry(assignment.user_id.clone()).or_insert(0.0) += hours;
            if by_id
                .get(&assignment.user_id)
                .is_some_and(|member| member.prefers(shift))
            {
                preference_matches += 1;
            }
        }
        for slot in shift.open_slots() {
            let role = slot
                .role
                .map_or_else(|| "Any".to_string(), |r| r.to_string());
            *role_gaps.entry(role).or_insert(0) += slot.remaining;
        }
    }

    let staff_utilization = staff
        .iter()
        .map(|s| {
            let worked = staff_hours.get(&s.id).copied().unwrap_or(0.0);
            let utilization = if s.contracted_hours > 0.0 {
                worked * 100.0 / s.contracted_hours
            } else {
                0.0
            };
            (s.id.clone(), utilization)
        })
        .collect();

    RotaStats {
        total_shifts,
        filled_shifts,
        partially_staffed_shifts: count(ShiftStatus::PartiallyStaffed),
        unfilled_shifts: count(ShiftStatus::Unfilled),
        conflict_shifts: count(ShiftStatus::Conflict),
        fill_rate: percent(filled_shifts, total_shifts),
        total_assignments,
        role_distribution,
        staff_hours,
        staff_utilization,
        role_gaps,
        preference_match_rate: percent(preference_matches, total_assignments),
    }
}
