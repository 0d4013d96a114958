#![forbid(unsafe_code)]
mod support;

use chrono::{DateTime, TimeZone, Utc};
use rota_engine::scheduler::{check_constraints, ConstraintViolation};
use rota_engine::{
    assign_staff, generate_rota, swap_staff, unassign_staff, LeavePeriod, Role, Rota, RotaStatus,
    SchedError, ShiftId, ShiftStatus, Staff, StaffId,
};
use support::*;

fn edit_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

/// One Monday morning shift needing a Shift Leader and a carer, left in conflict.
fn conflicted(staff: &[Staff]) -> Rota {
    let configuration = config(vec![pattern(
        "7:30-14:30",
        &[(Role::ShiftLeader, 1), (Role::CareStaff, 1)],
    )]);
    generate_rota(monday(), monday(), staff, &configuration, &strict_options()).unwrap()
}

fn only_shift(rota: &Rota) -> ShiftId {
    rota.shifts[0].id.clone()
}

#[test]
fn manual_assignment_clears_conflict() {
    let carl = care_staff("carl");
    let lena = leader("lena");
    let mut rota = conflicted(&[carl.clone()]);
    let id = only_shift(&rota);
    assert_eq!(rota.shifts[0].status, ShiftStatus::Conflict);
    assert!(rota.shifts[0].has_staff(&carl.id));

    assign_staff(&mut rota, &id, &lena, None, "manager", edit_time()).unwrap();

    let shift = &rota.shifts[0];
    assert_eq!(shift.status, ShiftStatus::FullyStaffed);
    let added = &shift.assigned_staff[1];
    assert_eq!(added.user_id, lena.id);
    assert_eq!(added.role, Role::ShiftLeader);
    assert_eq!(added.assigned_by, "manager");
    assert_eq!(added.assigned_at, edit_time());
    assert_eq!(rota.modified_by, "manager");
    assert_eq!(rota.last_modified, edit_time());
}

#[test]
fn manual_assignment_respects_hard_constraints() {
    let carl = care_staff("carl");
    let mut away = leader("away");
    away.leave.push(LeavePeriod::new(monday(), monday()).unwrap());
    let mut rota = conflicted(&[carl.clone()]);
    let id = only_shift(&rota);
    let before = rota.clone();

    let err = assign_staff(&mut rota, &id, &away, None, "manager", edit_time()).unwrap_err();
    assert!(matches!(err, SchedError::AssignmentRejected { .. }));
    assert_eq!(
        err.to_string(),
        format!("cannot assign away to {id}: unavailable or on leave")
    );

    let err = assign_staff(&mut rota, &id, &carl, None, "manager", edit_time()).unwrap_err();
    assert!(err.to_string().ends_with("already assigned"));

    let driver = staff("dan", &[Role::Driver], 40.0);
    assert_eq!(
        check_constraints(&driver, &rota.shifts[0], &rota),
        vec![ConstraintViolation::MissingRole]
    );
    assert!(assign_staff(&mut rota, &id, &driver, None, "manager", edit_time()).is_err());

    let err = assign_staff(
        &mut rota,
        &ShiftId::new("nowhere"),
        &carl,
        None,
        "manager",
        edit_time(),
    )
    .unwrap_err();
    assert!(matches!(err, SchedError::UnknownShift(_)));
    assert_eq!(rota, before);
}

#[test]
fn unassigning_recomputes_status() {
    let staff = vec![leader("lena"), care_staff("carl")];
    let mut rota = conflicted(&staff);
    let id = only_shift(&rota);
    assert_eq!(rota.shifts[0].status, ShiftStatus::FullyStaffed);

    unassign_staff(&mut rota, &id, &StaffId::new("lena"), "manager", edit_time()).unwrap();
    assert_eq!(rota.shifts[0].status, ShiftStatus::PartiallyStaffed);
    unassign_staff(&mut rota, &id, &StaffId::new("carl"), "manager", edit_time()).unwrap();
    assert_eq!(rota.shifts[0].status, ShiftStatus::Unfilled);

    let err = unassign_staff(&mut rota, &id, &StaffId::new("carl"), "manager", edit_time())
        .unwrap_err();
    assert!(matches!(err, SchedError::UnknownStaff(_)));
}

#[test]
fn swap_hands_over_the_slot() {
    let staff = vec![leader("lena"), care_staff("carl")];
    let mut rota = conflicted(&staff);
    let id = only_shift(&rota);
    let cora = care_staff("cora");

    swap_staff(&mut rota, &id, &StaffId::new("carl"), &cora, "manager", edit_time()).unwrap();

    let shift = &rota.shifts[0];
    assert_eq!(shift.status, ShiftStatus::FullyStaffed);
    assert!(!shift.has_staff(&StaffId::new("carl")));
    let handed = &shift.assigned_staff[1];
    assert_eq!(handed.user_id, cora.id);
    assert_eq!(handed.role, Role::CareStaff);
    assert_eq!(handed.assigned_by, "manager");
}

#[test]
fn rejected_swap_leaves_rota_untouched() {
    let staff = vec![leader("lena"), care_staff("carl")];
    let mut rota = conflicted(&staff);
    let id = only_shift(&rota);
    let before = rota.clone();

    let mut away = care_staff("away");
    away.preferences.unavailable_dates.push(monday());
    let err = swap_staff(&mut rota, &id, &StaffId::new("carl"), &away, "manager", edit_time())
        .unwrap_err();
    assert!(matches!(err, SchedError::AssignmentRejected { .. }));
    assert_eq!(rota, before);

    let err = swap_staff(
        &mut rota,
        &id,
        &StaffId::new("nobody"),
        &care_staff("cora"),
        "manager",
        edit_time(),
    )
    .unwrap_err();
    assert!(matches!(err, SchedError::UnknownStaff(_)));

    let err = swap_staff(&mut rota, &id, &StaffId::new("carl"), &staff[0], "manager", edit_time())
        .unwrap_err();
    assert!(err.to_string().ends_with("already assigned"));
    assert_eq!(rota, before);
}

#[test]
fn rota_lifecycle_transitions() {
    let mut rota = conflicted(&[care_staff("carl")]);
    assert_eq!(rota.status, RotaStatus::Draft);
    assert_eq!(rota.created_by, "ai-scheduler");

    let err = rota.archive("manager", edit_time()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid rota transition from draft to archived"
    );

    rota.publish("manager", edit_time()).unwrap();
    assert_eq!(rota.status, RotaStatus::Published);
    assert_eq!(rota.modified_by, "manager");
    assert!(rota.publish("manager", edit_time()).is_err());

    rota.archive("manager", edit_time()).unwrap();
    assert_eq!(rota.status, RotaStatus::Archived);
}

#[test]
fn manual_assignment_rejects_roles_not_held() {
    let configuration = config(vec![pattern(
        "7:30-14:30",
        &[(Role::ShiftLeader, 1), (Role::CareStaff, 1)],
    )]);
    let mut rota =
        generate_rota(monday(), monday(), &[], &configuration, &strict_options()).unwrap();
    let id = only_shift(&rota);
    let before = rota.clone();
    let ann = care_staff("ann");

    let err = assign_staff(
        &mut rota,
        &id,
        &ann,
        Some(Role::ShiftLeader),
        "manager",
        edit_time(),
    )
    .unwrap_err();
    assert!(matches!(err, SchedError::AssignmentRejected { .. }));
    assert!(err.to_string().ends_with("does not hold the Shift Leader role"));
    assert_eq!(rota, before);

    assign_staff(&mut rota, &id, &ann, None, "manager", edit_time()).unwrap();
    assign_staff(
        &mut rota,
        &id,
        &care_staff("ben"),
        Some(Role::CareStaff),
        "manager",
        edit_time(),
    )
    .unwrap();
    assert_eq!(rota.shifts[0].status, ShiftStatus::PartiallyStaffed);
    assert_eq!(rota.shifts[0].role_count(&Role::ShiftLeader), 0);
}

#[test]
fn manual_assignment_rejects_overlapping_bookings() {
    let mut configuration = config(vec![
        pattern("7:30-14:30", &[(Role::CareStaff, 1)]),
        pattern("8:00-15:00", &[(Role::CareStaff, 1)]),
    ]);
    configuration.staffing_rules.min_rest_between_shifts = 0.0;
    let solo = care_staff("solo");
    let mut rota = generate_rota(
        monday(),
        monday(),
        &[solo.clone()],
        &configuration,
        &strict_options(),
    )
    .unwrap();
    let late = rota.shifts[1].id.clone();

    assert_eq!(
        check_constraints(&solo, &rota.shifts[1], &rota),
        vec![ConstraintViolation::DoubleBooked {
            shift: rota.shifts[0].id.clone(),
        }]
    );
    let err = assign_staff(&mut rota, &late, &solo, None, "manager", edit_time()).unwrap_err();
    assert!(err
        .to_string()
        .ends_with("already working overlapping shift shift-2025-03-03-0"));
}
