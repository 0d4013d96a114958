#![forbid(unsafe_code)]
mod support;

use rota_engine::{
    generate_rota, HoursWindow, Role, RotaConfiguration, SchedulerOptions, ShiftStatus, ShiftType,
};
use support::*;

const WEEKEND_NIGHTS: &str = r#"{
    "shiftPatterns": [
        {
            "time": "7:30-14:30",
            "requiredRoles": [
                { "role": "shift leader", "count": 1 },
                { "role": "Care Staff", "count": 2 }
            ]
        },
        {
            "time": "21:30-7:30",
            "days": [6, 7],
            "requiredRoles": [{ "role": "Care Staff", "count": 1 }]
        }
    ],
    "staffingRules": { "minRestBetweenShifts": 12, "hoursWindow": "week" }
}"#;

#[test]
fn configuration_from_json() {
    let config = RotaConfiguration::from_json_str(WEEKEND_NIGHTS).unwrap();

    assert_eq!(config.shift_patterns.len(), 2);
    assert_eq!(config.shift_patterns[0].required_roles[0].role, Role::ShiftLeader);
    assert_eq!(config.shift_patterns[0].required_roles[1].role, Role::CareStaff);
    assert_eq!(config.shift_patterns[1].days, vec![6, 7]);
    assert_eq!(config.staffing_rules.min_rest_between_shifts, 12.0);
    assert_eq!(config.staffing_rules.max_consecutive_days, 5);
    assert_eq!(config.staffing_rules.hours_window, HoursWindow::Week);
}

#[test]
fn weekday_filter_limits_patterns() {
    let config = RotaConfiguration::from_json_str(WEEKEND_NIGHTS).unwrap();
    let shifts = config.build_shifts(monday(), date(2025, 3, 9)).unwrap();

    assert_eq!(shifts.len(), 9);
    let nights: Vec<_> = shifts
        .iter()
        .filter(|s| s.shift_type == ShiftType::Night)
        .map(|s| s.date)
        .collect();
    assert_eq!(nights, vec![date(2025, 3, 8), date(2025, 3, 9)]);
    assert_eq!(shifts[6].id.as_str(), "shift-2025-03-08-1");

    for window in shifts.windows(2) {
        assert!(window[0].start_at() <= window[1].start_at());
    }
}

#[test]
fn standard_configuration_lays_out_three_shifts_a_day() {
    let config = RotaConfiguration::standard();
    config.validate().unwrap();
    let shifts = config.build_shifts(monday(), monday()).unwrap();

    let layout: Vec<_> = shifts
        .iter()
        .map(|s| (s.time.as_str(), s.shift_type, s.required_staff, s.hours()))
        .collect();
    assert_eq!(
        layout,
        vec![
            ("7:30-14:30", ShiftType::Morning, 3, 7.0),
            ("14:30-21:30", ShiftType::Afternoon, 3, 7.0),
            ("21:30-7:30", ShiftType::Night, 2, 10.0),
        ]
    );
    assert!(shifts.iter().all(|s| s.status == ShiftStatus::Unfilled));
}

#[test]
fn invalid_configurations_are_rejected() {
    let bad_slot = r#"{ "shiftPatterns": [{ "time": "7:30", "requiredRoles": [] }] }"#;
    let err = RotaConfiguration::from_json_str(bad_slot).unwrap_err();
    assert!(format!("{err:#}").contains("invalid time slot"));

    let bad_day = r#"{ "shiftPatterns": [{ "time": "7:30-14:30", "days": [8] }] }"#;
    let err = RotaConfiguration::from_json_str(bad_day).unwrap_err();
    assert!(err.to_string().contains("invalid weekday 8"));

    let zero = r#"{ "shiftPatterns": [{ "time": "7:30-14:30",
        "requiredRoles": [{ "role": "Driver", "count": 0 }] }] }"#;
    assert!(RotaConfiguration::from_json_str(zero).is_err());

    let no_rest = r#"{ "shiftPatterns": [{ "time": "7:30-14:30" }],
        "staffingRules": { "maxConsecutiveDays": 0 } }"#;
    assert!(RotaConfiguration::from_json_str(no_rest).is_err());

    assert!(RotaConfiguration::from_json_str(r#"{ "shiftPatterns": [] }"#).is_err());
    assert!(RotaConfiguration::from_json_str("not json").is_err());
}

#[test]
fn weekly_hours_window_resets_each_iso_week() {
    // Sunday then Monday: 16h total, but only 8h in either ISO week.
    let mut config = config(vec![pattern("7:30-15:30", &[(Role::CareStaff, 1)])]);
    config.staffing_rules.hours_window = HoursWindow::Week;
    let nina = staff("nina", &[Role::CareStaff], 8.0);

    let rota = generate_rota(
        date(2025, 3, 9),
        date(2025, 3, 10),
        &[nina.clone()],
        &config,
        &SchedulerOptions::default(),
    )
    .unwrap();
    assert!(rota.shifts.iter().all(|s| s.has_staff(&nina.id)));

    config.staffing_rules.hours_window = HoursWindow::Rota;
    let rota = generate_rota(
        date(2025, 3, 9),
        date(2025, 3, 10),
        &[nina.clone()],
        &config,
        &SchedulerOptions::default(),
    )
    .unwrap();
    assert_eq!(rota.shifts_for(&nina.id).count(), 1);
}

#[test]
fn custom_roles_round_trip_by_name() {
    let config = RotaConfiguration {
        shift_patterns: vec![pattern("8:00-16:00", &[(Role::from("Nurse"), 1)])],
        ..RotaConfiguration::standard()
    };
    let json = serde_json::to_string(&config).unwrap();
    assert!(json.contains(r#""role":"Nurse""#));
    assert_eq!(RotaConfiguration::from_json_str(&json).unwrap(), config);
}
