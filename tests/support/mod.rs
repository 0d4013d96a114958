#![allow(dead_code)]

use chrono::NaiveDate;
use rota_engine::{
    PerformanceMetrics, Role, RoleRequirement, RotaConfiguration, SchedulerOptions, ShiftPattern,
    Staff, StaffingRules,
};
use tracing_subscriber::EnvFilter;

/// Routes scheduler logs to the test output when `RUST_LOG` is set.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Monday 3 March 2025.
pub fn monday() -> NaiveDate {
    date(2025, 3, 3)
}

pub fn staff(id: &str, roles: &[Role], hours: f64) -> Staff {
    Staff::new(id, id.to_uppercase())
        .with_roles(roles.iter().cloned())
        .with_contracted_hours(hours)
}

pub fn care_staff(id: &str) -> Staff {
    staff(id, &[Role::CareStaff], 40.0)
}

pub fn leader(id: &str) -> Staff {
    staff(id, &[Role::ShiftLeader, Role::CareStaff], 40.0)
}

pub fn metrics(value: f64) -> PerformanceMetrics {
    PerformanceMetrics {
        attendance_rate: value,
        punctuality_score: value,
        shift_completion_rate: value,
        feedback_score: value,
    }
}

pub fn pattern(time: &str, roles: &[(Role, u32)]) -> ShiftPattern {
    ShiftPattern::new(
        time,
        roles
            .iter()
            .map(|(role, count)| RoleRequirement::new(role.clone(), *count))
            .collect(),
    )
}

pub fn config(patterns: Vec<ShiftPattern>) -> RotaConfiguration {
    RotaConfiguration {
        shift_patterns: patterns,
        staffing_rules: StaffingRules::default(),
    }
}

pub fn strict_options() -> SchedulerOptions {
    SchedulerOptions {
        allow_partial_fill: false,
        ..SchedulerOptions::default()
    }
}
