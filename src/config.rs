use crate::model::{Role, RoleRequirement, Shift};
use crate::scheduler::SchedError;
use crate::time;
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Shift patterns and staffing rules for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RotaConfiguration {
    #[serde(default)]
    pub shift_patterns: Vec<ShiftPattern>,
    #[serde(default)]
    pub staffing_rules: StaffingRules,
}

impl RotaConfiguration {
    /// Morning and afternoon with a Shift Leader and two Care Staff, night with two Care Staff.
    pub fn standard() -> Self {
        let day_roles = || {
            vec![
                RoleRequirement::new(Role::ShiftLeader, 1),
                RoleRequirement::new(Role::CareStaff, 2),
            ]
        };
        Self {
            shift_patterns: vec![
                ShiftPattern::new("7:30-14:30", day_roles()),
                ShiftPattern::new("14:30-21:30", day_roles()),
                ShiftPattern::new("21:30-7:30", vec![RoleRequirement::new(Role::CareStaff, 2)]),
            ],
            staffing_rules: StaffingRules::default(),
        }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: RotaConfiguration =
            serde_json::from_str(raw).context("parsing rota configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.shift_patterns.is_empty() {
            bail!("configuration must contain at least one shift pattern");
        }
        for pattern in &self.shift_patterns {
            pattern.validate()?;
        }
        self.staffing_rules.validate()?;
        Ok(())
    }

    /// Builds the unfilled shift skeleton for `[start, end]`, ordered by start time.
    pub fn build_shifts(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Shift>, SchedError> {
        if end < start {
            return Err(SchedError::InvalidDateRange { start, end });
        }

        let mut shifts = Vec::new();
        for date in start.iter_days().take_while(|d| *d <= end) {
            let weekday = date.weekday().number_from_monday() as u8;
            for (idx, pattern) in self.shift_patterns.iter().enumerate() {
                if !pattern.applies_on(weekday) {
                    continue;
                }
                let shift = Shift::new(
                    format!("shift-{date}-{idx}"),
                    date,
                    &pattern.time,
                    pattern.required_roles.clone(),
                )?;
                shifts.push(shift);
            }
        }

        shifts.sort_by_key(|s| s.start_at());
        Ok(shifts)
    }
}

/// A named time slot and its default role requirements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPattern {
    pub time: String,
    /// ISO weekdays (1 = Monday .. 7 = Sunday); empty means every day.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<u8>,
    #[serde(default)]
    pub required_roles: Vec<RoleRequirement>,
}

impl ShiftPattern {
    pub fn new<S: Into<String>>(time: S, required_roles: Vec<RoleRequirement>) -> Self {
        Self {
            time: time.into(),
            days: Vec::new(),
            required_roles,
        }
    }

    pub fn on_days(mut self, days: Vec<u8>) -> Self {
        self.days = days;
        self
    }

    pub fn applies_on(&self, weekday: u8) -> bool {
        self.days.is_empty() || self.days.contains(&weekday)
    }

    fn validate(&self) -> Result<()> {
        time::parse_shift_time(&self.time)
            .with_context(|| format!("shift pattern {}", self.time))?;
        if let Some(day) = self.days.iter().find(|d| !(1..=7).contains(*d)) {
            bail!("shift pattern {} has invalid weekday {day}", self.time);
        }
        if self.required_roles.iter().any(|r| r.count == 0) {
            bail!("shift pattern {} has a role requirement of zero", self.time);
        }
        Ok(())
    }
}

/// Period over which contracted hours are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HoursWindow {
    #[default]
    Rota,
    Week,
}

impl HoursWindow {
    /// Whether a shift on `date` counts towards the hours of a shift on `anchor`.
    pub fn contains(&self, anchor: NaiveDate, date: NaiveDate) -> bool {
        match self {
            HoursWindow::Rota => true,
            HoursWindow::Week => anchor.iso_week() == date.iso_week(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaffingRules {
    /// Hours.
    pub min_rest_between_shifts: f64,
    pub max_consecutive_days: u32,
    pub hours_window: HoursWindow,
}

impl Default for StaffingRules {
    fn default() -> Self {
        Self {
            min_rest_between_shifts: 11.0,
            max_consecutive_days: 5,
            hours_window: HoursWindow::Rota,
        }
    }
}

impl StaffingRules {
    fn validate(&self) -> Result<()> {
        if !self.min_rest_between_shifts.is_finite() || self.min_rest_between_shifts < 0.0 {
            bail!("minRestBetweenShifts must be a non-negative number of hours");
        }
        if self.max_consecutive_days == 0 {
            bail!("maxConsecutiveDays must be > 0");
        }
        Ok(())
    }
}
