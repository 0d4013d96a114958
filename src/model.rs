use crate::config::RotaConfiguration;
use crate::scheduler::SchedError;
use crate::time;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Strong identifier for Staff
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StaffId(String);

impl StaffId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StaffId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strong identifier for Shift
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ShiftId(String);

impl ShiftId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShiftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Strong identifier for Rota
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RotaId(String);

impl RotaId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Staff role. Serialized as its display name ("Care Staff", "Shift Leader", ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    CareStaff,
    ShiftLeader,
    Driver,
    Custom(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::CareStaff => "Care Staff",
            Role::ShiftLeader => "Shift Leader",
            Role::Driver => "Driver",
            Role::Custom(name) => name,
        }
    }

    /// Weight used when ranking shifts by how hard their roles are to cover.
    pub fn scarcity_weight(&self) -> u32 {
        match self {
            Role::ShiftLeader => 3,
            Role::Driver => 2,
            _ => 1,
        }
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        let name = raw.trim();
        if name.eq_ignore_ascii_case("care staff") {
            Role::CareStaff
        } else if name.eq_ignore_ascii_case("shift leader") {
            Role::ShiftLeader
        } else if name.eq_ignore_ascii_case("driver") {
            Role::Driver
        } else {
            Role::Custom(name.to_string())
        }
    }
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::from(raw.to_string())
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Approved,
    Pending,
    Rejected,
}

/// Leave taken by a staff member, both bounds inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeavePeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub status: LeaveStatus,
}

impl LeavePeriod {
    /// Approved leave over `[start, end]`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err("leave end must not be before start".to_string());
        }
        Ok(Self {
            start,
            end,
            status: LeaveStatus::Approved,
        })
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_approved(&self) -> bool {
        self.status == LeaveStatus::Approved
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaffPreferences {
    /// Slot names ("7:30-14:30") or shift types ("night").
    pub preferred_shifts: Vec<String>,
    pub unavailable_dates: Vec<NaiveDate>,
    pub max_shifts_per_week: Option<u32>,
    pub flexible_hours: bool,
    pub night_shift_only: bool,
}

/// Performance history, every field on a 0-100 scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub attendance_rate: f64,
    pub punctuality_score: f64,
    #[serde(default)]
    pub shift_completion_rate: f64,
    pub feedback_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrainingCategory {
    Mandatory,
    Certification,
    Supervision,
    Optional,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingModule {
    pub name: String,
    pub category: TrainingCategory,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
}

impl TrainingModule {
    /// Completed and not expired on `date`.
    pub fn is_valid_on(&self, date: NaiveDate) -> bool {
        self.completed && self.expires_on.map_or(true, |expiry| expiry >= date)
    }
}

/// A member of staff available to the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: StaffId,
    pub name: String,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub contracted_hours: f64,
    #[serde(default)]
    pub preferences: StaffPreferences,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance_metrics: Option<PerformanceMetrics>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub training_modules: Vec<TrainingModule>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub leave: Vec<LeavePeriod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
}

impl Staff {
    pub fn new<I: AsRef<str>, N: Into<String>>(id: I, name: N) -> Self {
        Self {
            id: StaffId::new(id),
            name: name.into(),
            roles: Vec::new(),
            contracted_hours: 0.0,
            preferences: StaffPreferences::default(),
            performance_metrics: None,
            training_modules: Vec::new(),
            leave: Vec::new(),
            start_date: None,
        }
    }

    pub fn with_roles<R: Into<Role>>(mut self, roles: impl IntoIterator<Item = R>) -> Self {
        self.roles = roles.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_contracted_hours(mut self, hours: f64) -> Self {
        self.contracted_hours = hours;
        self
    }

    pub fn has_role(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Approved leave covering `date`.
    pub fn is_on_leave(&self, date: NaiveDate) -> bool {
        self.leave.iter().any(|l| l.is_approved() && l.covers(date))
    }

    pub fn is_unavailable_on(&self, date: NaiveDate) -> bool {
        self.preferences.unavailable_dates.contains(&date) || self.is_on_leave(date)
    }

    /// Whether the shift matches a stated preference, by slot name or shift type.
    pub fn prefers(&self, shift: &Shift) -> bool {
        if self.preferences.night_shift_only {
            return shift.shift_type == ShiftType::Night;
        }
        self.preferences.preferred_shifts.iter().any(|p| {
            let p = p.trim();
            p == shift.time || p.eq_ignore_ascii_case(shift.shift_type.as_str())
        })
    }

    pub fn tenure_years(&self, on: NaiveDate) -> Option<f64> {
        let started = self.start_date?;
        let days = (on - started).num_days().max(0);
        Some(days as f64 / 365.25)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShiftType {
    Morning,
    Afternoon,
    Night,
}

impl ShiftType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Morning => "morning",
            ShiftType::Afternoon => "afternoon",
            ShiftType::Night => "night",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftStatus {
    Unfilled,
    #[serde(rename = "Partially Staffed")]
    PartiallyStaffed,
    #[serde(rename = "Fully Staffed")]
    FullyStaffed,
    Conflict,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRequirement {
    pub role: Role,
    pub count: u32,
}

impl RoleRequirement {
    pub fn new<R: Into<Role>>(role: R, count: u32) -> Self {
        Self {
            role: role.into(),
            count,
        }
    }
}

/// A staffing gap on a shift. `role: None` means any role will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSlot {
    pub role: Option<Role>,
    pub remaining: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub user_id: StaffId,
    pub role: Role,
    pub assigned_at: DateTime<Utc>,
    pub assigned_by: String,
}

/// A shift on a given date (local care-home time).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: ShiftId,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub time: String,
    #[serde(rename = "type")]
    pub shift_type: ShiftType,
    pub required_staff: u32,
    #[serde(default)]
    pub required_roles: Vec<RoleRequirement>,
    #[serde(default)]
    pub assigned_staff: Vec<Assignment>,
    pub status: ShiftStatus,
}

impl Shift {
    /// Creates an unfilled shift from a named slot such as "7:30-14:30".
    pub fn new<I: AsRef<str>>(
        id: I,
        date: NaiveDate,
        slot: &str,
        required_roles: Vec<RoleRequirement>,
    ) -> Result<Self, SchedError> {
        let parsed = time::parse_shift_time(slot)?;
        let required_staff = required_roles.iter().map(|r| r.count).sum();
        let mut shift = Self {
            id: ShiftId::new(id),
            date,
            start_time: parsed.start,
            end_time: parsed.end,
            time: slot.trim().to_string(),
            shift_type: parsed.shift_type,
            required_staff,
            required_roles,
            assigned_staff: Vec::new(),
            status: ShiftStatus::Unfilled,
        };
        shift.refresh_status();
        Ok(shift)
    }

    pub fn start_at(&self) -> NaiveDateTime {
        self.window().0
    }

    pub fn end_at(&self) -> NaiveDateTime {
        self.window().1
    }

    /// Start and end as datetimes, the end rolling to the next day past midnight.
    pub fn window(&self) -> (NaiveDateTime, NaiveDateTime) {
        time::shift_window(self.date, self.start_time, self.end_time)
    }

    pub fn hours(&self) -> f64 {
        time::calculate_shift_hours(self)
    }

    pub fn has_staff(&self, staff: &StaffId) -> bool {
        self.assigned_staff.iter().any(|a| &a.user_id == staff)
    }

    pub fn role_count(&self, role: &Role) -> u32 {
        self.assigned_staff.iter().filter(|a| &a.role == role).count() as u32
    }

    pub fn requires_role(&self, role: &Role) -> bool {
        self.required_roles.iter().any(|r| &r.role == role && r.count > 0)
    }

    /// Unmet role requirements in declaration order, then any headcount gap
    /// not explained by them.
    pub fn open_slots(&self) -> Vec<OpenSlot> {
        let mut open: Vec<OpenSlot> = self
            .required_roles
            .iter()
            .filter_map(|req| {
                let remaining = req.count.saturating_sub(self.role_count(&req.role));
                (remaining > 0).then(|| OpenSlot {
                    role: Some(req.role.clone()),
                    remaining,
                })
            })
            .collect();
        let role_gap: u32 = open.iter().map(|s| s.remaining).sum();
        let headcount_gap = self
            .required_staff
            .saturating_sub(self.assigned_staff.len() as u32);
        if headcount_gap > role_gap {
            open.push(OpenSlot {
                role: None,
                remaining: headcount_gap - role_gap,
            });
        }
        open
    }

    /// Status implied by assigned staff against requirements.
    pub fn derived_status(&self) -> ShiftStatus {
        let assigned = self.assigned_staff.len() as u32;
        let roles_met = self
            .required_roles
            .iter()
            .all(|req| self.role_count(&req.role) >= req.count);
        if roles_met && assigned >= self.required_staff {
            ShiftStatus::FullyStaffed
        } else if assigned == 0 {
            ShiftStatus::Unfilled
        } else {
            ShiftStatus::PartiallyStaffed
        }
    }

    /// Recomputes `status`; a `Conflict` stays until cleared explicitly.
    pub fn refresh_status(&mut self) {
        if self.status != ShiftStatus::Conflict {
            self.status = self.derived_status();
        }
    }

    /// Status consistent with assignments (a terminal `Conflict` is accepted).
    pub fn status_is_consistent(&self) -> bool {
        self.status == ShiftStatus::Conflict || self.status == self.derived_status()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RotaStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl RotaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RotaStatus::Draft => "draft",
            RotaStatus::Published => "published",
            RotaStatus::Archived => "archived",
        }
    }
}

/// A generated rota over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rota {
    pub id: RotaId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub shifts: Vec<Shift>,
    pub configuration: RotaConfiguration,
    #[serde(default)]
    pub status: RotaStatus,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub modified_by: String,
}

impl Rota {
    /// Empty draft rota, stamped with `by` at `at`.
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        configuration: RotaConfiguration,
        by: &str,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: RotaId::new(format!("rota-{start_date}-{end_date}")),
            start_date,
            end_date,
            shifts: Vec::new(),
            configuration,
            status: RotaStatus::Draft,
            created_by: by.to_string(),
            created_at: at,
            last_modified: at,
            modified_by: by.to_string(),
        }
    }

    pub fn find_shift(&self, id: &ShiftId) -> Option<&Shift> {
        self.shifts.iter().find(|s| &s.id == id)
    }

    /// Shifts the staff member is assigned to.
    pub fn shifts_for<'a>(&'a self, staff: &'a StaffId) -> impl Iterator<Item = &'a Shift> + 'a {
        self.shifts.iter().filter(move |s| s.has_staff(staff))
    }

    pub fn assigned_hours(&self, staff: &StaffId) -> f64 {
        self.shifts_for(staff).map(Shift::hours).sum()
    }

    pub fn touch(&mut self, by: &str, at: DateTime<Utc>) {
        self.modified_by = by.to_string();
        self.last_modified = at;
    }

    pub fn publish(&mut self, by: &str, at: DateTime<Utc>) -> Result<(), SchedError> {
        self.transition(RotaStatus::Draft, RotaStatus::Published, by, at)
    }

    pub fn archive(&mut self, by: &str, at: DateTime<Utc>) -> Result<(), SchedError> {
        self.transition(RotaStatus::Published, RotaStatus::Archived, by, at)
    }

    fn transition(
        &mut self,
        from: RotaStatus,
        to: RotaStatus,
        by: &str,
        at: DateTime<Utc>,
    ) -> Result<(), SchedError> {
        if self.status != from {
            return Err(SchedError::InvalidTransition {
                from: self.status.as_str(),
                to: to.as_str(),
            });
        }
        self.status = to;
        self.touch(by, at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!(Role::from("shift leader"), Role::ShiftLeader);
        assert_eq!(Role::from(" Care Staff "), Role::CareStaff);
        assert_eq!(Role::from("Nurse"), Role::Custom("Nurse".into()));
        let json = serde_json::to_string(&Role::ShiftLeader).unwrap();
        assert_eq!(json, "\"Shift Leader\"");
    }

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(StaffId::random(), StaffId::random());
        assert_ne!(ShiftId::random().as_str(), ShiftId::random().as_str());
        assert_ne!(RotaId::random(), RotaId::random());
    }

    #[test]
    fn pending_leave_does_not_block() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let mut staff = Staff::new("p", "P");
        let mut leave = LeavePeriod::new(day, day).unwrap();
        leave.status = LeaveStatus::Pending;
        staff.leave.push(leave);
        assert!(!staff.is_on_leave(day));
        assert!(LeavePeriod::new(day.succ_opt().unwrap(), day).is_err());
    }

    #[test]
    fn open_slots_report_headcount_beyond_roles() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
        let leader = vec![RoleRequirement::new(Role::ShiftLeader, 1)];
        let mut shift = Shift::new("s", day, "7:30-14:30", leader).unwrap();
        shift.required_staff = 3;
        assert_eq!(
            shift.open_slots(),
            vec![
                OpenSlot {
                    role: Some(Role::ShiftLeader),
                    remaining: 1,
                },
                OpenSlot {
                    role: None,
                    remaining: 2,
                },
            ]
        );
    }
}
