//! Multi-factor suitability score of a staff member for a shift.
//!
//! ## Scoring formula
//!
//! Score = Training (30) + Performance (25) + Working patterns (25) + Skills (20)
//!
//! - **Training**: mandatory completion, certification validity, supervision attendance
//! - **Performance**: attendance, punctuality, client feedback
//! - **Working patterns**: contracted-hours headroom, rest, consecutive days, preferred slot
//! - **Skills**: required role, specialist bonus (Shift Leader > Driver), tenure
//!
//! The sum is then scaled by the Shift Leader multiplier and the
//! optimization-priority adjustment and clamped to `0..=100`. Approved leave
//! on the shift date forces the score to zero.

mod weights;

pub use weights::{
    PerformanceWeights, ScoringWeights, SkillsWeights, TrainingWeights, WorkingPatternWeights,
};

use crate::model::{Role, Rota, Shift, Staff, StaffId, TrainingCategory, TrainingModule};
use crate::scheduler::{constraints, determine_optimal_role, OptimizationPriority, SchedulerOptions};
use chrono::{Datelike, NaiveDate};

pub const MAX_SCORE: f64 = 100.0;

/// Points per factor, before multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreBreakdown {
    pub training: f64,
    pub performance: f64,
    pub working_pattern: f64,
    pub skills: f64,
}

impl ScoreBreakdown {
    pub fn sum(&self) -> f64 {
        self.training + self.performance + self.working_pattern + self.skills
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandidateScore {
    pub staff_id: StaffId,
    /// Composite on `0..=100`.
    pub score: f64,
    pub breakdown: ScoreBreakdown,
    pub reasons: Vec<String>,
}

impl CandidateScore {
    pub fn confidence(&self) -> f64 {
        self.score / MAX_SCORE
    }

    pub fn reason(&self) -> String {
        self.reasons.join("; ")
    }
}

pub fn score_candidate(
    staff: &Staff,
    shift: &Shift,
    rota: &Rota,
    options: &SchedulerOptions,
) -> CandidateScore {
    let weights = &options.weights;
    let mut reasons = Vec::new();

    if staff.is_on_leave(shift.date) {
        return CandidateScore {
            staff_id: staff.id.clone(),
            score: 0.0,
            breakdown: ScoreBreakdown::default(),
            reasons: vec!["On approved leave".to_string()],
        };
    }

    let breakdown = ScoreBreakdown {
        training: if options.consider_training_status {
            training_points(staff, shift.date, &weights.training, &mut reasons)
        } else {
            weights.training.total() * weights.neutral_share
        },
        performance: if options.consider_performance_metrics {
            performance_points(staff, weights, &mut reasons)
        } else {
            weights.performance.total() * weights.neutral_share
        },
        working_pattern: working_pattern_points(staff, shift, rota, weights, &mut reasons),
        skills: skills_points(staff, shift, &weights.skills, &mut reasons),
    };

    let mut score = breakdown.sum();
    if shift.requires_role(&Role::ShiftLeader) && staff.has_role(&Role::ShiftLeader) {
        score *= weights.shift_leader_multiplier;
    }
    let matched = match options.optimization_priority {
        OptimizationPriority::Balanced => None,
        OptimizationPriority::StaffPreference => Some(staff.prefers(shift)),
        OptimizationPriority::Coverage => Some(constraints::has_required_role(staff, shift)),
    };
    match matched {
        Some(true) => score *= weights.priority_match_multiplier,
        Some(false) => score *= weights.priority_miss_multiplier,
        None => {}
    }

    CandidateScore {
        staff_id: staff.id.clone(),
        score: score.clamp(0.0, MAX_SCORE),
        breakdown,
        reasons,
    }
}

fn award(points: f64, reasons: &mut Vec<String>, reason: impl FnOnce() -> String) -> f64 {
    if points > 0.0 {
        reasons.push(reason());
    }
    points
}

fn fraction(value: f64) -> f64 {
    (value / 100.0).clamp(0.0, 1.0)
}

/// Share of `modules` passing `ok`; no modules means nothing outstanding.
fn rate<'a>(
    modules: impl Iterator<Item = &'a TrainingModule>,
    ok: impl Fn(&TrainingModule) -> bool,
) -> f64 {
    let (total, passed) = modules.fold((0u32, 0u32), |(total, passed), m| {
        (total + 1, passed + u32::from(ok(m)))
    });
    if total == 0 {
        1.0
    } else {
        f64::from(passed) / f64::from(total)
    }
}

fn training_points(
    staff: &Staff,
    date: NaiveDate,
    weights: &TrainingWeights,
    reasons: &mut Vec<String>,
) -> f64 {
    let of = |category: TrainingCategory| {
        staff
            .training_modules
            .iter()
            .filter(move |m| m.category == category)
    };
    let mandatory = rate(
        staff.training_modules.iter().filter(|m| {
            m.category == TrainingCategory::Mandatory
                || (m.required && m.category == TrainingCategory::Optional)
        }),
        |m| m.is_valid_on(date),
    );
    let certification = rate(of(TrainingCategory::Certification), |m| m.is_valid_on(date));
    let supervision = rate(of(TrainingCategory::Supervision), |m| m.completed);

    award(weights.mandatory_completion * mandatory, reasons, || {
        format!("Mandatory training {:.0}% complete", mandatory * 100.0)
    }) + award(weights.certification_validity * certification, reasons, || {
        format!("Certifications {:.0}% valid", certification * 100.0)
    }) + award(weights.supervision_attendance * supervision, reasons, || {
        format!("Supervision {:.0}% attended", supervision * 100.0)
    })
}

fn performance_points(staff: &Staff, weights: &ScoringWeights, reasons: &mut Vec<String>) -> f64 {
    let w = &weights.performance;
    let Some(metrics) = staff.performance_metrics else {
        return w.total() * weights.neutral_share;
    };
    award(w.attendance * fraction(metrics.attendance_rate), reasons, || {
        format!("Attendance {:.0}%", metrics.attendance_rate)
    }) + award(w.punctuality * fraction(metrics.punctuality_score), reasons, || {
        format!("Punctuality {:.0}%", metrics.punctuality_score)
    }) + award(w.feedback * fraction(metrics.feedback_score), reasons, || {
        format!("Feedback {:.0}%", metrics.feedback_score)
    })
}

fn working_pattern_points(
    staff: &Staff,
    shift: &Shift,
    rota: &Rota,
    weights: &ScoringWeights,
    reasons: &mut Vec<String>,
) -> f64 {
    let w = &weights.working_pattern;

    let remaining = staff.contracted_hours - constraints::projected_hours(staff, shift, rota);
    let mut headroom = if staff.contracted_hours > 0.0 {
        (remaining / staff.contracted_hours).clamp(0.0, 1.0)
    } else {
        0.0
    };
    if staff.preferences.flexible_hours {
        headroom = headroom.max(weights.neutral_share);
    }
    let hours = award(w.hours_headroom * headroom, reasons, || {
        format!("{:.1}h of contracted hours left", remaining.max(0.0))
    });

    let rest = if constraints::has_adequate_rest(staff, shift, rota) {
        award(w.rest_compliance, reasons, || "Adequate rest between shifts".to_string())
    } else {
        0.0
    };

    let consecutive = if constraints::exceeds_consecutive_days(staff, shift, rota) {
        0.0
    } else {
        award(w.consecutive_compliance, reasons, || {
            "Within consecutive-day limit".to_string()
        })
    };

    let preference = if week_is_full(staff, shift, rota) {
        0.0
    } else if staff.prefers(shift) {
        award(w.preference_match, reasons, || {
            format!("Prefers {} shifts", shift.shift_type.as_str())
        })
    } else if staff.preferences.preferred_shifts.is_empty() && !staff.preferences.night_shift_only {
        award(w.preference_match * weights.neutral_share, reasons, || {
            "No stated shift preference".to_string()
        })
    } else {
        0.0
    };

    hours + rest + consecutive + preference
}

fn week_is_full(staff: &Staff, shift: &Shift, rota: &Rota) -> bool {
    let Some(max) = staff.preferences.max_shifts_per_week else {
        return false;
    };
    let week = shift.date.iso_week();
    let in_week = rota
        .shifts_for(&staff.id)
        .filter(|s| s.id != shift.id && s.date.iso_week() == week)
        .count();
    in_week >= max as usize
}

fn skills_points(
    staff: &Staff,
    shift: &Shift,
    weights: &SkillsWeights,
    reasons: &mut Vec<String>,
) -> f64 {
    let role_match = if constraints::has_required_role(staff, shift) {
        let role = determine_optimal_role(staff, shift);
        award(weights.role_match, reasons, || format!("Qualified as {role}"))
    } else {
        0.0
    };

    let specialist = if staff.has_role(&Role::ShiftLeader) {
        award(weights.shift_leader_bonus, reasons, || "Shift Leader experience".to_string())
    } else if staff.has_role(&Role::Driver) {
        award(weights.driver_bonus, reasons, || "Qualified driver".to_string())
    } else {
        0.0
    };

    let tenure = match staff.tenure_years(shift.date) {
        Some(years) if weights.tenure_full_years > 0.0 => {
            let share = (years / weights.tenure_full_years).clamp(0.0, 1.0);
            award(weights.tenure * share, reasons, || format!("{years:.1} years' service"))
        }
        _ => 0.0,
    };

    role_match + specialist + tenure
}
