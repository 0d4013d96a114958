//! Ranked staff suggestions for a single shift.

use crate::model::{Role, Rota, Shift, Staff, StaffId};
use crate::scheduler::{
    can_assign_staff, check_constraints, determine_optimal_role, ConstraintViolation,
    SchedulerOptions,
};
use crate::scoring::{score_candidate, CandidateScore};
use serde::Serialize;

pub const SUGGESTED_COUNT: usize = 3;
pub const ALTERNATIVE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionMode {
    /// Only staff passing every hard constraint.
    Eligible,
    /// Everyone is scored; failed constraints are appended to the reason.
    Advisory,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedCandidate<'s> {
    pub staff: &'s Staff,
    pub score: CandidateScore,
    pub violations: Vec<ConstraintViolation>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffSuggestion {
    pub staff_id: StaffId,
    pub role: Role,
    pub confidence: f64,
    pub reason: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftSuggestions {
    pub suggested_staff: Vec<StaffSuggestion>,
    pub alternative_staff: Vec<StaffSuggestion>,
    pub confidence: f64,
    pub reasoning: String,
}

/// Scores staff not already on the shift, best first. Equal scores keep roster order.
pub fn rank_candidates<'s>(
    shift: &Shift,
    staff: &'s [Staff],
    rota: &Rota,
    options: &SchedulerOptions,
    mode: SuggestionMode,
) -> Vec<RankedCandidate<'s>> {
    let mut ranked: Vec<RankedCandidate<'s>> = staff
        .iter()
        .filter(|s| !shift.has_staff(&s.id))
        .filter_map(|s| {
            let violations = match mode {
                SuggestionMode::Eligible if !can_assign_staff(s, shift, rota) => return None,
                SuggestionMode::Eligible => Vec::new(),
                SuggestionMode::Advisory => check_constraints(s, shift, rota),
            };
            Some(RankedCandidate {
                staff: s,
                score: score_candidate(s, shift, rota, options),
                violations,
            })
        })
        .collect();
    ranked.sort_by(|a, b| b.score.score.total_cmp(&a.score.score));
    ranked
}

pub fn suggest_staff(
    shift: &Shift,
    staff: &[Staff],
    rota: &Rota,
    options: &SchedulerOptions,
    mode: SuggestionMode,
) -> ShiftSuggestions {
    let ranked = rank_candidates(shift, staff, rota, options, mode);
    let eligible = ranked.iter().filter(|c| c.violations.is_empty()).count();

    let mut suggestions = ranked.iter().map(|c| to_suggestion(c, shift));
    let suggested_staff: Vec<StaffSuggestion> = suggestions.by_ref().take(SUGGESTED_COUNT).collect();
    let alternative_staff: Vec<StaffSuggestion> = suggestions.take(ALTERNATIVE_COUNT).collect();

    let confidence = if suggested_staff.is_empty() {
        0.0
    } else {
        suggested_staff.iter().map(|s| s.confidence).sum::<f64>() / suggested_staff.len() as f64
    };

    let reasoning = match ranked.first() {
        Some(top) => format!(
            "{eligible} of {considered} staff eligible for the {kind} shift {time} on {date}; best match {name} ({score:.0}/100)",
            considered = ranked.len(),
            kind = shift.shift_type.as_str(),
            time = shift.time,
            date = shift.date,
            name = top.staff.name,
            score = top.score.score,
        ),
        None => format!(
            "no staff eligible for the {} shift {} on {}",
            shift.shift_type.as_str(),
            shift.time,
            shift.date
        ),
    };

    ShiftSuggestions {
        suggested_staff,
        alternative_staff,
        confidence,
        reasoning,
    }
}

/// Advisory suggestions with default options, for the "suggest staff" view.
pub fn generate_shift_suggestions(shift: &Shift, staff: &[Staff], rota: &Rota) -> ShiftSuggestions {
    suggest_staff(
        shift,
        staff,
        rota,
        &SchedulerOptions::default(),
        SuggestionMode::Advisory,
    )
}

fn to_suggestion(candidate: &RankedCandidate<'_>, shift: &Shift) -> StaffSuggestion {
    let mut reason = candidate.score.reason();
    if !candidate.violations.is_empty() {
        let excluded: Vec<String> = candidate.violations.iter().map(|v| v.to_string()).collect();
        if !reason.is_empty() {
            reason.push_str("; ");
        }
        reason.push_str("excluded: ");
        reason.push_str(&excluded.join(", "));
    }
    StaffSuggestion {
        staff_id: candidate.staff.id.clone(),
        role: determine_optimal_role(candidate.staff, shift),
        confidence: candidate.score.confidence(),
        reason,
        score: candidate.score.score,
    }
}
