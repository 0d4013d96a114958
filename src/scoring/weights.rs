use serde::{Deserialize, Serialize};

/// Points available per training sub-component (30 by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingWeights {
    pub mandatory_completion: f64,
    pub certification_validity: f64,
    pub supervision_attendance: f64,
}

impl Default for TrainingWeights {
    fn default() -> Self {
        Self {
            mandatory_completion: 12.0,
            certification_validity: 10.0,
            supervision_attendance: 8.0,
        }
    }
}

impl TrainingWeights {
    pub fn total(&self) -> f64 {
        self.mandatory_completion + self.certification_validity + self.supervision_attendance
    }
}

/// Points available per performance sub-component (25 by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PerformanceWeights {
    pub attendance: f64,
    pub punctuality: f64,
    pub feedback: f64,
}

impl Default for PerformanceWeights {
    fn default() -> Self {
        Self {
            attendance: 10.0,
            punctuality: 8.0,
            feedback: 7.0,
        }
    }
}

impl PerformanceWeights {
    pub fn total(&self) -> f64 {
        self.attendance + self.punctuality + self.feedback
    }
}

/// Points available per working-pattern sub-component (25 by default).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkingPatternWeights {
    pub hours_headroom: f64,
    pub rest_compliance: f64,
    pub consecutive_compliance: f64,
    pub preference_match: f64,
}

impl Default for WorkingPatternWeights {
    fn default() -> Self {
        Self {
            hours_headroom: 8.0,
            rest_compliance: 6.0,
            consecutive_compliance: 5.0,
            preference_match: 6.0,
        }
    }
}

/// Points available per skills sub-component (20 by default: role match,
/// the larger of the two specialist bonuses, tenure).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsWeights {
    pub role_match: f64,
    pub shift_leader_bonus: f64,
    pub driver_bonus: f64,
    pub tenure: f64,
    /// Years of service that earn the full tenure share.
    pub tenure_full_years: f64,
}

impl Default for SkillsWeights {
    fn default() -> Self {
        Self {
            role_match: 10.0,
            shift_leader_bonus: 6.0,
            driver_bonus: 3.0,
            tenure: 4.0,
            tenure_full_years: 5.0,
        }
    }
}

/// Business weights of the suitability score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringWeights {
    pub training: TrainingWeights,
    pub performance: PerformanceWeights,
    pub working_pattern: WorkingPatternWeights,
    pub skills: SkillsWeights,
    /// Applied when the shift needs a Shift Leader and the candidate is one.
    pub shift_leader_multiplier: f64,
    /// `staff-preference` / `coverage` adjustment on a match.
    pub priority_match_multiplier: f64,
    /// `staff-preference` / `coverage` adjustment on a miss.
    pub priority_miss_multiplier: f64,
    /// Share of a factor granted when it is switched off or has no data.
    pub neutral_share: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            training: TrainingWeights::default(),
            performance: PerformanceWeights::default(),
            working_pattern: WorkingPatternWeights::default(),
            skills: SkillsWeights::default(),
            shift_leader_multiplier: 1.2,
            priority_match_multiplier: 1.3,
            priority_miss_multiplier: 0.7,
            neutral_share: 0.5,
        }
    }
}
