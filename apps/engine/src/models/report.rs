//! Output records the engine hands back to its callers — plain structured
//! data ready for serialization; no wire format is prescribed here.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::taxonomy::SkillId;

/// One scored category with the rationale that produced the number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryScore {
    /// 0–100.
    pub score: f64,
    /// Share of the composite, 0–100. Shares across a breakdown sum to 100.
    pub weight: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub categories: BTreeMap<String, CategoryScore>,
    /// Weighted average of the category scores, 0–100.
    pub composite: f64,
    /// Degradations and recoveries worth surfacing (embedding fallback,
    /// unrecognized skills). Never silently dropped.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl ScoreBreakdown {
    pub fn weight_sum(&self) -> u32 {
        self.categories.values().map(|c| c.weight).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditStatus {
    Pass,
    Warning,
    Fail,
}

/// Result of a single bias detector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorResult {
    /// 0–100; higher is cleaner.
    pub score: u32,
    pub status: AuditStatus,
    pub details: String,
    /// The concrete terms or signals that drove the penalty.
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub categories: BTreeMap<String, DetectorResult>,
    /// Unweighted mean of the detector scores, rounded half-up.
    pub overall: u32,
    /// One templated recommendation per non-passing category.
    pub recommendations: Vec<String>,
}

/// High = essential and absent; Medium = essential but below target
/// proficiency; Low = desirable only. Declaration order doubles as sort
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: SkillId,
    pub priority: GapPriority,
    /// Current proficiency, 0–100.
    pub current_level: u8,
    /// Target proficiency; always >= current_level.
    pub target_level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedProject {
    pub id: String,
    pub title: String,
    pub skills_matched: usize,
    /// Predicted engagement, 0–100.
    pub engagement: f64,
    /// skills_matched × engagement; the ranking key.
    pub score: f64,
    pub estimated_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedCourse {
    pub id: String,
    pub title: String,
    pub provider: String,
    pub hours: u32,
    /// Blend of skill overlap and description similarity, 0–1.
    pub match_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub micro_projects: Vec<RankedProject>,
    pub courses: Vec<RankedCourse>,
    /// Imperative next actions for the highest-priority gaps.
    pub next_steps: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthWindow {
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Milestone {
    pub title: String,
    pub window: MonthWindow,
    pub tasks: Vec<String>,
    pub skills: Vec<SkillId>,
}

/// Ordered, non-empty milestone sequence with non-decreasing windows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roadmap {
    pub from_role: String,
    pub to_role: String,
    pub milestones: Vec<Milestone>,
    /// End of the last non-empty milestone window, in months.
    pub total_months: u32,
}
