use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::taxonomy::{SkillId, SkillTaxonomy};

/// Normalized candidate record, produced by the external parser and owned by
/// the caller for the duration of one evaluation. No engine component
/// mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    #[serde(default)]
    pub summary: Option<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<SkillClaim>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub title: String,
    pub organization: String,
    pub start: NaiveDate,
    /// None = current position.
    #[serde(default)]
    pub end: Option<NaiveDate>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    #[serde(default)]
    pub year: Option<i32>,
}

/// A canonical skill held by the candidate, with optional self-reported
/// proficiency on a 0–100 scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillClaim {
    pub id: SkillId,
    #[serde(default)]
    pub proficiency: Option<u8>,
}

impl Profile {
    pub fn has_skill(&self, id: &SkillId) -> bool {
        self.skills.iter().any(|claim| claim.id == *id)
    }

    pub fn proficiency(&self, id: &SkillId) -> Option<u8> {
        self.skills
            .iter()
            .find(|claim| claim.id == *id)
            .and_then(|claim| claim.proficiency)
    }

    /// Concatenated free text of the profile — summary, experience entries,
    /// education lines, certifications. Feeds relevance scoring and the
    /// fairness detectors.
    pub fn free_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(summary) = &self.summary {
            parts.push(summary.clone());
        }
        for entry in &self.experience {
            parts.push(format!(
                "{} at {}. {}",
                entry.title, entry.organization, entry.description
            ));
        }
        for entry in &self.education {
            match entry.year {
                Some(year) => parts.push(format!(
                    "{}, {} ({})",
                    entry.degree, entry.institution, year
                )),
                None => parts.push(format!("{}, {}", entry.degree, entry.institution)),
            }
        }
        parts.extend(self.certifications.iter().cloned());
        parts.join("\n")
    }

    /// Total professional experience in years, summed over entries. Open
    /// entries are counted up to today.
    pub fn years_of_experience(&self) -> f64 {
        let today = Utc::now().naive_utc().date();
        self.experience
            .iter()
            .map(|entry| months_between(entry.start, entry.end.unwrap_or(today)) / 12.0)
            .sum()
    }

    /// Number of experience description lines carrying a concrete metric
    /// (digit, percent, or currency). A density proxy for project evidence.
    pub fn quantified_achievements(&self) -> usize {
        self.experience
            .iter()
            .flat_map(|entry| entry.description.lines())
            .filter(|line| {
                line.chars()
                    .any(|c| c.is_ascii_digit() || c == '%' || c == '$')
            })
            .count()
    }
}

/// Profile as handed over by the external parser: identical shape except
/// skills are still free-form strings. `resolve` normalizes them against the
/// taxonomy, returning the canonical profile plus the unrecognized raw
/// strings for the caller to surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub summary: Option<String>,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<RawSkill>,
    #[serde(default)]
    pub certifications: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSkill {
    pub name: String,
    #[serde(default)]
    pub proficiency: Option<u8>,
}

impl RawProfile {
    pub fn resolve(self, taxonomy: &SkillTaxonomy) -> (Profile, Vec<String>) {
        let mut skills: Vec<SkillClaim> = Vec::new();
        let mut unrecognized = Vec::new();

        for raw in self.skills {
            match taxonomy.normalize(&raw.name) {
                Some(id) => {
                    if !skills.iter().any(|claim| claim.id == id) {
                        skills.push(SkillClaim {
                            id,
                            proficiency: raw.proficiency,
                        });
                    }
                }
                None => unrecognized.push(raw.name),
            }
        }

        let profile = Profile {
            id: Uuid::new_v4(),
            summary: self.summary,
            experience: self.experience,
            education: self.education,
            skills,
            certifications: self.certifications,
        };
        (profile, unrecognized)
    }
}

fn months_between(start: NaiveDate, end: NaiveDate) -> f64 {
    let years = end.year() - start.year();
    let months = end.month() as i32 - start.month() as i32;
    let total = years * 12 + months;
    let day_frac = (end.day() as f64 - start.day() as f64) / 30.0;
    (total as f64 + day_frac).max(0.0)
}
