//! Strength sub-score — weighted evidence factors, each normalized to
//! [0, 1] by a fixed cap before weighting.

use crate::models::profile::Profile;

use super::round1;

const EDUCATION_WEIGHT: f64 = 0.20;
const EXPERIENCE_WEIGHT: f64 = 0.30;
const PROJECTS_WEIGHT: f64 = 0.20;
const SKILLS_WEIGHT: f64 = 0.20;
const CERTIFICATIONS_WEIGHT: f64 = 0.10;

const EXPERIENCE_CAP_YEARS: f64 = 10.0;
const PROJECT_EVIDENCE_CAP: f64 = 5.0;
const SKILL_COUNT_CAP: f64 = 10.0;
const CERTIFICATION_CAP: f64 = 3.0;

#[derive(Debug, Clone, Copy)]
pub struct StrengthFactors {
    pub education: f64,
    pub experience: f64,
    pub projects: f64,
    pub skills: f64,
    pub certifications: f64,
}

/// Computes the strength score (0–100) and its explanation from the profile
/// evidence. The explanation cites the same inputs the number came from.
pub fn strength_score(profile: &Profile) -> (f64, String) {
    let years = profile.years_of_experience();
    let quantified = profile.quantified_achievements();
    let (education_factor, education_label) = education_factor(profile);

    let factors = StrengthFactors {
        education: education_factor,
        experience: (years / EXPERIENCE_CAP_YEARS).min(1.0),
        projects: (quantified as f64 / PROJECT_EVIDENCE_CAP).min(1.0),
        skills: (profile.skills.len() as f64 / SKILL_COUNT_CAP).min(1.0),
        certifications: (profile.certifications.len() as f64 / CERTIFICATION_CAP).min(1.0),
    };

    let score = 100.0
        * (EDUCATION_WEIGHT * factors.education
            + EXPERIENCE_WEIGHT * factors.experience
            + PROJECTS_WEIGHT * factors.projects
            + SKILLS_WEIGHT * factors.skills
            + CERTIFICATIONS_WEIGHT * factors.certifications);

    let explanation = format!(
        "Strength {:.1}%: {:.1} years of experience (capped at {:.0}), education: {}, \
         {} skills listed, {} quantified achievements, {} certifications.",
        round1(score),
        years,
        EXPERIENCE_CAP_YEARS,
        education_label,
        profile.skills.len(),
        quantified,
        profile.certifications.len(),
    );

    (score, explanation)
}

/// Highest-degree tier. Any credential beats none; advanced degrees rank
/// above a bachelor's.
fn education_factor(profile: &Profile) -> (f64, &'static str) {
    let mut best = if profile.education.is_empty() {
        (0.0, "none listed")
    } else {
        (0.5, "other credential")
    };

    for entry in &profile.education {
        let degree = entry.degree.to_lowercase();
        let tier = if degree.contains("phd") || degree.contains("doctor") {
            (1.0, "doctorate")
        } else if degree.contains("master") || degree.contains("msc") || degree.contains("mba") {
            (0.85, "master's")
        } else if degree.contains("bachelor")
            || degree.contains("bsc")
            || degree.contains("b.s")
            || degree.contains("b.a")
            || degree.contains("beng")
        {
            (0.7, "bachelor's")
        } else {
            (0.5, "other credential")
        };
        if tier.0 > best.0 {
            best = tier;
        }
    }
    best
}
