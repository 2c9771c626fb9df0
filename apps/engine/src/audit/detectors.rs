//! The four standard bias detectors. Each is a pure function of the profile
//! with its penalty table injected, so thresholds stay visible configuration
//! rather than hidden literals.

use chrono::{Datelike, Utc};
use regex::Regex;

use crate::models::profile::Profile;

use super::{BiasDetector, Finding};

const GENDERED_TERMS: &[&str] = &[
    "he",
    "she",
    "his",
    "her",
    "hers",
    "him",
    "himself",
    "herself",
    "chairman",
    "salesman",
    "manpower",
    "mankind",
    "businessman",
    "spokesman",
];

const NON_INCLUSIVE_TERMS: &[&str] = &[
    "native speaker",
    "cultural fit",
    "rockstar",
    "ninja",
    "guru",
    "blacklist",
    "whitelist",
    "grandfathered",
    "sanity check",
    "man hours",
];

const PRESTIGE_MARKERS: &[&str] = &[
    "ivy league",
    "prestigious",
    "elite",
    "top-tier",
    "top tier",
    "world-renowned",
    "oxbridge",
];

fn penalized_score(penalty: u32, hits: u32) -> u32 {
    100u32.saturating_sub(penalty.saturating_mul(hits))
}

// ────────────────────────────────────────────────────────────────────────────
// Gender
// ────────────────────────────────────────────────────────────────────────────

pub struct GenderBiasDetector {
    penalty: u32,
    pattern: Regex,
}

impl GenderBiasDetector {
    pub fn new(penalty: u32) -> Self {
        let alternation = GENDERED_TERMS.join("|");
        Self {
            penalty,
            pattern: Regex::new(&format!(r"\b(?:{alternation})\b")).expect("static pattern"),
        }
    }
}

impl BiasDetector for GenderBiasDetector {
    fn category(&self) -> &'static str {
        "gender"
    }

    fn detect(&self, profile: &Profile) -> Finding {
        let text = profile.free_text().to_lowercase();
        let mut flags: Vec<String> = Vec::new();
        let mut hits = 0u32;

        for term in GENDERED_TERMS {
            let count = self
                .pattern
                .find_iter(&text)
                .filter(|m| m.as_str() == *term)
                .count() as u32;
            if count > 0 {
                hits += count;
                flags.push(format!("'{term}' ×{count}"));
            }
        }

        Finding {
            score: penalized_score(self.penalty, hits),
            flags,
        }
    }

    fn recommendation(&self, flags: &[String]) -> String {
        format!(
            "Replace gendered terms ({}) with neutral phrasing such as 'they' or role titles.",
            flags.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Age
// ────────────────────────────────────────────────────────────────────────────

pub struct AgeBiasDetector {
    penalty: u32,
    lookback_years: i32,
    reference_year: i32,
    birth_year: Regex,
    explicit_age: Regex,
}

impl AgeBiasDetector {
    pub fn new(penalty: u32, lookback_years: i32) -> Self {
        Self::with_reference_year(penalty, lookback_years, Utc::now().year())
    }

    /// Pins the reference year; the production constructor uses today's.
    pub fn with_reference_year(penalty: u32, lookback_years: i32, reference_year: i32) -> Self {
        Self {
            penalty,
            lookback_years,
            reference_year,
            birth_year: Regex::new(r"\b(?:born(?:\s+in)?|date of birth[:\s]*)\s*(\d{4})\b")
                .expect("static pattern"),
            explicit_age: Regex::new(r"\bage[:\s]+\d{1,2}\b").expect("static pattern"),
        }
    }
}

impl BiasDetector for AgeBiasDetector {
    fn category(&self) -> &'static str {
        "age"
    }

    fn detect(&self, profile: &Profile) -> Finding {
        let text = profile.free_text().to_lowercase();
        let mut flags: Vec<String> = Vec::new();

        for capture in self.birth_year.captures_iter(&text) {
            flags.push(format!("birth year {}", &capture[1]));
        }
        if self.explicit_age.is_match(&text) {
            flags.push("explicit age statement".to_string());
        }

        let cutoff = self.reference_year - self.lookback_years;
        for entry in &profile.education {
            if let Some(year) = entry.year {
                if year < cutoff {
                    flags.push(format!(
                        "graduation year {year} predates the {}-year window",
                        self.lookback_years
                    ));
                }
            }
        }

        Finding {
            score: penalized_score(self.penalty, flags.len() as u32),
            flags,
        }
    }

    fn recommendation(&self, flags: &[String]) -> String {
        format!(
            "Remove age-revealing details ({}); lead with recent, relevant experience instead.",
            flags.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cultural
// ────────────────────────────────────────────────────────────────────────────

pub struct CulturalBiasDetector {
    penalty: u32,
}

impl CulturalBiasDetector {
    pub fn new(penalty: u32) -> Self {
        Self { penalty }
    }
}

impl BiasDetector for CulturalBiasDetector {
    fn category(&self) -> &'static str {
        "cultural"
    }

    fn detect(&self, profile: &Profile) -> Finding {
        let text = profile.free_text().to_lowercase();
        let mut flags: Vec<String> = Vec::new();
        let mut hits = 0u32;

        for term in NON_INCLUSIVE_TERMS {
            let count = text.matches(term).count() as u32;
            if count > 0 {
                hits += count;
                flags.push(format!("'{term}' ×{count}"));
            }
        }

        Finding {
            score: penalized_score(self.penalty, hits),
            flags,
        }
    }

    fn recommendation(&self, flags: &[String]) -> String {
        format!(
            "Reword non-inclusive idioms ({}) in plain, inclusive language.",
            flags.join(", ")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Socioeconomic
// ────────────────────────────────────────────────────────────────────────────

/// Flags reliance on institution-prestige signals disproportionate to
/// skill/achievement evidence — a ratio heuristic, not a judgment on any
/// single mention.
pub struct SocioeconomicBiasDetector {
    penalty: u32,
    ratio_limit: f64,
}

impl SocioeconomicBiasDetector {
    pub fn new(penalty: u32, ratio_limit: f64) -> Self {
        Self {
            penalty,
            ratio_limit,
        }
    }
}

impl BiasDetector for SocioeconomicBiasDetector {
    fn category(&self) -> &'static str {
        "socioeconomic"
    }

    fn detect(&self, profile: &Profile) -> Finding {
        let text = profile.free_text().to_lowercase();

        let mut prestige_hits = 0u32;
        let mut markers: Vec<String> = Vec::new();
        for marker in PRESTIGE_MARKERS {
            let count = text.matches(marker).count() as u32;
            if count > 0 {
                prestige_hits += count;
                markers.push(format!("'{marker}' ×{count}"));
            }
        }

        let achievement_signals =
            (profile.skills.len() + profile.quantified_achievements()).max(1);
        let ratio = f64::from(prestige_hits) / achievement_signals as f64;

        if prestige_hits == 0 || ratio <= self.ratio_limit {
            return Finding {
                score: 100,
                flags: vec![],
            };
        }

        let mut flags = markers;
        flags.push(format!(
            "prestige/achievement ratio {ratio:.2} exceeds {:.2}",
            self.ratio_limit
        ));
        Finding {
            score: penalized_score(self.penalty, prestige_hits),
            flags,
        }
    }

    fn recommendation(&self, flags: &[String]) -> String {
        format!(
            "Balance institution-prestige emphasis ({}) with concrete skill and achievement \
             evidence.",
            flags.join(", ")
        )
    }
}
