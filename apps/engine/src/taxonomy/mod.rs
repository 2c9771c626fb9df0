//! Skill taxonomy — maps free-form skill strings to canonical identifiers.
//!
//! Matching order: exact case-insensitive lookup over canonical ids and
//! display names, then the alias table, then fuzzy matching by normalized
//! edit-similarity. Ambiguous fuzzy matches resolve to no match so callers
//! can surface "unrecognized skill" instead of guessing.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use strsim::normalized_levenshtein;

/// Canonical skill identifier (lowercase snake-case, e.g. `machine_learning`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    pub fn new(id: impl Into<String>) -> Self {
        SkillId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One taxonomy entry as loaded from the static catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Static skill taxonomy. Pure lookups, no mutation after construction.
pub struct SkillTaxonomy {
    records: HashMap<SkillId, SkillRecord>,
    /// Lowercased canonical id and display name -> id.
    exact: HashMap<String, SkillId>,
    /// Lowercased alias -> id.
    aliases: HashMap<String, SkillId>,
    threshold: f64,
    ambiguity_band: f64,
}

impl SkillTaxonomy {
    pub fn new(records: Vec<SkillRecord>, threshold: f64, ambiguity_band: f64) -> Self {
        let mut exact = HashMap::new();
        let mut aliases = HashMap::new();
        let mut by_id = HashMap::new();

        for record in records {
            let id = SkillId::new(record.id.clone());
            exact.insert(record.id.to_lowercase(), id.clone());
            exact.insert(record.name.to_lowercase(), id.clone());
            for alias in &record.aliases {
                aliases.insert(alias.to_lowercase(), id.clone());
            }
            by_id.insert(id, record);
        }

        Self {
            records: by_id,
            exact,
            aliases,
            threshold,
            ambiguity_band,
        }
    }

    /// Normalizes a raw skill string to its canonical id.
    ///
    /// Returns `None` for unrecognized input and for ambiguous fuzzy matches
    /// (two distinct candidates within the ambiguity band of the top score).
    pub fn normalize(&self, raw: &str) -> Option<SkillId> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        if let Some(id) = self.exact.get(&needle) {
            return Some(id.clone());
        }
        if let Some(id) = self.aliases.get(&needle) {
            return Some(id.clone());
        }

        self.fuzzy_match(&needle)
    }

    /// Splits raw skill strings into recognized canonical ids and
    /// unrecognized originals, preserving input order and deduplicating ids.
    pub fn normalize_all(&self, raw_skills: &[String]) -> (Vec<SkillId>, Vec<String>) {
        let mut recognized = Vec::new();
        let mut unrecognized = Vec::new();

        for raw in raw_skills {
            match self.normalize(raw) {
                Some(id) => {
                    if !recognized.contains(&id) {
                        recognized.push(id);
                    }
                }
                None => unrecognized.push(raw.clone()),
            }
        }

        (recognized, unrecognized)
    }

    pub fn display_name(&self, id: &SkillId) -> Option<&str> {
        self.records.get(id).map(|r| r.name.as_str())
    }

    pub fn description(&self, id: &SkillId) -> Option<&str> {
        self.records.get(id).map(|r| r.description.as_str())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Best fuzzy candidate by normalized edit-similarity over canonical ids
    /// and display names. A candidate must clear the threshold, and the
    /// runner-up for a different skill must trail by at least the ambiguity
    /// band.
    fn fuzzy_match(&self, needle: &str) -> Option<SkillId> {
        let mut best_by_id: HashMap<&SkillId, f64> = HashMap::new();
        for (key, id) in &self.exact {
            let similarity = normalized_levenshtein(needle, key);
            let entry = best_by_id.entry(id).or_insert(0.0);
            if similarity > *entry {
                *entry = similarity;
            }
        }

        let mut ranked: Vec<(&SkillId, f64)> = best_by_id.into_iter().collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        let (best_id, best_sim) = ranked.first()?;
        if *best_sim < self.threshold {
            return None;
        }
        if let Some((_, runner_sim)) = ranked.get(1) {
            if best_sim - runner_sim < self.ambiguity_band {
                return None; // ambiguous — let the caller surface it
            }
        }
        Some((*best_id).clone())
    }
}
