use serde::{Deserialize, Serialize};

use crate::taxonomy::SkillId;

/// Whether a role skill gates completeness or only shifts gap priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    Essential,
    Desirable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequiredSkill {
    pub id: SkillId,
    pub requirement: Requirement,
}

/// Target-occupation definition from the static role catalog. Read-only for
/// the lifetime of a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleProfile {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub required: Vec<RequiredSkill>,
    /// Semantic representation of the role description. May ship empty in
    /// the catalog, in which case the engine embeds the description at load.
    #[serde(default)]
    pub embedding: Vec<f32>,
}

impl RoleProfile {
    pub fn essential(&self) -> impl Iterator<Item = &SkillId> {
        self.required
            .iter()
            .filter(|skill| skill.requirement == Requirement::Essential)
            .map(|skill| &skill.id)
    }

    pub fn desirable(&self) -> impl Iterator<Item = &SkillId> {
        self.required
            .iter()
            .filter(|skill| skill.requirement == Requirement::Desirable)
            .map(|skill| &skill.id)
    }

    pub fn requirement_of(&self, id: &SkillId) -> Option<Requirement> {
        self.required
            .iter()
            .find(|skill| skill.id == *id)
            .map(|skill| skill.requirement)
    }
}
