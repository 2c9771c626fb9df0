//! Static catalog loading — the skill taxonomy and the role-profile catalog,
//! both plain JSON records curated offline.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::errors::EngineError;
use crate::models::role::RoleProfile;
use crate::taxonomy::{SkillRecord, SkillTaxonomy};

/// Role catalog keyed by lowercase role name.
pub struct RoleCatalog {
    roles: HashMap<String, RoleProfile>,
}

impl RoleCatalog {
    pub fn from_records(records: Vec<RoleProfile>) -> Self {
        let roles = records
            .into_iter()
            .map(|role| (role.name.to_lowercase(), role))
            .collect();
        Self { roles }
    }

    pub fn get(&self, name: &str) -> Result<&RoleProfile, EngineError> {
        self.roles
            .get(&name.trim().to_lowercase())
            .ok_or_else(|| EngineError::UnknownRole(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.values().map(|role| role.name.as_str()).collect();
        names.sort();
        names
    }

    /// Mutable pass over the roles — used once at bootstrap to fill in
    /// embeddings for records that ship without one.
    pub fn roles_mut(&mut self) -> impl Iterator<Item = &mut RoleProfile> {
        self.roles.values_mut()
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

pub fn load_roles(path: &Path) -> Result<RoleCatalog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read role catalog '{}'", path.display()))?;
    let records: Vec<RoleProfile> = serde_json::from_str(&raw)
        .with_context(|| format!("Malformed role catalog '{}'", path.display()))?;
    info!("Role catalog loaded: {} roles", records.len());
    Ok(RoleCatalog::from_records(records))
}

pub fn load_taxonomy(path: &Path, threshold: f64, ambiguity_band: f64) -> Result<SkillTaxonomy> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read taxonomy '{}'", path.display()))?;
    let records: Vec<SkillRecord> = serde_json::from_str(&raw)
        .with_context(|| format!("Malformed taxonomy '{}'", path.display()))?;
    info!("Skill taxonomy loaded: {} skills", records.len());
    Ok(SkillTaxonomy::new(records, threshold, ambiguity_band))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_role_lookup_is_case_insensitive() {
        let catalog = RoleCatalog::from_records(vec![RoleProfile {
            name: "Data Scientist".to_string(),
            description: String::new(),
            required: vec![],
            embedding: vec![],
        }]);
        assert!(catalog.get("data scientist").is_ok());
        assert!(catalog.get("  DATA SCIENTIST ").is_ok());
        let err = catalog.get("astronaut").unwrap_err();
        assert!(matches!(err, EngineError::UnknownRole(_)));
    }

    #[test]
    fn test_load_roles_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{
                    "name": "Data Analyst",
                    "description": "sql and dashboards",
                    "required": [
                        {{"id": "sql", "requirement": "essential"}},
                        {{"id": "excel", "requirement": "desirable"}}
                    ]
                }}
            ]"#
        )
        .unwrap();

        let catalog = load_roles(file.path()).unwrap();
        let role = catalog.get("Data Analyst").unwrap();
        assert_eq!(role.essential().count(), 1);
        assert!(role.embedding.is_empty(), "embedding filled at bootstrap");
    }

    #[test]
    fn test_load_taxonomy_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": "sql", "name": "SQL", "aliases": ["postgres"]}}
            ]"#
        )
        .unwrap();

        let taxonomy = load_taxonomy(file.path(), 0.85, 0.02).unwrap();
        assert_eq!(taxonomy.len(), 1);
        assert!(taxonomy.normalize("postgres").is_some());
    }
}
