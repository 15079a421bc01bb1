//! Reference entities: shared lookup rows that owner entities point at
//! through association links. They are created independently and never
//! owned by the entities referencing them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A technology a service or project can be tagged with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceTech {
    pub id: Uuid,
    pub name: String,
}

/// A deliverable a service can include.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceOffering {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Mentor {
    pub id: Uuid,
    pub name: String,
    pub photo_url: Option<String>,
}

impl Mentor {
    /// Mentor names are stored trimmed and lowercased; uniqueness is
    /// checked against the normalized form.
    pub fn normalize_name(raw: &str) -> String {
        raw.trim().to_lowercase()
    }
}

/// Partial mentor update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MentorPatch {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

impl Mentor {
    pub fn apply(&mut self, patch: &MentorPatch) {
        if let Some(name) = &patch.name {
            self.name = Mentor::normalize_name(name);
        }
        if let Some(photo_url) = &patch.photo_url {
            self.photo_url = Some(photo_url.clone());
        }
    }
}
