use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberRole {
    Team,
    Intern,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Team => "TEAM",
            MemberRole::Intern => "INTERN",
        }
    }
}

impl FromStr for MemberRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEAM" => Ok(MemberRole::Team),
            "INTERN" => Ok(MemberRole::Intern),
            other => Err(UnknownVariant {
                kind: "member role",
                value: other.to_string(),
            }),
        }
    }
}

/// Public profile links, persisted as one JSON column.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SocialMedia {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
}

/// A person on the team or intern roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    pub role: MemberRole,
    pub photo_url: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn apply(&mut self, patch: &MemberPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(role) = patch.role {
            self.role = role;
        }
        if let Some(photo_url) = &patch.photo_url {
            self.photo_url = Some(photo_url.clone());
        }
        if let Some(position) = &patch.position {
            self.position = Some(position.clone());
        }
        if let Some(bio) = &patch.bio {
            self.bio = Some(bio.clone());
        }
        if let Some(social_media) = &patch.social_media {
            self.social_media = Some(social_media.clone());
        }
        if let Some(is_visible) = patch.is_visible {
            self.is_visible = is_visible;
        }
    }
}

/// Partial member update; `None` fields are left untouched. A supplied
/// `social_media` object replaces the stored one wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPatch {
    pub name: Option<String>,
    pub role: Option<MemberRole>,
    pub photo_url: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub social_media: Option<SocialMedia>,
    pub is_visible: Option<bool>,
}
