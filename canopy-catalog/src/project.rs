use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::reference::ServiceTech;

/// A portfolio project. Owner entity for tech association links; feedback
/// rows are owned children and die with the project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub photo_url: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub project_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn apply(&mut self, patch: &ProjectPatch) {
        if let Some(photo_url) = &patch.photo_url {
            self.photo_url = Some(photo_url.clone());
        }
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(project_link) = &patch.project_link {
            self.project_link = Some(project_link.clone());
        }
    }
}

/// Partial project update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectPatch {
    pub photo_url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub project_link: Option<String>,
}

/// Client feedback attached to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFeedback {
    pub id: Uuid,
    pub project_id: Uuid,
    pub client_name: String,
    pub client_photo: Option<String>,
    pub feedback_description: String,
    pub rating: i32,
    pub created_at: DateTime<Utc>,
}

impl ProjectFeedback {
    pub const MIN_RATING: i32 = 1;
    pub const MAX_RATING: i32 = 5;

    pub fn rating_in_range(rating: i32) -> bool {
        (Self::MIN_RATING..=Self::MAX_RATING).contains(&rating)
    }
}

/// A project together with its resolved techs and feedback, newest
/// feedback first.
#[derive(Debug, Clone)]
pub struct ProjectDetail {
    pub project: Project,
    pub techs: Vec<ServiceTech>,
    pub feedbacks: Vec<ProjectFeedback>,
}
