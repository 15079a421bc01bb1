use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OpportunityType {
    Job,
    Internship,
}

impl OpportunityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityType::Job => "JOB",
            OpportunityType::Internship => "INTERNSHIP",
        }
    }
}

impl FromStr for OpportunityType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JOB" => Ok(OpportunityType::Job),
            "INTERNSHIP" => Ok(OpportunityType::Internship),
            other => Err(UnknownVariant {
                kind: "opportunity type",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobDetails {
    pub employment_type: Option<String>,
    pub salary_range: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct InternshipDetails {
    pub duration_months: Option<i32>,
    pub stipend: Option<String>,
}

/// Type-specific payload of an opportunity. The variant is fixed by the
/// opportunity's type, so a row can never carry the wrong detail table or
/// both at once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OpportunityDetails {
    Job(JobDetails),
    Internship(InternshipDetails),
}

impl OpportunityDetails {
    pub fn kind(&self) -> OpportunityType {
        match self {
            OpportunityDetails::Job(_) => OpportunityType::Job,
            OpportunityDetails::Internship(_) => OpportunityType::Internship,
        }
    }

    pub fn job(&self) -> Option<&JobDetails> {
        match self {
            OpportunityDetails::Job(details) => Some(details),
            OpportunityDetails::Internship(_) => None,
        }
    }

    pub fn internship(&self) -> Option<&InternshipDetails> {
        match self {
            OpportunityDetails::Internship(details) => Some(details),
            OpportunityDetails::Job(_) => None,
        }
    }
}

/// A job or internship posting, with its detail payload and ordered
/// requirement list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub details: OpportunityDetails,
    pub requirements: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Opportunity {
    pub fn apply(&mut self, patch: &OpportunityPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
    }
}

/// Partial update of an opportunity's scalar fields. The type is fixed at
/// creation and has no patch field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpportunityPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
}
