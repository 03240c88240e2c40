//! Job board data models

use serde::{Deserialize, Serialize};

/// A job posting. Text fields default to empty strings so partially filled
/// postings never break downstream scoring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobRecord {
    pub id: usize,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub recruiter_id: usize,
    /// Creation time in unix seconds.
    pub created: i64,
}

/// Fields accepted when a recruiter posts a new job.
#[derive(Clone, Debug, Deserialize)]
pub struct NewJob {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
}

/// Partial update of a job posting. Omitted or empty fields keep the stored
/// value, matching the fallback semantics of the update endpoint.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct JobPatch {
    pub title: Option<String>,
    pub company: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

impl JobPatch {
    pub fn apply_to(self, job: &mut JobRecord) {
        fn pick(new: Option<String>, old: &mut String) {
            if let Some(value) = new {
                if !value.is_empty() {
                    *old = value;
                }
            }
        }
        pick(self.title, &mut job.title);
        pick(self.company, &mut job.company);
        pick(self.category, &mut job.category);
        pick(self.location, &mut job.location);
        pick(self.description, &mut job.description);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ApplicationStatus::Pending),
            "accepted" => Some(ApplicationStatus::Accepted),
            "rejected" => Some(ApplicationStatus::Rejected),
            _ => None,
        }
    }
}

/// A candidate's application to a job.
#[derive(Clone, Debug, Serialize)]
pub struct ApplicationRecord {
    pub id: usize,
    pub job_id: usize,
    pub candidate_id: usize,
    pub resume_url: Option<String>,
    pub status: ApplicationStatus,
    /// Creation time in unix seconds.
    pub created: i64,
}

/// An application with its job resolved. The job is optional so history rows
/// pointing at vanished postings degrade gracefully instead of failing the
/// whole fetch.
#[derive(Clone, Debug, Serialize)]
pub struct CandidateApplication {
    pub application: ApplicationRecord,
    pub job: Option<JobRecord>,
}

/// An application to one of a recruiter's jobs.
#[derive(Clone, Debug, Serialize)]
pub struct RecruiterApplication {
    pub application: ApplicationRecord,
    pub job: JobRecord,
}
