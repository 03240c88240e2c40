//! User account models

use serde::{Deserialize, Serialize};

/// The two account types of the board. Candidates browse, search and apply;
/// recruiters own postings and their applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Candidate,
    Recruiter,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Candidate => "candidate",
            UserRole::Recruiter => "recruiter",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "candidate" => Some(UserRole::Candidate),
            "recruiter" => Some(UserRole::Recruiter),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    pub id: usize,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_string_round_trip() {
        assert_eq!(UserRole::from_str("candidate"), Some(UserRole::Candidate));
        assert_eq!(UserRole::from_str("Recruiter"), Some(UserRole::Recruiter));
        assert_eq!(UserRole::from_str("admin"), None);
        assert_eq!(UserRole::Candidate.as_str(), "candidate");
    }
}
