//! The student profile as the front end edits it, and the two places it lives:
//! the local cache ([`cache`]) and the remote `students` row ([`sync`]).

use serde::{Deserialize, Serialize};

pub mod cache;
pub mod store;
pub mod sync;

/// Fixed key the profile record is stored under.
pub const PROFILE_CACHE_KEY: &str = "gradmate-profile";

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProfileData {
    pub name: String,
    pub school: String,
    pub major: String,
    pub minor: String,
    pub gpa: String,
    pub certifications: Vec<String>,
    pub projects: String,
}

impl ProfileData {
    /// True when at least one field carries something other than whitespace.
    pub fn has_profile_data(&self) -> bool {
        [
            &self.name,
            &self.school,
            &self.major,
            &self.minor,
            &self.gpa,
            &self.projects,
        ]
        .iter()
        .any(|field| !field.trim().is_empty())
            || self.certifications.iter().any(|cert| !cert.trim().is_empty())
    }

    /// Certifications worth showing, in entry order. Blank entries are skipped.
    pub fn certification_badges(&self) -> Vec<&str> {
        self.certifications
            .iter()
            .filter(|cert| !cert.trim().is_empty())
            .map(|cert| cert.as_str())
            .collect()
    }

    /// First line of the projects text, if there is one.
    pub fn first_project_line(&self) -> Option<&str> {
        self.projects
            .split('\n')
            .next()
            .filter(|line| !line.trim().is_empty())
    }
}
