use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use sqlx::FromRow;
use uuid::Uuid;

pub const TABLE_NAME: &str = "public.students";

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub gpa: Option<String>,
    pub resume_url: Option<String>,
    pub certifications: Option<Vec<String>>,
    pub projects: Option<String>,
    pub created_at: DateTime<FixedOffset>,
}

/// Profile columns a publish writes. Empty form fields arrive here as `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentProfileUpdate {
    pub name: Option<String>,
    pub school: Option<String>,
    pub major: Option<String>,
    pub minor: Option<String>,
    pub gpa: Option<String>,
    pub certifications: Option<Vec<String>>,
    pub projects: Option<String>,
}
