use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TABLE_NAME: &str = "public.essay_ideas";

#[derive(Clone, Debug, Deserialize, Serialize, FromRow, PartialEq)]
pub struct EssayIdea {
    pub id: Uuid,
    pub student_id: Uuid,
    pub title: String,
    pub description: String,
    pub personal_connection: String,
    pub key_points: Vec<String>,
    pub approach: String,
    pub created_at: DateTime<FixedOffset>,
}

/// Idea content as produced by a generator or typed by the student, before it
/// is tied to a student row.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct NewEssayIdea {
    pub title: String,
    pub description: String,
    pub personal_connection: String,
    pub key_points: Vec<String>,
    pub approach: String,
}
