use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TABLE_NAME: &str = "public.labs";

#[derive(Clone, Debug, Deserialize, Serialize, FromRow, PartialEq)]
pub struct Lab {
    pub id: Uuid,
    pub school: String,
    pub name: String,
    pub research_area: String,
    pub description: String,
    pub created_at: DateTime<FixedOffset>,
}
