use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{lab::Lab, professor::Professor};

pub const TABLE_NAME: &str = "public.outreach_logs";

#[derive(Clone, Debug, Deserialize, Serialize, FromRow, PartialEq)]
pub struct OutreachLog {
    pub id: Uuid,
    pub student_id: Uuid,
    pub lab_id: Uuid,
    pub professor_id: Uuid,
    pub message: String,
    pub sent_at: DateTime<FixedOffset>,
}

/// An outreach log together with the lab and professor it points at.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct OutreachLogDetail {
    pub log: OutreachLog,
    pub lab: Option<Lab>,
    pub professor: Option<Professor>,
}

impl From<OutreachLog> for OutreachLogDetail {
    fn from(log: OutreachLog) -> Self {
        Self {
            log,
            lab: None,
            professor: None,
        }
    }
}
