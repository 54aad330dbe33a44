use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const TABLE_NAME: &str = "public.professors";

#[derive(Clone, Debug, Deserialize, Serialize, FromRow, PartialEq)]
pub struct Professor {
    pub id: Uuid,
    pub lab_id: Uuid,
    pub name: String,
    pub email: String,
    pub title: String,
}
