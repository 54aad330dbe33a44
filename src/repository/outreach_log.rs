use chrono::{DateTime, FixedOffset};
use sqlx::{FromRow, Postgres, Transaction};
use uuid::Uuid;

use crate::model::{
    lab::{Lab, TABLE_NAME as LAB_TABLE_NAME},
    outreach_log::{OutreachLog, OutreachLogDetail, TABLE_NAME},
    professor::{Professor, TABLE_NAME as PROFESSOR_TABLE_NAME},
};

#[derive(FromRow)]
struct OutreachLogJoinRow {
    id: Uuid,
    student_id: Uuid,
    lab_id: Uuid,
    professor_id: Uuid,
    message: String,
    sent_at: DateTime<FixedOffset>,
    lab_school: Option<String>,
    lab_name: Option<String>,
    lab_research_area: Option<String>,
    lab_description: Option<String>,
    lab_created_at: Option<DateTime<FixedOffset>>,
    professor_name: Option<String>,
    professor_email: Option<String>,
    professor_title: Option<String>,
}

impl From<OutreachLogJoinRow> for OutreachLogDetail {
    fn from(row: OutreachLogJoinRow) -> Self {
        let lab = match (
            row.lab_school,
            row.lab_name,
            row.lab_research_area,
            row.lab_description,
            row.lab_created_at,
        ) {
            (Some(school), Some(name), Some(research_area), Some(description), Some(created_at)) => {
                Some(Lab {
                    id: row.lab_id,
                    school,
                    name,
                    research_area,
                    description,
                    created_at,
                })
            }
            _ => None,
        };
        let professor = match (row.professor_name, row.professor_email, row.professor_title) {
            (Some(name), Some(email), Some(title)) => Some(Professor {
                id: row.professor_id,
                lab_id: row.lab_id,
                name,
                email,
                title,
            }),
            _ => None,
        };
        OutreachLogDetail {
            log: OutreachLog {
                id: row.id,
                student_id: row.student_id,
                lab_id: row.lab_id,
                professor_id: row.professor_id,
                message: row.message,
                sent_at: row.sent_at,
            },
            lab,
            professor,
        }
    }
}

/// Outreach logs of one student with their lab and professor, newest first.
pub async fn get_outreach_log_detail_by_student(
    tx: &mut Transaction<'_, Postgres>,
    student_id: &Uuid,
) -> anyhow::Result<Vec<OutreachLogDetail>> {
    let rows: Vec<OutreachLogJoinRow> = sqlx::query_as(
        format!(
            r#"SELECT o.id, o.student_id, o.lab_id, o.professor_id, o.message, o.sent_at,
            l.school AS lab_school, l.name AS lab_name, l.research_area AS lab_research_area,
            l.description AS lab_description, l.created_at AS lab_created_at,
            p.name AS professor_name, p.email AS professor_email, p.title AS professor_title
            FROM {} o
            LEFT JOIN {} l ON l.id = o.lab_id
            LEFT JOIN {} p ON p.id = o.professor_id
            WHERE o.student_id = $1
            ORDER BY o.sent_at DESC"#,
            TABLE_NAME, LAB_TABLE_NAME, PROFESSOR_TABLE_NAME
        )
        .as_str(),
    )
    .bind(student_id)
    .fetch_all(&mut **tx)
    .await?;
    Ok(rows.into_iter().map(OutreachLogDetail::from).collect())
}

pub async fn create_outreach_log(
    tx: &mut Transaction<'_, Postgres>,
    student_id: &Uuid,
    lab_id: &Uuid,
    professor_id: &Uuid,
    message: &str,
) -> anyhow::Result<OutreachLog> {
    let data: OutreachLog = sqlx::query_as(
        format!(
            r#"INSERT INTO {} (id, student_id, lab_id, professor_id, message)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(Uuid::now_v7())
    .bind(student_id)
    .bind(lab_id)
    .bind(professor_id)
    .bind(message)
    .fetch_one(&mut **tx)
    .await?;
    Ok(data)
}
