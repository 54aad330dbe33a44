use chrono::{DateTime, FixedOffset};
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    core::{
        error::AppError,
        sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    },
    model::student::{Student, StudentProfileUpdate, TABLE_NAME},
};

pub async fn get_students_by_user_id(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<Vec<Student>> {
    let stmt = query_builder(None, TABLE_NAME, &["user_id = $1".to_string()], vec![]);
    let data = binds_query_as::<Student>(&stmt, vec![SqlxBinds::Uuid(*user_id)])
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

/// The one student row owned by `user_id`. Zero or several matches are both
/// [`AppError::NotFound`].
pub async fn get_single_student_by_user_id(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<Student> {
    let mut data = get_students_by_user_id(tx, user_id).await?;
    if data.len() != 1 {
        return Err(AppError::NotFound(format!(
            "student for user {} (matched {} rows)",
            user_id,
            data.len()
        ))
        .into());
    }
    Ok(data.remove(0))
}

/// Inserts an empty student row for `user_id` unless one exists, then returns
/// the row.
pub async fn create_student_if_absent(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
    now: &DateTime<FixedOffset>,
) -> anyhow::Result<Student> {
    sqlx::query(
        format!(
            r#"INSERT INTO {} (id, user_id, certifications, created_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO NOTHING"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind(Vec::<String>::new())
    .bind(now)
    .execute(&mut **tx)
    .await?;
    get_single_student_by_user_id(tx, user_id).await
}

pub async fn update_student_profile(
    tx: &mut Transaction<'_, Postgres>,
    student_id: &Uuid,
    profile: &StudentProfileUpdate,
) -> anyhow::Result<Student> {
    let data: Student = sqlx::query_as(
        format!(
            r#"UPDATE {}
            SET name = $1, school = $2, major = $3, minor = $4, gpa = $5,
            certifications = $6, projects = $7
            WHERE id = $8
            RETURNING *"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&profile.name)
    .bind(&profile.school)
    .bind(&profile.major)
    .bind(&profile.minor)
    .bind(&profile.gpa)
    .bind(&profile.certifications)
    .bind(&profile.projects)
    .bind(student_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(data)
}

/// Returns the number of rows touched; zero means the user has no student row.
pub async fn update_student_resume_url(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &Uuid,
    resume_url: &str,
) -> anyhow::Result<u64> {
    let res = sqlx::query(
        format!(
            "UPDATE {} SET resume_url = $1 WHERE user_id = $2",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(resume_url)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;
    Ok(res.rows_affected())
}
