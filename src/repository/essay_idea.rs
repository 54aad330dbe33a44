use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::essay_idea::{EssayIdea, NewEssayIdea, TABLE_NAME},
};

pub async fn get_essay_idea_by_student(
    tx: &mut Transaction<'_, Postgres>,
    student_id: &Uuid,
) -> anyhow::Result<Vec<EssayIdea>> {
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &["student_id = $1".to_string()],
        vec!["created_at DESC".to_string()],
    );
    let data = binds_query_as::<EssayIdea>(&stmt, vec![SqlxBinds::Uuid(*student_id)])
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn create_essay_idea(
    tx: &mut Transaction<'_, Postgres>,
    student_id: &Uuid,
    idea: &NewEssayIdea,
) -> anyhow::Result<EssayIdea> {
    let data: EssayIdea = sqlx::query_as(
        format!(
            r#"INSERT INTO {} (id, student_id, title, description, personal_connection, key_points, approach)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *"#,
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(Uuid::now_v7())
    .bind(student_id)
    .bind(&idea.title)
    .bind(&idea.description)
    .bind(&idea.personal_connection)
    .bind(&idea.key_points)
    .bind(&idea.approach)
    .fetch_one(&mut **tx)
    .await?;
    Ok(data)
}
