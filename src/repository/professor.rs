use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::professor::{Professor, TABLE_NAME},
};

pub async fn get_professor_by_lab(
    tx: &mut Transaction<'_, Postgres>,
    lab_id: &Uuid,
) -> anyhow::Result<Vec<Professor>> {
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &["lab_id = $1".to_string()],
        vec!["name ASC".to_string()],
    );
    let data = binds_query_as::<Professor>(&stmt, vec![SqlxBinds::Uuid(*lab_id)])
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_professor_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: &Uuid,
) -> anyhow::Result<Option<Professor>> {
    let stmt = query_builder(None, TABLE_NAME, &["id = $1".to_string()], vec![]);
    let data = binds_query_as::<Professor>(&stmt, vec![SqlxBinds::Uuid(*id)])
        .fetch_optional(&mut **tx)
        .await?;
    Ok(data)
}
