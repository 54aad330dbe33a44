use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::lab::{Lab, TABLE_NAME},
};

pub async fn get_all_lab(tx: &mut Transaction<'_, Postgres>) -> anyhow::Result<Vec<Lab>> {
    let stmt = query_builder(None, TABLE_NAME, &[], vec!["name ASC".to_string()]);
    let data = binds_query_as::<Lab>(&stmt, vec![])
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_lab_by_school(
    tx: &mut Transaction<'_, Postgres>,
    school: &str,
) -> anyhow::Result<Vec<Lab>> {
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &["school = $1".to_string()],
        vec!["name ASC".to_string()],
    );
    let data = binds_query_as::<Lab>(&stmt, vec![SqlxBinds::String(school.to_string())])
        .fetch_all(&mut **tx)
        .await?;
    Ok(data)
}

pub async fn get_lab_by_id(
    tx: &mut Transaction<'_, Postgres>,
    id: &Uuid,
) -> anyhow::Result<Option<Lab>> {
    let stmt = query_builder(None, TABLE_NAME, &["id = $1".to_string()], vec![]);
    let data = binds_query_as::<Lab>(&stmt, vec![SqlxBinds::Uuid(*id)])
        .fetch_optional(&mut **tx)
        .await?;
    Ok(data)
}
