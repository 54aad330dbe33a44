use chrono::Local;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{core::security::hash_password, model::user::User, repository};

pub async fn create_user(pool: &PgPool, username: &str, password: &str) -> anyhow::Result<User> {
    let mut tx = pool.begin().await?;
    if repository::user::get_user_by_username(&mut tx, username)
        .await?
        .is_some()
    {
        anyhow::bail!("user {} already exists", username);
    }

    let hashed_password = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let now = Local::now().fixed_offset();
    let user = User {
        id: Uuid::now_v7(),
        user_name: username.to_string(),
        password: hashed_password,
        created_date: Some(now),
        updated_date: Some(now),
    };
    repository::user::create_user(&mut tx, &user).await?;
    tx.commit().await?;
    Ok(user)
}

#[cfg(test)]
mod tests {
    use sqlx::PgPool;

    use crate::{cli::auth::create_user, core::security::verify_hash_password};

    #[sqlx::test]
    async fn test_create_user(pool: PgPool) -> anyhow::Result<()> {
        // When
        let username = "test";
        let password = "test";
        let user = create_user(&pool, username, password).await?;

        // Expect
        let db_res: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT user_name, password
            FROM public.user
            WHERE id = $1
            "#,
        )
        .bind(user.id)
        .fetch_optional(&pool)
        .await?;
        assert!(db_res.is_some());
        let (user_name, hashed) = db_res.unwrap();
        assert_eq!(user_name, username);
        assert!(verify_hash_password(password, &hashed).map_err(|e| anyhow::anyhow!(e.to_string()))?);
        Ok(())
    }

    #[sqlx::test]
    async fn test_create_user_twice(pool: PgPool) -> anyhow::Result<()> {
        create_user(&pool, "test", "test").await?;
        let res = create_user(&pool, "test", "other").await;
        assert!(res.is_err());
        Ok(())
    }
}
