use super::security::{generate_refresh_token_from_user, generate_token_from_user};
use crate::core::security::hash_password;
use crate::core::session::add_session;
use crate::model::student::Student;
use crate::model::user::User;
use crate::settings::Config;
use crate::AppState;
use chrono::Local;
use fake::{Fake, Faker};
use redis::ConnectionLike;
use sqlx::pool::PoolConnection;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

pub fn generate_random<T: fake::Dummy<fake::Faker>>() -> T {
    Faker.fake()
}

pub struct TestUser {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// App state over the test pool, with files written under `storage_dir`.
pub fn test_app_state(
    pool: PgPool,
    config: &Config,
    storage_dir: &std::path::Path,
) -> anyhow::Result<Arc<AppState>> {
    let client = redis::Client::open(config.redis_url.clone())?;
    let redis_pool = r2d2::Pool::builder().build(client)?;
    let mut config = config.clone();
    config.storage_dir = storage_dir.to_string_lossy().to_string();
    config.generation_delay_ms = 0;
    Ok(Arc::new(AppState::new(pool, redis_pool, &config)))
}

pub async fn insert_user(
    db: &mut PoolConnection<Postgres>,
    username: &str,
    password: &str,
) -> anyhow::Result<User> {
    let hashed_password = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;
    let now = Local::now().fixed_offset();
    let user = User {
        id: Uuid::now_v7(),
        user_name: username.to_string(),
        password: hashed_password,
        created_date: Some(now),
        updated_date: Some(now),
    };
    sqlx::query(
        r#"
        INSERT INTO public.user (id, user_name, password, created_date, updated_date)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(user.id)
    .bind(&user.user_name)
    .bind(&user.password)
    .bind(user.created_date)
    .bind(user.updated_date)
    .execute(&mut **db)
    .await?;
    Ok(user)
}

/// Insert a user and open a session for it, as a login would.
pub async fn generate_test_user<C: ConnectionLike>(
    db: &mut PoolConnection<Postgres>,
    redis_conn: &mut C,
    config: &Config,
    username: &str,
    password: &str,
) -> anyhow::Result<TestUser> {
    let user = insert_user(db, username, password).await?;
    let token = generate_token_from_user(&user, config)?;
    let refresh_token = generate_refresh_token_from_user(&user, config)?;
    add_session(
        redis_conn,
        &user,
        config,
        token.clone(),
        refresh_token.clone(),
    )?;
    Ok(TestUser {
        user,
        token,
        refresh_token,
    })
}

pub async fn insert_student(
    db: &mut PoolConnection<Postgres>,
    user_id: &Uuid,
) -> anyhow::Result<Student> {
    let student: Student = sqlx::query_as(
        r#"
        INSERT INTO public.students (id, user_id, name, school, certifications)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(user_id)
    .bind("Test Student")
    .bind("Georgia Tech")
    .bind(Vec::<String>::new())
    .fetch_one(&mut **db)
    .await?;
    Ok(student)
}

#[cfg(test)]
mod tests {
    use sqlx::{Acquire, PgPool};
    use uuid::Uuid;

    use crate::{
        core::{
            security::get_user_from_token,
            session::get_session,
            test_utils::{generate_test_user, insert_student},
        },
        settings::get_config,
    };

    #[sqlx::test]
    async fn test_generate_test_user(pool: PgPool) -> anyhow::Result<()> {
        // Given
        let config = get_config();
        let client = redis::Client::open(config.redis_url.clone())?;
        let mut redis_conn = client.get_connection()?;

        // When
        let mut db = pool.acquire().await?;
        let res = generate_test_user(
            &mut db,
            &mut redis_conn,
            &config,
            "testuser",
            "testpassword",
        )
        .await?;
        let student = insert_student(&mut db, &res.user.id).await?;

        // Expect
        let user: Option<(Uuid, String)> =
            sqlx::query_as("SELECT id, user_name FROM public.user WHERE id = $1")
                .bind(res.user.id)
                .fetch_optional(&mut *db)
                .await?;
        assert!(user.is_some());
        assert_eq!(student.user_id, res.user.id);

        let mut tx = db.begin().await?;
        let user_token =
            get_user_from_token(&mut tx, &mut redis_conn, Some(res.token.clone())).await?;
        assert!(user_token.is_some());
        assert_eq!(user_token.unwrap().user_name, "testuser".to_string());

        let session = get_session(&mut redis_conn, res.token)?;
        assert!(session.is_some());
        Ok(())
    }
}
