use poem::{
    http::StatusCode,
    test::{TestClient, TestForm, TestFormField},
};
use serde_json::json;
use sqlx::PgPool;

use crate::{
    core::test_utils::{generate_test_user, insert_student, test_app_state},
    init_openapi_route,
    settings::get_config,
};

#[sqlx::test]
async fn test_save_then_list_essay_ideas(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    let storage = tempfile::tempdir()?;
    let app_state = test_app_state(pool, &config, storage.path())?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut *redis_conn, &config, "essay_user", "password").await?;
    insert_student(&mut db, &test_user.user.id).await?;
    let auth = format!("Bearer {}", test_user.token);
    let cli = TestClient::new(init_openapi_route(app_state.clone(), &config));

    // When
    for title in ["Bridging Two Worlds", "Innovation in Action"] {
        let resp = cli
            .post("/api/essay/idea/")
            .header("authorization", auth.clone())
            .body_json(&json!({
                "title": title,
                "description": "desc",
                "personal_connection": "conn",
                "key_points": ["one", "two"],
                "approach": "approach"
            }))
            .send()
            .await;
        resp.assert_status(StatusCode::CREATED);
    }

    // Expect newest first
    let resp = cli
        .get("/api/essay/idea/")
        .header("authorization", auth)
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let ideas = json.value().array();
    ideas.assert_len(2);
    ideas
        .get(0)
        .object()
        .get("title")
        .assert_string("Innovation in Action");
    ideas
        .get(0)
        .object()
        .get("key_points")
        .assert_string_array(&["one", "two"]);
    Ok(())
}

#[sqlx::test]
async fn test_generate_essay_ideas(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    let storage = tempfile::tempdir()?;
    let app_state = test_app_state(pool, &config, storage.path())?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut *redis_conn, &config, "ideas_user", "password").await?;
    let auth = format!("Bearer {}", test_user.token);
    let cli = TestClient::new(init_openapi_route(app_state.clone(), &config));
    cli.put("/api/profile/")
        .header("authorization", auth.clone())
        .body_json(&json!({ "major": "Physics", "gpa": "3.7" }))
        .send()
        .await
        .assert_status_is_ok();

    // When
    let resp = cli
        .post("/api/essay/idea/generate")
        .header("authorization", auth.clone())
        .body_json(&json!({ "prompt": "Tell us about a challenge you overcame." }))
        .send()
        .await;

    // Expect five ideas drawn from the cached profile, none saved
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let ideas = json.value().array();
    ideas.assert_len(5);
    ideas
        .get(2)
        .object()
        .get("title")
        .assert_string("The Challenge That Defined My Growth");
    assert!(ideas
        .get(2)
        .object()
        .get("personal_connection")
        .string()
        .contains("3.7 GPA"));
    let saved: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM public.essay_ideas")
        .fetch_one(&app_state.db)
        .await?;
    assert_eq!(saved.0, 0);

    // When the prompt is blank
    let resp = cli
        .post("/api/essay/idea/generate")
        .header("authorization", auth)
        .body_json(&json!({ "prompt": "  " }))
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);
    Ok(())
}

#[sqlx::test]
async fn test_review_essay(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    let storage = tempfile::tempdir()?;
    let app_state = test_app_state(pool, &config, storage.path())?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut *redis_conn, &config, "review_user", "password").await?;
    let auth = format!("Bearer {}", test_user.token);
    let cli = TestClient::new(init_openapi_route(app_state.clone(), &config));

    // When
    let resp = cli
        .post("/api/essay/review")
        .header("authorization", auth.clone())
        .multipart(
            TestForm::new().field(
                TestFormField::bytes(b"My essay".to_vec())
                    .name("file")
                    .filename("essay.txt")
                    .content_type("text/plain"),
            ),
        )
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let scores = json.value().object().get("scores").array();
    scores.assert_len(4);
    scores.get(0).object().get("category").assert_string("Structure");
    scores.get(0).object().get("score").assert_i64(8);
    json.value().object().get("suggestions").array().assert_len(5);

    // When the file type is not accepted
    let resp = cli
        .post("/api/essay/review")
        .header("authorization", auth)
        .multipart(
            TestForm::new().field(
                TestFormField::bytes(vec![0x89, 0x50, 0x4e, 0x47])
                    .name("file")
                    .filename("essay.png")
                    .content_type("image/png"),
            ),
        )
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.assert_json(json!({
        "message": "Invalid input: Please upload a .doc, .docx, .txt, or .pdf file"
    }))
    .await;
    Ok(())
}

#[sqlx::test]
async fn test_upload_essay(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    config.public_base_url = "http://files.test/storage".to_string();
    let storage = tempfile::tempdir()?;
    let app_state = test_app_state(pool, &config, storage.path())?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut *redis_conn, &config, "upload_user", "password").await?;
    let cli = TestClient::new(init_openapi_route(app_state.clone(), &config));

    // When
    let resp = cli
        .post("/api/essay/upload")
        .header("authorization", format!("Bearer {}", test_user.token))
        .multipart(
            TestForm::new()
                .text("essay_name", "common-app")
                .field(
                    TestFormField::bytes(b"%PDF essay".to_vec())
                        .name("file")
                        .filename("essay.pdf")
                        .content_type("application/pdf"),
                ),
        )
        .send()
        .await;

    // Expect
    resp.assert_status_is_ok();
    resp.assert_json(json!({
        "url": format!(
            "http://files.test/storage/essays/{}/common-app.pdf",
            test_user.user.id
        )
    }))
    .await;
    assert!(storage
        .path()
        .join("essays")
        .join(test_user.user.id.to_string())
        .join("common-app.pdf")
        .exists());

    let resp = cli
        .get(format!(
            "/storage/essays/{}/common-app.pdf",
            test_user.user.id
        ))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.assert_bytes(b"%PDF essay").await;
    Ok(())
}

#[sqlx::test]
async fn test_upload_essay_blank_name_is_bad_request(pool: PgPool) -> anyhow::Result<()> {
    // Given
    let mut config = get_config();
    config.prefix = Some("/api".to_string());
    let storage = tempfile::tempdir()?;
    let app_state = test_app_state(pool, &config, storage.path())?;
    let mut db = app_state.db.acquire().await?;
    let mut redis_conn = app_state.redis_conn.get()?;
    let test_user =
        generate_test_user(&mut db, &mut *redis_conn, &config, "blank_essay", "password").await?;
    let cli = TestClient::new(init_openapi_route(app_state.clone(), &config));

    // When
    let resp = cli
        .post("/api/essay/upload")
        .header("authorization", format!("Bearer {}", test_user.token))
        .multipart(
            TestForm::new().text("essay_name", "   ").field(
                TestFormField::bytes(b"%PDF essay".to_vec())
                    .name("file")
                    .filename("essay.pdf")
                    .content_type("application/pdf"),
            ),
        )
        .send()
        .await;

    // Expect
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert!(!storage.path().join("essays").exists());
    Ok(())
}
