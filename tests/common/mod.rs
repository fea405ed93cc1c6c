// tests/common/mod.rs

#![allow(dead_code)]

use quiz_master::{
    config::Config, db, handlers::auth::seed_admin_user, routes, state::AppState,
};
use sqlx::SqlitePool;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub pool: SqlitePool,
}

/// Spawns the app on a random port over a private in-memory database.
/// The returned client does not follow redirects so tests can inspect them.
pub async fn spawn_app() -> TestApp {
    // A single connection keeps every query on the same in-memory database.
    let pool = db::connect("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory SQLite");

    db::MIGRATOR
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600, // 10 minutes for tests
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
    };

    seed_admin_user(&pool, &config)
        .await
        .expect("Failed to seed admin");

    let state = AppState {
        pool: pool.clone(),
        config,
    };
    let app = routes::create_router(state);

    // Bind to port 0 to get a random available port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    TestApp {
        address,
        client,
        pool,
    }
}

pub async fn login(app: &TestApp, email: &str, password: &str) -> String {
    let body = app
        .client
        .post(format!("{}/login", app.address))
        .json(&serde_json::json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Login failed")
        .json::<serde_json::Value>()
        .await
        .expect("Failed to parse login json");

    body["token"].as_str().expect("Token not found").to_string()
}

/// Registers `email` with [`PASSWORD`] and returns a bearer token.
pub async fn register_and_login(app: &TestApp, email: &str) -> String {
    let response = app
        .client
        .post(format!("{}/register", app.address))
        .json(&serde_json::json!({
            "email": email,
            "password": PASSWORD,
            "confirm_password": PASSWORD,
            "full_name": "Test User"
        }))
        .send()
        .await
        .expect("Register failed");
    assert_eq!(response.status().as_u16(), 201);

    login(app, email, PASSWORD).await
}

pub async fn admin_token(app: &TestApp) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

pub struct SeededQuiz {
    pub id: i64,
    pub subject_id: i64,
    pub question_ids: Vec<i64>,
    pub correct_options: Vec<i64>,
}

/// Inserts a subject (reused if it exists), a chapter and a quiz whose
/// questions have the given correct options.
pub async fn seed_quiz(pool: &SqlitePool, subject: &str, correct_options: &[i64]) -> SeededQuiz {
    let subject_id: i64 = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO subjects (name, description, date_added) VALUES (?, 'Seeded', ?)
        ON CONFLICT (name) DO UPDATE SET name = excluded.name
        RETURNING id
        "#,
    )
    .bind(subject)
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await
    .unwrap();

    let chapter_id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO chapters (subject_id, name) VALUES (?, 'Chapter 1') RETURNING id",
    )
    .bind(subject_id)
    .fetch_one(pool)
    .await
    .unwrap();

    let id: i64 = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO quizzes (subject_id, chapter_id, date_of_quiz, time_duration)
        VALUES (?, ?, '2024-06-01', '00:15')
        RETURNING id
        "#,
    )
    .bind(subject_id)
    .bind(chapter_id)
    .fetch_one(pool)
    .await
    .unwrap();

    let mut question_ids = Vec::new();
    for (i, correct) in correct_options.iter().enumerate() {
        let question_id: i64 = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO questions (quiz_id, statement, option1, option2, option3, option4, correct_option)
            VALUES (?, ?, 'A', 'B', 'C', 'D', ?)
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(format!("Question {}", i + 1))
        .bind(correct)
        .fetch_one(pool)
        .await
        .unwrap();
        question_ids.push(question_id);
    }

    SeededQuiz {
        id,
        subject_id,
        question_ids,
        correct_options: correct_options.to_vec(),
    }
}
