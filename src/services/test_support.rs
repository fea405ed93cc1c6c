// src/services/test_support.rs

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::db;

/// Fresh in-memory database with the schema applied.
pub async fn pool() -> SqlitePool {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    db::MIGRATOR.run(&pool).await.unwrap();
    pool
}

pub async fn user(pool: &SqlitePool, email: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO users (email, password, full_name) VALUES (?, 'x', 'Test User') RETURNING id",
    )
    .bind(email)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn subject(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO subjects (name, description, date_added) VALUES (?, 'desc', ?) RETURNING id",
    )
    .bind(name)
    .bind(chrono::Utc::now())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn chapter(pool: &SqlitePool, subject_id: i64, name: &str) -> i64 {
    sqlx::query_scalar::<_, i64>("INSERT INTO chapters (subject_id, name) VALUES (?, ?) RETURNING id")
        .bind(subject_id)
        .bind(name)
        .fetch_one(pool)
        .await
        .unwrap()
}

/// Quiz with one question per entry of `correct_options`.
pub async fn quiz(pool: &SqlitePool, subject_id: i64, chapter_id: i64, correct_options: &[i64]) -> i64 {
    let quiz_id: i64 = sqlx::query_scalar::<_, i64>(
        "INSERT INTO quizzes (subject_id, chapter_id, date_of_quiz, time_duration) VALUES (?, ?, ?, '00:30') RETURNING id",
    )
    .bind(subject_id)
    .bind(chapter_id)
    .bind(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    .fetch_one(pool)
    .await
    .unwrap();

    for (i, correct) in correct_options.iter().enumerate() {
        sqlx::query(
            "INSERT INTO questions (quiz_id, statement, option1, option2, option3, option4, correct_option) VALUES (?, ?, 'a', 'b', 'c', 'd', ?)",
        )
        .bind(quiz_id)
        .bind(format!("Question {}", i + 1))
        .bind(correct)
        .execute(pool)
        .await
        .unwrap();
    }

    quiz_id
}
