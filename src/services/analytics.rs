// src/services/analytics.rs

//! Read-side summaries over the score log.

use sqlx::SqlitePool;

use crate::{
    config::RECENT_ITEMS_LIMIT,
    models::{
        score::{
            AdminSummary, Attempt, MonthCount, Score, ScoreHistory, SubjectCount,
            SubjectTopScore, TrendPoint, UserSummary,
        },
        subject::Subject,
    },
    services::catalog,
};

const ATTEMPT_SELECT: &str = r#"
    SELECT
        sc.id,
        sc.quiz_id,
        sc.user_id,
        s.name AS subject_name,
        c.name AS chapter_name,
        sc.timestamp,
        sc.total_scored,
        sc.date_attempted,
        (SELECT COUNT(*) FROM questions qu WHERE qu.quiz_id = sc.quiz_id) AS question_count
    FROM scores sc
    JOIN quizzes q ON q.id = sc.quiz_id
    JOIN subjects s ON s.id = q.subject_id
    JOIN chapters c ON c.id = q.chapter_id
"#;

/// Every attempt by `user_id`, newest first.
pub async fn user_attempts(pool: &SqlitePool, user_id: i64) -> Result<Vec<Attempt>, sqlx::Error> {
    let sql = format!("{ATTEMPT_SELECT} WHERE sc.user_id = ? ORDER BY sc.timestamp DESC, sc.id DESC");
    sqlx::query_as::<_, Attempt>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn find_attempt(pool: &SqlitePool, score_id: i64) -> Result<Option<Attempt>, sqlx::Error> {
    let sql = format!("{ATTEMPT_SELECT} WHERE sc.id = ?");
    sqlx::query_as::<_, Attempt>(&sql)
        .bind(score_id)
        .fetch_optional(pool)
        .await
}

/// Increments `key` in an insertion-ordered tally.
fn tally(counts: &mut Vec<(String, i64)>, key: String) {
    match counts.iter_mut().find(|(k, _)| *k == key) {
        Some((_, count)) => *count += 1,
        None => counts.push((key, 1)),
    }
}

/// Folds a newest-first attempt history into the user dashboard.
///
/// Subject and month groups keep the order in which they are first seen
/// while scanning the history, so the most recently active group leads.
pub fn summarize_attempts(attempts: Vec<Attempt>) -> UserSummary {
    let mut by_subject = Vec::new();
    let mut by_month = Vec::new();

    for attempt in &attempts {
        tally(&mut by_subject, attempt.subject_name.clone());
        tally(&mut by_month, attempt.timestamp.format("%b %Y").to_string());
    }

    UserSummary {
        latest_attempt: attempts.first().cloned(),
        subject_attempts: by_subject
            .into_iter()
            .map(|(subject, count)| SubjectCount { subject, count })
            .collect(),
        monthly_attempts: by_month
            .into_iter()
            .map(|(month, count)| MonthCount { month, count })
            .collect(),
        previous_attempts: attempts,
    }
}

pub async fn user_summary(pool: &SqlitePool, user_id: i64) -> Result<UserSummary, sqlx::Error> {
    let attempts = user_attempts(pool, user_id).await?;
    Ok(summarize_attempts(attempts))
}

/// One trend point per score, in the order given.
pub fn trend_points(scores: &[Score]) -> Vec<TrendPoint> {
    scores
        .iter()
        .map(|s| TrendPoint {
            date: s.timestamp.format("%Y-%m-%d").to_string(),
            score: s.total_scored,
        })
        .collect()
}

/// The user's score trend, oldest attempt first.
pub async fn score_trend(pool: &SqlitePool, user_id: i64) -> Result<Vec<TrendPoint>, sqlx::Error> {
    let scores = sqlx::query_as::<_, Score>(
        r#"
        SELECT id, quiz_id, user_id, timestamp, total_scored, date_attempted
        FROM scores
        WHERE user_id = ?
        ORDER BY timestamp ASC, id ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(trend_points(&scores))
}

pub async fn score_history(pool: &SqlitePool, user_id: i64) -> Result<ScoreHistory, sqlx::Error> {
    Ok(ScoreHistory {
        scores: user_attempts(pool, user_id).await?,
        score_trend: score_trend(pool, user_id).await?,
    })
}

/// Highest score ever recorded per subject. Subjects without attempts are absent.
pub async fn top_scores_by_subject(pool: &SqlitePool) -> Result<Vec<SubjectTopScore>, sqlx::Error> {
    sqlx::query_as::<_, SubjectTopScore>(
        r#"
        SELECT s.name AS subject, MAX(sc.total_scored) AS top_score
        FROM subjects s
        JOIN quizzes q ON q.subject_id = s.id
        JOIN scores sc ON sc.quiz_id = q.id
        GROUP BY s.name
        ORDER BY s.name
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Number of attempts per subject. Subjects without attempts are absent.
pub async fn attempts_by_subject(pool: &SqlitePool) -> Result<Vec<SubjectCount>, sqlx::Error> {
    sqlx::query_as::<_, SubjectCount>(
        r#"
        SELECT s.name AS subject, COUNT(sc.id) AS count
        FROM subjects s
        JOIN quizzes q ON q.subject_id = s.id
        JOIN scores sc ON sc.quiz_id = q.id
        GROUP BY s.name
        ORDER BY s.name
        "#,
    )
    .fetch_all(pool)
    .await
}

async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
}

pub async fn admin_summary(pool: &SqlitePool) -> Result<AdminSummary, sqlx::Error> {
    let recent_subjects = sqlx::query_as::<_, Subject>(
        "SELECT id, name, description, date_added FROM subjects ORDER BY id DESC LIMIT ?",
    )
    .bind(RECENT_ITEMS_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(AdminSummary {
        total_subjects: count_rows(pool, "subjects").await?,
        total_chapters: count_rows(pool, "chapters").await?,
        total_quizzes: count_rows(pool, "quizzes").await?,
        total_users: count_rows(pool, "users").await?,
        recent_subjects,
        recent_quizzes: catalog::recent_quizzes(pool, RECENT_ITEMS_LIMIT).await?,
        top_scores: top_scores_by_subject(pool).await?,
        subject_attempts: attempts_by_subject(pool).await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{scoring, test_support};
    use chrono::{TimeZone, Utc};

    fn attempt(id: i64, subject: &str, year: i32, month: u32) -> Attempt {
        let timestamp = Utc.with_ymd_and_hms(year, month, 10, 12, 0, 0).unwrap();
        Attempt {
            id,
            quiz_id: 1,
            user_id: 1,
            subject_name: subject.to_string(),
            chapter_name: "Chapter".to_string(),
            timestamp,
            total_scored: id,
            date_attempted: timestamp.date_naive(),
            question_count: 5,
        }
    }

    #[test]
    fn no_attempts_yield_empty_summary() {
        let summary = summarize_attempts(Vec::new());
        assert!(summary.latest_attempt.is_none());
        assert!(summary.previous_attempts.is_empty());
        assert!(summary.subject_attempts.is_empty());
        assert!(summary.monthly_attempts.is_empty());
    }

    #[test]
    fn groups_follow_first_encounter_order() {
        // Newest first, as returned by `user_attempts`.
        let history = vec![
            attempt(3, "Physics", 2024, 2),
            attempt(2, "Math", 2024, 1),
            attempt(1, "Physics", 2024, 1),
        ];

        let summary = summarize_attempts(history);

        assert_eq!(summary.latest_attempt.as_ref().map(|a| a.id), Some(3));
        assert_eq!(summary.previous_attempts.len(), 3);
        assert_eq!(
            summary.subject_attempts,
            vec![
                SubjectCount { subject: "Physics".to_string(), count: 2 },
                SubjectCount { subject: "Math".to_string(), count: 1 },
            ]
        );
        assert_eq!(
            summary.monthly_attempts,
            vec![
                MonthCount { month: "Feb 2024".to_string(), count: 1 },
                MonthCount { month: "Jan 2024".to_string(), count: 2 },
            ]
        );
    }

    #[tokio::test]
    async fn admin_summary_reports_max_and_count_per_subject() {
        let pool = test_support::pool().await;
        let alice = test_support::user(&pool, "alice@example.com").await;
        let bob = test_support::user(&pool, "bob@example.com").await;
        let math = test_support::subject(&pool, "Math").await;
        test_support::subject(&pool, "History").await;
        let algebra = test_support::chapter(&pool, math, "Algebra").await;
        let quiz = test_support::quiz(&pool, math, algebra, &[1, 2, 3]).await;

        scoring::record_attempt(&pool, alice, quiz, 2).await.unwrap();
        scoring::record_attempt(&pool, bob, quiz, 3).await.unwrap();

        let summary = admin_summary(&pool).await.unwrap();

        assert_eq!(
            summary.top_scores,
            vec![SubjectTopScore { subject: "Math".to_string(), top_score: 3 }]
        );
        assert_eq!(
            summary.subject_attempts,
            vec![SubjectCount { subject: "Math".to_string(), count: 2 }]
        );
        assert_eq!(summary.total_subjects, 2);
        assert_eq!(summary.total_chapters, 1);
        assert_eq!(summary.total_quizzes, 1);
        assert_eq!(summary.total_users, 2);
        assert_eq!(summary.recent_subjects[0].name, "History");
    }

    #[tokio::test]
    async fn user_summary_counts_months_newest_first() {
        let pool = test_support::pool().await;
        let user = test_support::user(&pool, "u@example.com").await;
        let other = test_support::user(&pool, "o@example.com").await;
        let math = test_support::subject(&pool, "Math").await;
        let algebra = test_support::chapter(&pool, math, "Algebra").await;
        let quiz = test_support::quiz(&pool, math, algebra, &[1, 1]).await;

        let jan = Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 15, 9, 0, 0).unwrap();
        scoring::record_attempt_at(&pool, user, quiz, 1, jan).await.unwrap();
        scoring::record_attempt_at(&pool, user, quiz, 2, feb).await.unwrap();
        scoring::record_attempt_at(&pool, other, quiz, 2, feb).await.unwrap();

        let summary = user_summary(&pool, user).await.unwrap();

        assert_eq!(summary.previous_attempts.len(), 2);
        assert_eq!(summary.latest_attempt.unwrap().total_scored, 2);
        assert_eq!(
            summary.monthly_attempts,
            vec![
                MonthCount { month: "Feb 2024".to_string(), count: 1 },
                MonthCount { month: "Jan 2024".to_string(), count: 1 },
            ]
        );
        assert_eq!(
            summary.subject_attempts,
            vec![SubjectCount { subject: "Math".to_string(), count: 2 }]
        );
    }

    #[tokio::test]
    async fn score_trend_is_chronological() {
        let pool = test_support::pool().await;
        let user = test_support::user(&pool, "u@example.com").await;
        let math = test_support::subject(&pool, "Math").await;
        let algebra = test_support::chapter(&pool, math, "Algebra").await;
        let quiz = test_support::quiz(&pool, math, algebra, &[1, 1, 1]).await;

        // Inserted out of order on purpose.
        let later = Utc.with_ymd_and_hms(2024, 3, 2, 8, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        scoring::record_attempt_at(&pool, user, quiz, 3, later).await.unwrap();
        scoring::record_attempt_at(&pool, user, quiz, 1, earlier).await.unwrap();

        let history = score_history(&pool, user).await.unwrap();

        assert_eq!(
            history.score_trend,
            vec![
                TrendPoint { date: "2024-03-01".to_string(), score: 1 },
                TrendPoint { date: "2024-03-02".to_string(), score: 3 },
            ]
        );
        assert_eq!(history.scores[0].total_scored, 3);
        assert_eq!(history.scores[0].question_count, 3);
    }
}
