// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    middleware,
    routing::{get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{admin, auth, catalog, quiz, score},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

/// Assembles the main application router.
///
/// * Public: registration, login and the catalog listings.
/// * Signed in: the quiz attempt flow, scores and the user summary.
/// * Admin: content management and the admin summary.
/// * Applies global middleware (Trace, CORS).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin([
            "http://localhost:3000".parse::<HeaderValue>().expect("static origin"),
            "http://127.0.0.1:3000".parse::<HeaderValue>().expect("static origin"),
        ])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/api/subjects", get(catalog::list_subjects))
        .route("/api/subjects/{subject_id}/chapters", get(catalog::list_chapters))
        .route("/api/chapters/{chapter_id}/quizzes", get(catalog::list_quizzes));

    let user_routes = Router::new()
        .route("/dashboard", get(quiz::dashboard))
        .route(
            "/quiz/{quiz_id}",
            get(quiz::start_quiz).post(quiz::attempt_quiz),
        )
        .route("/quiz/{quiz_id}/start", get(quiz::start_quiz))
        .route("/quiz/{quiz_id}/view", get(quiz::view_quiz))
        .route("/submit_quiz/{quiz_id}", post(quiz::submit_quiz))
        .route("/scores", get(score::list_scores))
        .route("/score_summary/{score_id}", get(score::score_summary))
        .route("/summary", get(score::user_summary))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/summary", get(admin::summary))
        .route("/subjects", get(admin::list_subjects).post(admin::create_subject))
        .route(
            "/subjects/{id}",
            get(admin::get_subject)
                .put(admin::update_subject)
                .delete(admin::delete_subject),
        )
        .route(
            "/subjects/{id}/chapters",
            get(admin::list_chapters).post(admin::create_chapter),
        )
        .route("/get_chapters/{subject_id}", get(admin::get_chapters))
        .route(
            "/chapters/{id}",
            put(admin::update_chapter).delete(admin::delete_chapter),
        )
        .route("/quizzes", get(admin::list_quizzes).post(admin::create_quiz))
        .route(
            "/quizzes/{id}",
            get(admin::get_quiz)
                .put(admin::update_quiz)
                .delete(admin::delete_quiz),
        )
        .route("/quizzes/{id}/questions", post(admin::create_question))
        .route(
            "/questions/{id}",
            put(admin::update_question).delete(admin::delete_question),
        )
        .route("/users", get(admin::list_users))
        .route("/users/{id}", axum::routing::delete(admin::delete_user))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(user_routes)
        .nest("/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
