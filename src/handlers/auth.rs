// src/handlers/auth.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;
use validator::Validate;

use crate::{
    config::Config,
    error::{AppError, map_write_error},
    models::user::{CreateUserRequest, LoginRequest, Role, User},
    utils::{
        hash::{hash_password, verify_password},
        jwt::sign_jwt,
    },
};

const USER_COLUMNS: &str = "id, email, password, full_name, qualification, dob, role";

pub async fn find_user_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Inserts a user with an already hashed password.
pub async fn insert_user(
    pool: &SqlitePool,
    payload: &CreateUserRequest,
    password_hash: &str,
    role: Role,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(&format!(
        r#"
        INSERT INTO users (email, password, full_name, qualification, dob, role)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(&payload.email)
    .bind(password_hash)
    .bind(&payload.full_name)
    .bind(&payload.qualification)
    .bind(payload.dob)
    .bind(role)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        map_write_error(
            e,
            "Email already registered. Please log in or use a different email.",
        )
    })
}

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Self-registration always yields the `user` role.
/// Returns 201 Created and the user object (excluding password).
pub async fn register(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.password != payload.confirm_password {
        return Err(AppError::BadRequest("Passwords must match.".to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;
    let user = insert_user(&pool, &payload, &hashed_password, Role::User).await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok((StatusCode::CREATED, Json(user)))
}

/// Authenticates a user and returns a JWT token.
///
/// The response names the landing page for the user's role.
pub async fn login(
    State(pool): State<SqlitePool>,
    State(config): State<Config>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let user = find_user_by_email(&pool, &payload.email)
        .await
        .map_err(|e| {
            tracing::error!("Login DB error: {:?}", e);
            AppError::InternalServerError(e.to_string())
        })?
        .ok_or(AppError::AuthError("Invalid email or password".to_string()))?;

    if !verify_password(&payload.password, &user.password)? {
        return Err(AppError::AuthError("Invalid email or password".to_string()));
    }

    let token = sign_jwt(user.id, user.role, &config.jwt_secret, config.jwt_expiration)?;

    Ok(Json(json!({
        "token": token,
        "type": "Bearer",
        "role": user.role,
        "home": user.role.home_path(),
    })))
}

/// Creates the configured admin account if it does not exist yet.
pub async fn seed_admin_user(pool: &SqlitePool, config: &Config) -> Result<(), AppError> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        return Ok(());
    };

    if find_user_by_email(pool, email).await?.is_some() {
        return Ok(());
    }

    tracing::info!("Seeding admin user: {}", email);
    let payload = CreateUserRequest {
        email: email.clone(),
        password: password.clone(),
        confirm_password: password.clone(),
        full_name: "Admin".to_string(),
        qualification: None,
        dob: None,
    };
    insert_user(pool, &payload, &hash_password(password)?, Role::Admin).await?;
    tracing::info!("Admin user created successfully.");

    Ok(())
}
