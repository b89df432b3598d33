use axum::{extract::State, Extension, Json};
use bcrypt::verify;
use tracing::{instrument, warn};

use crate::auth::jwt::sign_token;
use crate::dtos::auth::{LoginRequest, LoginResponse, UserInfo};
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::user::User;
use crate::state::AppState;

const USER_COLUMNS: &str = "id, email, phone, password_hash, name, role, created_at";

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if payload.phone.trim().is_empty() {
        return Err(AppError::validation("Phone required"));
    }
    if payload.password.is_empty() {
        return Err(AppError::validation("Password required"));
    }

    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE phone = $1"
    ))
    .bind(payload.phone.trim())
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::unauthorized("Invalid credentials"))?;

    let ok = verify(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verify error: {e}")))?;

    if !ok {
        warn!(user_id = user.id, "Failed login attempt");
        return Err(AppError::unauthorized("Invalid credentials"));
    }

    let secret = std::env::var("JWT_SECRET")
        .map_err(|_| AppError::internal("JWT secret not configured"))?;

    let display_name = user.name.clone().unwrap_or_default();
    let token = sign_token(user.id, &user.role, &display_name, &secret)?;

    Ok(Json(LoginResponse {
        success: true,
        token,
        user: UserInfo::from(user),
    }))
}

#[instrument(skip(state, auth))]
pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<UserInfo>, AppError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(auth.user_id)
    .fetch_optional(&state.db_pool)
    .await?
    .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserInfo::from(user)))
}
