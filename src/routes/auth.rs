use crate::{
    db::users as db_users,
    error::AppError,
    middleware::auth::{create_access_token, create_refresh_token, hash_token, verify_access_token, AdminUser},
    models::user::*,
    models::ApiResponse,
    routes::stickers::AppState,
};
use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use axum::{extract::State, Json};
use chrono::Utc;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    // Find user by username
    let user = db_users::find_by_username(&state.pool, &req.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Verify password
    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password hash parse error: {}", e)))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized)?;

    // Generate tokens
    let access_token = create_access_token(&user.id, &user.role, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let refresh_token = create_refresh_token(&user.id, &user.role, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    // Store refresh token hash
    let token_id = uuid::Uuid::now_v7().to_string();
    let token_hash = hash_token(&refresh_token);
    let expires_at = (Utc::now() + chrono::Duration::days(7))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    db_users::store_refresh_token(&state.pool, &token_id, &user.id, &token_hash, &expires_at)
        .await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        user: user.into(),
        access_token,
        refresh_token,
    })))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, AppError> {
    // Verify the refresh token JWT
    let _claims = verify_access_token(&req.refresh_token, &state.jwt_secret)
        .map_err(|_| AppError::Unauthorized)?;

    // Check if refresh token hash exists in DB
    let token_hash = hash_token(&req.refresh_token);
    let (_token_id, user_id, expires_at) = db_users::find_refresh_token(&state.pool, &token_hash)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Check expiration
    let expires = chrono::NaiveDateTime::parse_from_str(&expires_at, "%Y-%m-%dT%H:%M:%S%.3fZ")
        .map_err(|e| AppError::Internal(format!("Date parse error: {}", e)))?;
    if expires.and_utc() < Utc::now() {
        // Delete expired token
        db_users::delete_refresh_token(&state.pool, &token_hash).await?;
        return Err(AppError::Unauthorized);
    }

    // Verify user still exists
    let user = db_users::find_by_id(&state.pool, &user_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    // Delete old refresh token (rotation)
    db_users::delete_refresh_token(&state.pool, &token_hash).await?;

    // Generate new tokens
    let new_access_token = create_access_token(&user.id, &user.role, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;
    let new_refresh_token = create_refresh_token(&user.id, &user.role, &state.jwt_secret)
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

    // Store new refresh token hash
    let new_token_id = uuid::Uuid::now_v7().to_string();
    let new_token_hash = hash_token(&new_refresh_token);
    let new_expires_at = (Utc::now() + chrono::Duration::days(7))
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string();

    db_users::store_refresh_token(
        &state.pool,
        &new_token_id,
        &user.id,
        &new_token_hash,
        &new_expires_at,
    )
    .await?;

    Ok(Json(ApiResponse::ok(AuthResponse {
        user: user.into(),
        access_token: new_access_token,
        refresh_token: new_refresh_token,
    })))
}

pub async fn logout(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<ApiResponse<()>>, AppError> {
    // Delete all refresh tokens for this user
    db_users::delete_user_refresh_tokens(&state.pool, &admin.user_id).await?;

    Ok(Json(ApiResponse::ok_empty()))
}

pub async fn me(
    State(state): State<AppState>,
    admin: AdminUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = db_users::find_by_id(&state.pool, &admin.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(ApiResponse::ok(user.into())))
}
