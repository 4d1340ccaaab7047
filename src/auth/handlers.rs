use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use time::OffsetDateTime;
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{
            ActivatePremiumRequest, LoginRequest, PublicUser, RegisterRequest, TokenResponse,
            UpdateMeRequest,
        },
        repo::{premium_expiry, validate_premium_duration, User},
        services::{current_user, hash_password, is_valid_email, verify_password, AuthUser, JwtKeys},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/premium/activate", post(activate_premium))
}

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/me", get(get_me))
        .route("/auth/me", put(update_me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(ApiError::Validation("Invalid email format".into()));
    }

    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation("Password is too weak".into()));
    }

    if payload.full_name.trim().is_empty() {
        return Err(ApiError::Validation("Empty value for field: full_name".into()));
    }

    // Ensure email is not taken
    match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(_)) => {
            warn!(email = %payload.email, "email already registered");
            return Err(ApiError::Validation("Email already registered".into()));
        }
        Ok(None) => {}
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(ApiError::Database);
        }
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Database
    })?;

    let user = User::create(&state.db, &payload.email, &hash, payload.full_name.trim())
        .await
        .map_err(|e| {
            error!(error = %e, "create user failed");
            ApiError::Database
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(ApiError::Authentication);
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(ApiError::Database);
        }
    };

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        ApiError::Database
    })?;

    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(ApiError::Authentication);
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        ApiError::Database
    })?;

    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

#[instrument(skip(state, payload))]
pub async fn activate_premium(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ActivatePremiumRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    if let Err(e) = validate_premium_duration(payload.duration_days) {
        warn!(%user_id, duration = payload.duration_days, "invalid premium duration");
        return Err(e);
    }

    let user = current_user(&state, user_id).await?;

    let until = premium_expiry(OffsetDateTime::now_utc(), payload.duration_days);
    let user = User::activate_premium(&state.db, user.id, until)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "premium activation failed");
            ApiError::Database
        })?;

    info!(%user_id, duration_days = payload.duration_days, premium_until = %until, "premium activated");
    Ok(Json(user.into()))
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = current_user(&state, user_id).await?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, payload))]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<UpdateMeRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = current_user(&state, user_id).await?;

    let email = match payload.email.as_deref().map(|e| e.trim().to_lowercase()) {
        Some(email) if email != user.email => {
            if !is_valid_email(&email) {
                return Err(ApiError::Validation("Invalid email format".into()));
            }
            match User::find_by_email(&state.db, &email).await {
                Ok(Some(_)) => {
                    warn!(%user_id, new_email = %email, "update attempt with existing email");
                    return Err(ApiError::Validation("Email already registered".into()));
                }
                Ok(None) => Some(email),
                Err(e) => {
                    error!(error = %e, "find_by_email failed");
                    return Err(ApiError::Database);
                }
            }
        }
        _ => None,
    };

    let password_hash = match payload.password.as_deref() {
        Some(password) => {
            if password.len() < 8 {
                return Err(ApiError::Validation("Password is too weak".into()));
            }
            Some(hash_password(password).map_err(|e| {
                error!(error = %e, "hash_password failed");
                ApiError::Database
            })?)
        }
        None => None,
    };

    let user = User::update_profile(
        &state.db,
        user.id,
        email.as_deref(),
        payload.full_name.as_deref(),
        password_hash.as_deref(),
    )
    .await
    .map_err(|e| {
        error!(error = %e, %user_id, "profile update failed");
        ApiError::Database
    })?;

    info!(%user_id, "user profile updated");
    Ok(Json(user.into()))
}
