use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicAccount, RegisterRequest},
        jwt::{AuthAccount, JwtKeys},
        password::{hash_password, verify_password},
        repo::{is_unique_violation, Account},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/profile", get(profile))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    // Pre-check for a friendlier error; two concurrent registrations can both
    // pass it, so the UNIQUE constraint on the insert below stays authoritative.
    if Account::find_by_email(&state.db, &payload.email)
        .await?
        .is_some()
    {
        warn!(email = %payload.email, "email already registered");
        return Err(ApiError::DuplicateAccount);
    }

    let hash = hash_password(&payload.password)?;

    let account = match Account::create(&state.db, &payload.name, &payload.email, &hash).await {
        Ok(a) => a,
        Err(e) if is_unique_violation(&e) => {
            warn!(email = %payload.email, "registration lost duplicate race");
            return Err(ApiError::DuplicateAccount);
        }
        Err(e) => return Err(e.into()),
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(account.id)?;

    info!(account_id = %account.id, "account registered");
    Ok(Json(AuthResponse {
        account: PublicAccount {
            id: account.id,
            name: account.name,
            email: account.email,
        },
        token,
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.validate()?;

    // Unknown email and wrong password are deliberately indistinguishable,
    // so failed logins carry no account-enumeration signal.
    let account = match Account::find_by_email(&state.db, &payload.email).await? {
        Some(a) => a,
        None => {
            warn!("login with unknown email");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&payload.password, &account.password_hash) {
        warn!(account_id = %account.id, "login with invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(account.id)?;

    info!(account_id = %account.id, "account logged in");
    Ok(Json(AuthResponse {
        account: PublicAccount {
            id: account.id,
            name: account.name,
            email: account.email,
        },
        token,
    }))
}

#[instrument(skip(state))]
pub async fn profile(
    State(state): State<AppState>,
    AuthAccount(account_id): AuthAccount,
) -> Result<Json<PublicAccount>, ApiError> {
    let account = Account::find_by_id(&state.db, account_id)
        .await?
        .ok_or_else(|| {
            warn!(account_id = %account_id, "token for missing account");
            ApiError::InvalidToken
        })?;

    Ok(Json(PublicAccount {
        id: account.id,
        name: account.name,
        email: account.email,
    }))
}
