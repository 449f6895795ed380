use argon2::{
    password_hash::PasswordVerifier,
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2,
};
use axum::http::StatusCode;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use super::jwt::IdTokenService;
use crate::controller::ApiError;

/// The identity provider's minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

// Input data structures
pub struct RegisterData {
    pub email: String,
    pub password: String,
}

pub struct LoginData {
    pub email: String,
    pub password: String,
}

// Result data structure
#[derive(Debug)]
pub struct AuthResult {
    pub uid: Uuid,
    pub email: String,
    pub token: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Email already in use")]
    EmailInUse,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Failed to generate auth token")]
    TokenError,

    #[error("Password hashing failed: {0}")]
    HashingError(String),
}

impl ApiError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::EmailInUse => StatusCode::CONFLICT,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::DatabaseError(_) | Self::TokenError | Self::HashingError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::EmailInUse => "EMAIL_IN_USE",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::DatabaseError(_) | Self::TokenError | Self::HashingError(_) => "INTERNAL_ERROR",
        }
    }
}

/// Normalized email, or a validation error.
pub fn validate_registration(data: &RegisterData) -> Result<String, AuthError> {
    let email = data.email.trim().to_lowercase();

    if email.is_empty() || data.password.is_empty() {
        return Err(AuthError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }

    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err(AuthError::InvalidInput("Invalid email address".to_string()));
    }

    if data.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::InvalidInput(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(email)
}

pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingError(e.to_string()))
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!("Failed to parse password hash: {}", e);
            false
        }
    }
}

// Account registration service
pub async fn register(
    pool: &PgPool,
    tokens: &IdTokenService,
    data: RegisterData,
) -> Result<AuthResult, AuthError> {
    let email = validate_registration(&data)?;
    let password_hash = hash_password(&data.password)?;
    let uid = Uuid::new_v4();

    // The unique constraint decides races between concurrent registrations
    let inserted = sqlx::query(
        "INSERT INTO travelgram.accounts (id, email, password_hash) VALUES ($1, $2, $3) ON CONFLICT (email) DO NOTHING",
    )
    .bind(uid)
    .bind(&email)
    .bind(&password_hash)
    .execute(pool)
    .await
    .map_err(|e| {
        error!("Failed to insert new account: {}", e);
        AuthError::DatabaseError(e)
    })?
    .rows_affected();

    if inserted == 0 {
        info!("Account with email {} already exists", email);
        return Err(AuthError::EmailInUse);
    }

    info!("Account created with uid: {}", uid);

    let token = tokens.issue(&uid, &email).map_err(|e| {
        error!("Token generation failed: {}", e);
        AuthError::TokenError
    })?;

    Ok(AuthResult { uid, email, token })
}

// Account login service
pub async fn login(
    pool: &PgPool,
    tokens: &IdTokenService,
    data: LoginData,
) -> Result<AuthResult, AuthError> {
    let email = data.email.trim().to_lowercase();
    info!("Attempting login for account with email: {}", email);

    let account = sqlx::query_as::<_, (Uuid, String)>(
        "SELECT id, password_hash FROM travelgram.accounts WHERE email = $1",
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?;

    let (uid, password_hash) = match account {
        Some(account) => account,
        None => {
            info!("No account found with email: {}", email);
            return Err(AuthError::InvalidCredentials);
        }
    };

    if !verify_password(&data.password, &password_hash) {
        info!("Password verification failed for {}", uid);
        return Err(AuthError::InvalidCredentials);
    }

    let token = tokens.issue(&uid, &email).map_err(|e| {
        error!("Token generation failed: {}", e);
        AuthError::TokenError
    })?;

    info!("Login successful for uid: {}", uid);
    Ok(AuthResult { uid, email, token })
}
