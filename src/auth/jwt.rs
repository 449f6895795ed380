use axum::http::StatusCode;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// ID tokens live for one hour, like the managed identity provider's.
const ID_TOKEN_LIFETIME_MINUTES: i64 = 60;

/// ID token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    pub sub: String, // Subject (uid)
    pub email: String,
    pub iss: String,
    pub aud: String,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum JwtError {
    #[error("Failed to create ID token")]
    TokenCreation,

    #[error("Invalid or expired ID token")]
    InvalidToken,
}

impl From<JwtError> for StatusCode {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::TokenCreation => StatusCode::INTERNAL_SERVER_ERROR,
            JwtError::InvalidToken => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Issues and verifies ID tokens for one project.
pub struct IdTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    project_id: String,
    issuer: String,
}

impl std::fmt::Debug for IdTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdTokenService")
            .field("project_id", &self.project_id)
            .finish_non_exhaustive()
    }
}

impl IdTokenService {
    pub fn new(secret: &str, project_id: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            project_id: project_id.to_string(),
            issuer: format!("https://securetoken.google.com/{}", project_id),
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Mint an ID token for a verified account
    pub fn issue(&self, uid: &Uuid, email: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiry = now + Duration::minutes(ID_TOKEN_LIFETIME_MINUTES);

        self.encode_claims(&Claims {
            sub: uid.to_string(),
            email: email.to_string(),
            iss: self.issuer.clone(),
            aud: self.project_id.clone(),
            exp: expiry.timestamp() as usize,
            iat: now.timestamp() as usize,
        })
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|_| JwtError::TokenCreation)
    }

    /// Validate signature, expiry, issuer and audience
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.set_audience(&[self.project_id.as_str()]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| JwtError::InvalidToken)
    }
}
