use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::env;

use axum::{
    async_trait,
    extract::{FromRequestParts, Json},
    http::{StatusCode, request::Parts},
};
use serde_json::json;

use crate::domain::Role;

/// Token lifetime; a lab session rarely outlasts a working day
const TOKEN_TTL_HOURS: i64 = 12;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // email
    pub username: String,
    pub role: String,
    pub exp: usize,
}

type Rejection = (StatusCode, Json<serde_json::Value>);

impl Claims {
    pub fn role(&self) -> Option<Role> {
        self.role.parse().ok()
    }

    /// Reject with 403 unless the caller's role passes `allowed`
    pub fn require(&self, allowed: impl Fn(&Role) -> bool) -> Result<Role, Rejection> {
        match self.role() {
            Some(role) if allowed(&role) => Ok(role),
            _ => {
                tracing::warn!("Role {} denied for {}", self.role, self.sub);
                Err((
                    StatusCode::FORBIDDEN,
                    Json(json!({ "error": "Insufficient permissions" })),
                ))
            }
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    S: Send + Sync,
{
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Missing Authorization header" })),
            ))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Invalid Authorization header format" })),
        ))?;

        decode_jwt(token).map_err(|_| {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Invalid or expired token" })),
            )
        })
    }
}

pub fn hash_password(password: &str) -> Result<String, String> {
    if password.trim().is_empty() {
        return Err("Password cannot be empty".to_string());
    }
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| e.to_string())?
        .to_string();
    Ok(password_hash)
}

pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, String> {
    let parsed_hash = PasswordHash::new(password_hash).map_err(|e| e.to_string())?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn get_jwt_secret() -> Result<String, String> {
    match env::var("JWT_SECRET") {
        Ok(secret) => Ok(secret),
        Err(_) if cfg!(debug_assertions) => Ok("secret".to_string()),
        Err(_) => Err("JWT_SECRET environment variable must be set in production".to_string()),
    }
}

pub fn create_jwt(email: &str, username: &str, role: &str) -> Result<String, String> {
    let secret = get_jwt_secret()?;
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(TOKEN_TTL_HOURS))
        .ok_or_else(|| "timestamp overflow".to_string())?
        .timestamp();

    let claims = Claims {
        sub: email.to_owned(),
        username: username.to_owned(),
        role: role.to_owned(),
        exp: expiration as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| e.to_string())
}

pub fn decode_jwt(token: &str) -> Result<Claims, String> {
    let secret = get_jwt_secret()?;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| e.to_string())
}
