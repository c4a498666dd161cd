//! Account Service - registration, credential checks and login lockout

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::*;
use std::fmt;

use super::timestamp;
use crate::auth::{create_jwt, hash_password, verify_password};
use crate::domain::{DomainError, Role};
use crate::models::user::{self, Entity as User};

pub const MAX_FAILED_LOGIN_ATTEMPTS: i32 = 5;
pub const LOCKOUT_MINUTES: i64 = 15;
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Check the minimum password policy, returning the first rule broken
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    if password.trim().is_empty() {
        return Err(DomainError::Validation(
            "Password cannot be empty.".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DomainError::Validation(format!(
            "Password must be at least {} characters.",
            MIN_PASSWORD_LENGTH
        )));
    }
    if !password.chars().any(char::is_alphabetic) {
        return Err(DomainError::Validation(
            "Password must contain at least one letter.".to_string(),
        ));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(DomainError::Validation(
            "Password must contain at least one number.".to_string(),
        ));
    }
    Ok(())
}

/// Plain `local@domain.tld` shape check, no whitespace allowed
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|label| !label.is_empty())
}

#[derive(Debug)]
pub enum LoginError {
    /// Unknown account or wrong password; deliberately indistinguishable
    InvalidCredentials,
    /// Too many failures; holds the RFC 3339 time the lock expires
    Locked(String),
    Domain(DomainError),
}

impl fmt::Display for LoginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoginError::InvalidCredentials => write!(f, "Invalid credentials"),
            LoginError::Locked(until) => write!(
                f,
                "Account locked after too many failed attempts. Try again after {}",
                until
            ),
            LoginError::Domain(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LoginError {}

impl From<DbErr> for LoginError {
    fn from(e: DbErr) -> Self {
        LoginError::Domain(e.into())
    }
}

fn locked_until(account: &user::Model, now: DateTime<Utc>) -> Option<String> {
    let until = account.locked_until.as_deref()?;
    match DateTime::parse_from_rfc3339(until) {
        Ok(t) if t > now => Some(until.to_owned()),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Ignoring unreadable lock for {}: {}", account.username, e);
            None
        }
    }
}

/// Find an account by username or email, ignoring surrounding whitespace.
///
/// Emails are stored lowercased, so the email comparison ignores case.
pub async fn find_by_identifier(
    db: &DatabaseConnection,
    identifier: &str,
) -> Result<Option<user::Model>, DomainError> {
    let identifier = identifier.trim();
    Ok(User::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(identifier))
                .add(user::Column::Email.eq(identifier.to_lowercase())),
        )
        .one(db)
        .await?)
}

pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<user::Model>, DomainError> {
    Ok(User::find()
        .filter(user::Column::Email.eq(email.trim().to_lowercase()))
        .one(db)
        .await?)
}

/// Count a wrong password and lock the account once the limit is reached.
///
/// The counter is bumped in SQL so concurrent failures are never lost, and
/// the lock only lands on a row whose counter has reached the limit.
async fn record_failure(
    db: &DatabaseConnection,
    account: &user::Model,
    now: DateTime<Utc>,
) -> Result<LoginError, LoginError> {
    User::update_many()
        .col_expr(
            user::Column::FailedLoginAttempts,
            Expr::col(user::Column::FailedLoginAttempts).add(1),
        )
        .filter(user::Column::Id.eq(account.id))
        .exec(db)
        .await?;

    let until = (now + Duration::minutes(LOCKOUT_MINUTES))
        .to_rfc3339_opts(SecondsFormat::Micros, true);
    let locked = User::update_many()
        .col_expr(user::Column::FailedLoginAttempts, Expr::value(0))
        .col_expr(user::Column::LockedUntil, Expr::value(until.clone()))
        .filter(user::Column::Id.eq(account.id))
        .filter(user::Column::FailedLoginAttempts.gte(MAX_FAILED_LOGIN_ATTEMPTS))
        .exec(db)
        .await?;

    if locked.rows_affected > 0 {
        tracing::warn!(
            "Account {} locked until {} after {} failed attempts",
            account.username,
            until,
            MAX_FAILED_LOGIN_ATTEMPTS
        );
        return Ok(LoginError::Locked(until));
    }

    let Some(current) = User::find_by_id(account.id).one(db).await? else {
        return Ok(LoginError::InvalidCredentials);
    };

    // A concurrent failure may have set the lock first
    if let Some(until) = locked_until(&current, now) {
        return Ok(LoginError::Locked(until));
    }

    tracing::warn!(
        "Password verification failed for user: {} ({}/{})",
        current.username,
        current.failed_login_attempts,
        MAX_FAILED_LOGIN_ATTEMPTS
    );
    Ok(LoginError::InvalidCredentials)
}

/// Verify credentials and issue a bearer token.
///
/// Each wrong password counts towards a temporary lock; reaching
/// `MAX_FAILED_LOGIN_ATTEMPTS` locks the account for `LOCKOUT_MINUTES`.
pub async fn login(
    db: &DatabaseConnection,
    identifier: &str,
    password: &str,
) -> Result<(String, user::Model), LoginError> {
    tracing::info!("Login attempt for user: {}", identifier);

    let Some(account) = find_by_identifier(db, identifier)
        .await
        .map_err(LoginError::Domain)?
    else {
        tracing::warn!("User not found: {}", identifier);
        return Err(LoginError::InvalidCredentials);
    };

    let now = Utc::now();
    if let Some(until) = locked_until(&account, now) {
        tracing::warn!("Login refused for locked account {}", account.username);
        return Err(LoginError::Locked(until));
    }

    let verified = match verify_password(password, &account.password_hash) {
        Ok(ok) => ok,
        Err(e) => {
            tracing::error!("Stored hash for {} is unreadable: {}", account.username, e);
            false
        }
    };

    if !verified {
        return Err(record_failure(db, &account, now).await?);
    }

    let account = if account.failed_login_attempts != 0 || account.locked_until.is_some() {
        let mut active: user::ActiveModel = account.into();
        active.failed_login_attempts = Set(0);
        active.locked_until = Set(None);
        active.update(db).await?
    } else {
        account
    };

    let token = create_jwt(&account.email, &account.username, &account.role)
        .map_err(|e| LoginError::Domain(DomainError::Internal(e)))?;

    tracing::info!("Password verified successfully for user: {}", account.username);
    Ok((token, account))
}

#[derive(Debug, Clone)]
pub struct RegisterStudent {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub student_number: String,
}

/// Create a Student account after validating and de-duplicating its details
pub async fn register_student(
    db: &DatabaseConnection,
    request: RegisterStudent,
) -> Result<user::Model, DomainError> {
    let username = request.username.trim();
    let email = request.email.trim().to_lowercase();

    if username.is_empty() {
        return Err(DomainError::Validation("Username is required.".to_string()));
    }
    if !is_valid_email(&email) {
        return Err(DomainError::Validation(
            "Please enter a valid email address.".to_string(),
        ));
    }
    validate_password_strength(&request.password)?;

    let taken = User::find()
        .filter(
            Condition::any()
                .add(user::Column::Username.eq(username))
                .add(user::Column::Email.eq(email.as_str())),
        )
        .one(db)
        .await?;

    if let Some(existing) = taken {
        let field = if existing.email == email {
            "Email"
        } else {
            "Username"
        };
        return Err(DomainError::Validation(format!(
            "{} is already registered.",
            field
        )));
    }

    let password_hash = hash_password(&request.password).map_err(DomainError::Internal)?;

    let account = user::ActiveModel {
        username: Set(username.to_owned()),
        email: Set(email),
        password_hash: Set(password_hash),
        role: Set(Role::Student.as_str().to_owned()),
        name: Set(request.name.trim().to_owned()),
        student_number: Set(request.student_number.trim().to_owned()),
        created_at: Set(timestamp()),
        is_email_verified: Set(false),
        failed_login_attempts: Set(0),
        locked_until: Set(None),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!("Registered student account {}", account.username);
    Ok(account)
}
