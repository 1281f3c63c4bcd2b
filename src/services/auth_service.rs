use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{DatabaseConnection, DbErr, RuntimeErr};
use tracing::{info, warn};

use crate::db::entities::user;
use crate::db::services::user_service;
use crate::server::config::ServerConfig;
use crate::web::error::AppError;
use crate::web::models::{
    Claims, LoginRequest, LoginResponse, LoginUser, RegisterRequest, RegisterResponse, UserResponse,
};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

static SPECIAL_CHAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[!@#$%^&*()_+\-=\[\]{};':"\\|,.<>/?]"#).expect("special character pattern is valid")
});

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Returns every rule `password` breaks; an empty list means it is acceptable.
pub fn validate_password(password: &str) -> Vec<String> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one number".to_string());
    }
    if !SPECIAL_CHAR_RE.is_match(password) {
        errors.push("Password must contain at least one special character".to_string());
    }

    errors
}

fn required_credentials(email: Option<String>, password: Option<String>) -> Result<(String, String), AppError> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Ok((email, password))
        }
        _ => Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        )),
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_error)) | DbErr::Exec(RuntimeErr::SqlxError(sqlx_error)) => {
            matches!(sqlx_error, sqlx::Error::Database(db_error) if db_error.is_unique_violation())
        }
        _ => false,
    }
}

pub async fn register_user(
    pool: &DatabaseConnection,
    req: RegisterRequest,
    config: &ServerConfig,
) -> Result<RegisterResponse, AppError> {
    let (email, password) = required_credentials(req.email, req.password)?;

    if !validate_email(&email) {
        return Err(AppError::InvalidInput("Invalid email format".to_string()));
    }

    let password_errors = validate_password(&password);
    if !password_errors.is_empty() {
        return Err(AppError::ValidationFailed {
            message: "Password does not meet requirements".to_string(),
            details: password_errors,
        });
    }

    if user_service::find_user_by_email(pool, &email).await?.is_some() {
        return Err(AppError::UserAlreadyExists(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash(&password, config.bcrypt_cost)
        .map_err(|e| AppError::PasswordHashingError(e.to_string()))?;

    // The unique index still catches a concurrent registration of the same email.
    let new_user = user_service::create_user(pool, &email, &password_hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::UserAlreadyExists("User with this email already exists".to_string())
            } else {
                AppError::DatabaseError(format!("Failed to create user: {e}"))
            }
        })?;

    let token = create_jwt_for_user(&new_user, &config.jwt_secret, config.token_expiry_hours)?;
    info!(user_id = new_user.id, "User registered.");

    Ok(RegisterResponse {
        message: "User created successfully".to_string(),
        token,
        user: UserResponse {
            id: new_user.id,
            email: new_user.email,
        },
    })
}

pub async fn login_user(
    pool: &DatabaseConnection,
    req: LoginRequest,
    config: &ServerConfig,
) -> Result<LoginResponse, AppError> {
    let (email, password) = required_credentials(req.email, req.password)?;

    // Unknown email and wrong password look the same to the caller.
    let Some(user) = user_service::find_user_by_email(pool, &email).await? else {
        warn!("Login attempt for unknown email.");
        return Err(AppError::InvalidCredentials);
    };

    let valid_password = verify(&password, &user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Password verification failed: {e}")))?;

    if !valid_password {
        warn!(user_id = user.id, "Login attempt with wrong password.");
        return Err(AppError::InvalidCredentials);
    }

    let token = create_jwt_for_user(&user, &config.jwt_secret, config.token_expiry_hours)?;

    Ok(LoginResponse {
        token,
        user: LoginUser {
            id: user.id,
            email: user.email,
            alias_name: user.alias_name,
        },
    })
}

pub fn create_jwt_for_user(
    user: &user::Model,
    jwt_secret: &str,
    expiry_hours: i64,
) -> Result<String, AppError> {
    let expiration = (Utc::now() + Duration::hours(expiry_hours)).timestamp() as usize;

    let claims = Claims {
        sub: user.email.clone(),
        user_id: user.id,
        exp: expiration,
    };

    encode(&Header::default(), &claims, &EncodingKey::from_secret(jwt_secret.as_ref()))
        .map_err(|e| AppError::TokenCreationError(e.to_string()))
}

pub fn decode_jwt(token: &str, jwt_secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> user::Model {
        user::Model {
            id: 42,
            email: "jane@example.com".to_string(),
            password_hash: String::new(),
            alias_name: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("jane@example.com"));
        assert!(!validate_email("jane@example"));
        assert!(!validate_email("jane example@x.com"));
        assert!(!validate_email("@example.com"));
    }

    #[test]
    fn test_strong_password_passes() {
        assert!(validate_password("Sup3r$ecret").is_empty());
    }

    #[test]
    fn test_weak_password_lists_every_failure() {
        let errors = validate_password("abc");
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&"Password must be at least 8 characters long".to_string()));
        assert!(errors.contains(&"Password must contain at least one uppercase letter".to_string()));
        assert!(errors.contains(&"Password must contain at least one number".to_string()));
        assert!(errors.contains(&"Password must contain at least one special character".to_string()));
    }

    #[test]
    fn test_jwt_round_trip() {
        let token = create_jwt_for_user(&sample_user(), "secret", 24).unwrap();
        let claims = decode_jwt(&token, "secret").unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.sub, "jane@example.com");
    }

    #[test]
    fn test_jwt_rejected_with_wrong_secret() {
        let token = create_jwt_for_user(&sample_user(), "secret", 24).unwrap();
        assert!(decode_jwt(&token, "other-secret").is_err());
    }

    #[test]
    fn test_expired_jwt_is_rejected() {
        // Well past the default 60s leeway.
        let token = create_jwt_for_user(&sample_user(), "secret", -2).unwrap();
        assert!(decode_jwt(&token, "secret").is_err());
    }

    #[test]
    fn test_missing_credentials() {
        assert!(required_credentials(Some("a@b.co".to_string()), None).is_err());
        assert!(required_credentials(Some(String::new()), Some("x".to_string())).is_err());
        assert!(required_credentials(Some("a@b.co".to_string()), Some("x".to_string())).is_ok());
    }
}
