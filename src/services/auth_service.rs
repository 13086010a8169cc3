//! Authentication service - Handles user authentication and authorization.
//!
//! Uses the domain Password value object for hashing and JWTs for
//! stateless credentials.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{Config, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER};
use crate::domain::{Password, User, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UserRepository;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Token returned after successful authentication
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    /// JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiration time in seconds
    pub expires_in: i64,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and issue a token
    async fn register(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> AppResult<(User, TokenResponse)>;

    /// Login and return the user with a JWT token
    async fn login(&self, email: String, password: String) -> AppResult<(User, TokenResponse)>;

    /// Verify JWT token and extract claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Look up a user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;
}

/// Generate JWT token for a user (shared helper to avoid duplication)
fn generate_token(user: &User, config: &Config) -> AppResult<TokenResponse> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.jwt_expiration_hours);

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(TokenResponse {
        access_token: token,
        token_type: TOKEN_TYPE_BEARER.to_string(),
        expires_in: config.jwt_expiration_hours * SECONDS_PER_HOUR,
    })
}

/// Concrete implementation of AuthService
pub struct Authenticator {
    users: Arc<dyn UserRepository>,
    config: Config,
}

impl Authenticator {
    /// Create new auth service instance
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self { users, config }
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(
        &self,
        email: String,
        password: String,
        name: String,
    ) -> AppResult<(User, TokenResponse)> {
        // Email format and name length are validated at the API boundary
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .users
            .create(email, password_hash, name, UserRole::User)
            .await?;

        let token = generate_token(&user, &self.config)?;
        Ok((user, token))
    }

    async fn login(&self, email: String, password: String) -> AppResult<(User, TokenResponse)> {
        let user_result = self.users.find_by_email(&email).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid emails.
        // We use a dummy hash that will always fail verification.
        let dummy_hash =
            "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        // Only succeed if both user exists AND password is valid
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // Safe to unwrap since we verified user_exists is true
        let user = user_result.unwrap();
        let token = generate_token(&user, &self.config)?;
        Ok((user, token))
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound("User"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::MockUserRepository;

    fn test_config() -> Config {
        Config::for_tests("test-secret-key-for-testing-only-32chars")
    }

    fn stored_user(email: &str, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: Password::new(password).unwrap().into_string(),
            name: "Test User".to_string(),
            avatar: None,
            role: UserRole::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "password1"))));

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let result = auth
            .register(
                "taken@example.com".to_string(),
                "password1".to_string(),
                "Someone".to_string(),
            )
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn register_issues_verifiable_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .returning(|email, password_hash, name, role| {
                Ok(User {
                    id: Uuid::new_v4(),
                    email,
                    password_hash,
                    name,
                    avatar: None,
                    role,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let (user, token) = auth
            .register(
                "new@example.com".to_string(),
                "password1".to_string(),
                "Newcomer".to_string(),
            )
            .await
            .unwrap();

        let claims = auth.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.email, "new@example.com");
        assert_eq!(claims.role, "User");
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "correct-password"))));

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let result = auth
            .login("user@example.com".to_string(), "wrong-password".to_string())
            .await;

        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_rejects_unknown_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let result = auth
            .login("ghost@example.com".to_string(), "whatever1".to_string())
            .await;

        // Same classification as a wrong password: no email enumeration
        assert!(matches!(result.unwrap_err(), AppError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_credentials() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(stored_user(email, "correct-password"))));

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let (user, token) = auth
            .login("user@example.com".to_string(), "correct-password".to_string())
            .await
            .unwrap();

        assert_eq!(user.email, "user@example.com");
        assert!(!token.access_token.is_empty());
        assert_eq!(token.token_type, "Bearer");
    }

    #[tokio::test]
    async fn get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let auth = Authenticator::new(Arc::new(repo), test_config());
        let result = auth.get_user(Uuid::new_v4()).await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound(_)));
    }

    #[test]
    fn verify_token_rejects_garbage() {
        let repo = MockUserRepository::new();
        let auth = Authenticator::new(Arc::new(repo), test_config());

        assert!(auth.verify_token("not-a-jwt").is_err());
    }
}
