use std::sync::Arc;

use argon2::{self, password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString}};
use tracing::{error, info};
use validator::Validate;

use crate::{
    commons::{errors::ServiceError, token::generate_token},
    models::user::{AuthResponse, LoginRequest, NewUser, UserDto, DEFAULT_ROLE},
    repositories::UserRepository,
};

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let argon2 = argon2::Argon2::default();
    let password_hash = PasswordHasher::hash_password(&argon2, password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub struct AuthService {
    user_repository: Arc<dyn UserRepository>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(user_repository: Arc<dyn UserRepository>, jwt_secret: String) -> Self {
        Self {
            user_repository,
            jwt_secret,
        }
    }

    pub async fn register(&self, request: UserDto) -> Result<UserDto, ServiceError> {
        let creation_failed = ServiceError::CreationFailed("user");

        if request.validate().is_err() {
            return Err(creation_failed);
        }

        let start = std::time::Instant::now();
        // Check if user exists
        let existing = self
            .user_repository
            .find_by_email(&request.email)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to look up user");
                creation_failed.clone()
            })?;
        if existing.is_some() {
            info!("email already registered");
            return Err(creation_failed);
        }

        // Hash password with Argon2
        let password_hash = hash_password(&request.password).map_err(|e| {
            error!(error = %e, "failed to hash password");
            creation_failed.clone()
        })?;

        let user = self
            .user_repository
            .create(NewUser {
                name: request.name,
                last_name: request.last_name,
                dni: request.dni,
                email: request.email,
                password_hash,
                role: DEFAULT_ROLE.to_string(),
            })
            .await
            .map_err(|e| {
                error!(error = %e, "failed to insert user");
                creation_failed.clone()
            })?;

        info!(user_id = user.id, "User registration took: {:?}", start.elapsed());
        Ok(user.into())
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ServiceError> {
        let start = std::time::Instant::now();
        // Find user
        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await
            .map_err(|e| {
                error!(error = %e, "failed to look up user");
                ServiceError::UserNotRegistered
            })?
            .ok_or(ServiceError::UserNotRegistered)?;

        // Verify password with Argon2
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| {
            error!(error = %e, user_id = user.id, "stored password hash is invalid");
            ServiceError::IncorrectPassword
        })?;
        let argon2 = argon2::Argon2::default();
        if PasswordVerifier::verify_password(&argon2, request.password.as_bytes(), &parsed_hash).is_err() {
            return Err(ServiceError::IncorrectPassword);
        }

        // Generate token
        let issued = generate_token(user.id, &user.role, &self.jwt_secret).map_err(|e| {
            error!(error = %e, "failed to sign token");
            ServiceError::IncorrectPassword
        })?;

        info!(user_id = user.id, "Login took: {:?}", start.elapsed());
        Ok(AuthResponse {
            token: issued.token,
            expired_at: issued.expired_at,
            user: user.into(),
        })
    }
}
