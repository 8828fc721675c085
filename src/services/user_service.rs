use std::sync::Arc;

use tracing::error;

use crate::{commons::errors::ServiceError, models::user::UserDto, repositories::UserRepository};

pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    pub async fn get_user_by_id(&self, id: i32) -> Result<UserDto, ServiceError> {
        let user = self
            .user_repository
            .find_by_id(id)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = id, "failed to fetch user");
                ServiceError::FetchFailed("user")
            })?
            .ok_or(ServiceError::UserNotFound)?;

        Ok(user.into())
    }

    pub async fn get_users(&self) -> Result<Vec<UserDto>, ServiceError> {
        let users = self.user_repository.find_all().await.map_err(|e| {
            error!(error = %e, "failed to fetch users");
            ServiceError::FetchFailed("users")
        })?;

        Ok(users.into_iter().map(UserDto::from).collect())
    }
}
