use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::users_model::{username_base, NewUser, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use super::UserError;
use crate::errors::Result;

/// Service for registering and looking up users.
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }

    /// Finds a username that is not taken yet by appending an increasing
    /// numeric suffix to the base derived from the display name.
    fn generate_unique_username(&self, name: &str) -> Result<String> {
        let base = username_base(name);
        let mut candidate = base.clone();
        let mut counter: u32 = 1;
        while self.repository.find_by_username(&candidate)?.is_some() {
            candidate = format!("{}{}", base, counter);
            counter += 1;
        }
        Ok(candidate)
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register_user(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;

        if self.repository.find_by_email(&new_user.email)?.is_some() {
            return Err(UserError::EmailTaken(new_user.email).into());
        }

        let username = self.generate_unique_username(&new_user.name)?;
        debug!(
            "Registering user with email {} as username {}",
            new_user.email, username
        );
        self.repository.insert(new_user, username).await
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository.get_by_id(user_id)
    }

    fn get_user_by_email(&self, email: &str) -> Result<User> {
        self.repository
            .find_by_email(email)?
            .ok_or_else(|| UserError::NotFound(format!("no user with email {}", email)).into())
    }
}
