//! In-memory user storage.

use parking_lot::RwLock;
use shared_types::UserId;
use std::collections::HashMap;

use crate::domain::User;
use crate::error::UserError;
use crate::ports::UserRepository;

/// Process-local [`UserRepository`].
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepository for InMemoryUserRepository {
    fn insert(&self, user: User) -> Result<(), UserError> {
        let mut users = self.users.write();
        let taken = users
            .values()
            .any(|u| u.username.eq_ignore_ascii_case(&user.username));
        if taken {
            return Err(UserError::UsernameTaken(user.username));
        }
        users.insert(user.id, user);
        Ok(())
    }

    fn update(&self, user: User) -> Result<(), UserError> {
        let mut users = self.users.write();
        match users.get_mut(&user.id) {
            Some(existing) => {
                *existing = user;
                Ok(())
            }
            None => Err(UserError::NotFound(user.id)),
        }
    }

    fn get(&self, user_id: UserId) -> Option<User> {
        self.users.read().get(&user_id).cloned()
    }

    fn find_by_username(&self, username: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned()
    }

    fn all(&self) -> Vec<User> {
        self.users.read().values().cloned().collect()
    }

    fn count(&self) -> usize {
        self.users.read().len()
    }
}
