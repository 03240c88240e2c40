use super::{
    auth::PasswordCredentials, user_models::UserAccount, AuthToken, AuthTokenValue, UserRole,
    UserStore,
};
use anyhow::{bail, Result};
use std::time::SystemTime;
use tracing::debug;

pub struct UserManager {
    user_store: Box<dyn UserStore>,
}

impl UserManager {
    pub fn new(user_store: Box<dyn UserStore>) -> Self {
        Self { user_store }
    }

    /// Registers a new account with password credentials.
    /// Returns Err if the email is already registered for the role.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<usize> {
        if name.is_empty() || email.is_empty() || password.is_empty() {
            bail!("Name, email and password must not be empty.");
        }
        if self.user_store.find_user(email, role)?.is_some() {
            bail!("A {} with email {} already exists.", role.as_str(), email);
        }

        let user_id = self.user_store.create_user(name, email, role)?;
        self.user_store
            .set_password_credentials(PasswordCredentials::from_plain_password(
                user_id, password,
            )?)?;
        Ok(user_id)
    }

    /// Verifies credentials and issues a fresh auth token.
    /// Returns Ok(None) when the user does not exist or the password does not
    /// match, indistinguishably.
    pub fn login(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Option<(UserAccount, AuthToken)>> {
        let user = match self.user_store.find_user(email, role)? {
            Some(user) => user,
            None => return Ok(None),
        };
        let credentials = match self.user_store.get_password_credentials(user.id)? {
            Some(credentials) => credentials,
            None => return Ok(None),
        };
        if !credentials.verify(password)? {
            debug!("Password mismatch for user_id={}", user.id);
            return Ok(None);
        }

        let token = AuthToken {
            user_id: user.id,
            value: AuthTokenValue::generate(),
            created: SystemTime::now(),
            last_used: None,
        };
        self.user_store.add_auth_token(token.clone())?;
        Ok(Some((user, token)))
    }

    /// Resolves a session token to its account, updating the token's
    /// last_used timestamp.
    pub fn resolve_session(&self, value: &AuthTokenValue) -> Result<Option<UserAccount>> {
        let token = match self.user_store.get_auth_token(value)? {
            Some(token) => token,
            None => return Ok(None),
        };
        if let Err(err) = self.user_store.touch_auth_token(value) {
            // Not critical for authentication.
            debug!("Failed to update auth token last_used timestamp: {}", err);
        }
        self.user_store.get_user(token.user_id)
    }

    /// Deletes the session token. Returns false if it did not exist.
    pub fn logout(&self, value: &AuthTokenValue) -> Result<bool> {
        Ok(self.user_store.delete_auth_token(value)?.is_some())
    }

    pub fn get_user(&self, user_id: usize) -> Result<Option<UserAccount>> {
        self.user_store.get_user(user_id)
    }
}
