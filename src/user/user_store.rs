use super::auth::{AuthToken, AuthTokenValue, PasswordCredentials};
use super::user_models::{UserAccount, UserRole};
use anyhow::Result;

pub trait UserAuthTokenStore: Send + Sync {
    /// Returns a user's authentication token given an AuthTokenValue.
    /// Returns Ok(None) if the token does not exist.
    fn get_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    /// Deletes an auth token given the token value.
    /// Returns Ok(None) if the token does not exist.
    fn delete_auth_token(&self, token: &AuthTokenValue) -> Result<Option<AuthToken>>;

    /// Updates an auth token with the latest used timestamp.
    fn touch_auth_token(&self, token: &AuthTokenValue) -> Result<()>;

    /// Adds a new auth token.
    fn add_auth_token(&self, token: AuthToken) -> Result<()>;
}

pub trait UserStore: UserAuthTokenStore + Send + Sync {
    /// Creates a new user and returns the user id.
    /// Returns Err if the (email, role) pair already exists.
    fn create_user(&self, name: &str, email: &str, role: UserRole) -> Result<usize>;

    /// Returns the account for the given user id.
    /// Returns Ok(None) if the user does not exist.
    fn get_user(&self, user_id: usize) -> Result<Option<UserAccount>>;

    /// Looks a user up by email within a role. The same email may exist once
    /// per role.
    fn find_user(&self, email: &str, role: UserRole) -> Result<Option<UserAccount>>;

    /// Returns the user's password credentials.
    /// Returns Ok(None) if the user has none.
    fn get_password_credentials(&self, user_id: usize) -> Result<Option<PasswordCredentials>>;

    /// Stores (or replaces) the user's password credentials.
    fn set_password_credentials(&self, credentials: PasswordCredentials) -> Result<()>;
}
