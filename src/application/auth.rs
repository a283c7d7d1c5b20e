use std::sync::Arc;

use blogwright_api_types::{Account, Session};
use thiserror::Error;
use tracing::{debug, error, info};

use crate::application::backend::{AccountApi, BackendError};
use crate::application::error::ErrorKind;
use crate::domain::error::{DomainError, require};
use crate::domain::ids::unique_id;

/// Account operations surface backend failures unchanged.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Domain(err) => err.kind(),
            AuthError::Backend(err) => err.kind(),
        }
    }
}

/// Account and session lifecycle for the identity bound to the backend client.
#[derive(Clone)]
pub struct AuthService {
    account: Arc<dyn AccountApi>,
}

impl AuthService {
    pub fn new(account: Arc<dyn AccountApi>) -> Self {
        Self { account }
    }

    /// Register a new account under a generated id, then sign it in.
    pub async fn create_account(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Session, AuthError> {
        require("email", email)?;
        require("password", password)?;
        require("name", name)?;

        let user_id = unique_id();
        let account = self
            .account
            .create(&user_id, email, password, name)
            .await
            .inspect_err(|err| {
                error!(
                    operation = "create_account",
                    kind = %err.kind(),
                    error = %err,
                    "Error creating account"
                );
            })?;
        info!(account_id = %account.id, "Account created");

        self.login(email, password).await
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        require("email", email)?;
        require("password", password)?;

        let session = self
            .account
            .create_email_session(email, password)
            .await
            .inspect_err(|err| {
                error!(
                    operation = "login",
                    kind = %err.kind(),
                    error = %err,
                    "Login error"
                );
            })?;
        info!(session_id = %session.id, user_id = %session.user_id, "Session created");
        Ok(session)
    }

    pub async fn get_current_user(&self) -> Result<Account, AuthError> {
        debug!("Fetching current user");
        let account = self.account.get().await.inspect_err(|err| {
            error!(
                operation = "get_current_user",
                kind = %err.kind(),
                error = %err,
                "Error fetching current user"
            );
        })?;
        Ok(account)
    }

    /// Delete every session of the current identity.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.account.delete_sessions().await.inspect_err(|err| {
            error!(
                operation = "logout",
                kind = %err.kind(),
                error = %err,
                "Logout error"
            );
        })?;
        info!("User logged out");
        Ok(())
    }
}
