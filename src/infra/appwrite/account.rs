use async_trait::async_trait;
use blogwright_api_types::{Account, Session};
use serde_json::json;

use crate::application::backend::{AccountApi, BackendError};

use super::AppwriteClient;

#[async_trait]
impl AccountApi for AppwriteClient {
    async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError> {
        let url = self.url(&["account"])?;
        let body = json!({
            "userId": user_id,
            "email": email,
            "password": password,
            "name": name,
        });
        self.execute("account.create", self.http.post(url).json(&body))
            .await
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let url = self.url(&["account", "sessions", "email"])?;
        let body = json!({ "email": email, "password": password });
        self.execute("account.create_email_session", self.http.post(url).json(&body))
            .await
    }

    async fn get(&self) -> Result<Account, BackendError> {
        let url = self.url(&["account"])?;
        self.execute("account.get", self.http.get(url)).await
    }

    async fn delete_sessions(&self) -> Result<(), BackendError> {
        let url = self.url(&["account", "sessions"])?;
        self.execute_unit("account.delete_sessions", self.http.delete(url))
            .await
    }
}
