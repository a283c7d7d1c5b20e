//! Traits describing the remote backend the façades delegate to.

use async_trait::async_trait;
use blogwright_api_types::{Account, RawDocument, RawDocumentList, Session, StoredFile};
use thiserror::Error;
use url::Url;

use crate::application::error::ErrorKind;
use crate::domain::files::{FileUpload, PreviewOptions};
use crate::domain::permissions::Permission;
use crate::domain::query::Query;

#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        error_type: String,
        message: String,
    },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("failed to decode backend response: {0}")]
    Decode(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl BackendError {
    pub fn api(status: u16, error_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            error_type: error_type.into(),
            message: message.into(),
        }
    }

    pub fn transport(err: impl std::fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    pub fn decode(err: impl std::fmt::Display) -> Self {
        Self::Decode(err.to_string())
    }

    pub fn invalid_request(err: impl std::fmt::Display) -> Self {
        Self::InvalidRequest(err.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BackendError::Api { status, .. } => ErrorKind::from_status(*status),
            BackendError::Transport(_) => ErrorKind::Transport,
            BackendError::Decode(_) => ErrorKind::Unexpected,
            BackendError::InvalidRequest(_) => ErrorKind::Validation,
        }
    }

    /// Backend error code such as `document_not_found`, when one was reported.
    pub fn error_type(&self) -> Option<&str> {
        match self {
            BackendError::Api { error_type, .. } if !error_type.is_empty() => Some(error_type),
            _ => None,
        }
    }
}

/// Database and collection that hold a set of documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPath {
    pub database_id: String,
    pub collection_id: String,
}

impl CollectionPath {
    pub fn new(database_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            database_id: database_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

/// Account and session endpoints for the identity bound to the client.
#[async_trait]
pub trait AccountApi: Send + Sync {
    async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError>;

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError>;

    async fn get(&self) -> Result<Account, BackendError>;

    async fn delete_sessions(&self) -> Result<(), BackendError>;
}

#[async_trait]
pub trait DatabaseApi: Send + Sync {
    async fn create_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
        data: serde_json::Value,
        permissions: &[Permission],
    ) -> Result<RawDocument, BackendError>;

    async fn update_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
        data: serde_json::Value,
    ) -> Result<RawDocument, BackendError>;

    async fn delete_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
    ) -> Result<(), BackendError>;

    async fn get_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
    ) -> Result<RawDocument, BackendError>;

    async fn list_documents(
        &self,
        collection: &CollectionPath,
        queries: &[Query],
    ) -> Result<RawDocumentList, BackendError>;
}

#[async_trait]
pub trait StorageApi: Send + Sync {
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        upload: FileUpload,
        permissions: &[Permission],
    ) -> Result<StoredFile, BackendError>;

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<(), BackendError>;

    /// Derive the preview URL locally; no request is made.
    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> Result<Url, BackendError>;
}
