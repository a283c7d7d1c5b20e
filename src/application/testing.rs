//! In-memory backend double used by the service tests.
//!
//! It keeps one signed-in identity, enforces document and file permissions
//! against it, and can be told to fail every call with a given status.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use blogwright_api_types::{Account, JsonMap, RawDocument, RawDocumentList, Session, StoredFile};
use time::OffsetDateTime;
use url::Url;

use crate::application::backend::{
    AccountApi, BackendError, CollectionPath, DatabaseApi, StorageApi,
};
use crate::domain::files::{FileUpload, PreviewOptions};
use crate::domain::permissions::{Permission, PermissionKind, Role};
use crate::domain::query::{Query, QueryMethod};

#[derive(Default)]
struct State {
    accounts: HashMap<String, (Account, String)>,
    current_user: Option<String>,
    documents: HashMap<String, RawDocument>,
    files: HashMap<String, StoredFile>,
    last_queries: Vec<String>,
    last_permissions: Vec<Permission>,
    failure: Option<(u16, &'static str)>,
    calls: usize,
}

#[derive(Default)]
pub(crate) struct InMemoryBackend {
    state: Mutex<State>,
}

impl InMemoryBackend {
    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().expect("in-memory backend lock")
    }

    /// Make every following call fail with `status` and `error_type`.
    pub(crate) fn fail_with(&self, status: u16, error_type: &'static str) {
        self.state().failure = Some((status, error_type));
    }

    pub(crate) fn recover(&self) {
        self.state().failure = None;
    }

    pub(crate) fn account_count(&self) -> usize {
        self.state().accounts.len()
    }

    pub(crate) fn calls(&self) -> usize {
        self.state().calls
    }

    pub(crate) fn last_queries(&self) -> Vec<String> {
        self.state().last_queries.clone()
    }

    pub(crate) fn last_permissions(&self) -> Vec<Permission> {
        self.state().last_permissions.clone()
    }

    pub(crate) fn document(&self, id: &str) -> Option<RawDocument> {
        self.state().documents.get(id).cloned()
    }

    /// Store a document as another client might have written it.
    pub(crate) fn insert_document(&self, document: RawDocument) {
        self.state().documents.insert(document.id.clone(), document);
    }

    pub(crate) fn file_count(&self) -> usize {
        self.state().files.len()
    }

    /// Switch the signed-in identity without going through a login.
    pub(crate) fn sign_in_as(&self, user_id: &str) {
        self.state().current_user = Some(user_id.to_string());
    }

    fn begin(&self) -> Result<std::sync::MutexGuard<'_, State>, BackendError> {
        let mut state = self.state();
        state.calls += 1;
        if let Some((status, error_type)) = state.failure {
            return Err(BackendError::api(status, error_type, "injected failure"));
        }
        Ok(state)
    }
}

fn unauthorized() -> BackendError {
    BackendError::api(
        401,
        "user_unauthorized",
        "The current user is not authorized to perform the requested action.",
    )
}

fn allows(permissions: &[String], kind: PermissionKind, user: Option<&str>) -> bool {
    permissions
        .iter()
        .filter_map(|raw| raw.parse::<Permission>().ok())
        .any(|permission| {
            let kind_matches = permission.kind == kind
                || (permission.kind == PermissionKind::Write && kind != PermissionKind::Read);
            let role_matches = match (&permission.role, user) {
                (Role::Any, _) => true,
                (Role::Users, Some(_)) => true,
                (Role::Guests, None) => true,
                (Role::User(id), Some(user)) => id == user,
                _ => false,
            };
            kind_matches && role_matches
        })
}

fn satisfies(document: &RawDocument, query: &Query) -> bool {
    let Some(attribute) = query.attribute() else {
        return true;
    };
    let value = document.data.get(attribute);
    match query.method() {
        QueryMethod::Equal => value.is_some_and(|v| query.values().contains(v)),
        QueryMethod::NotEqual => !value.is_some_and(|v| query.values().contains(v)),
        _ => true,
    }
}

#[async_trait]
impl AccountApi for InMemoryBackend {
    async fn create(
        &self,
        user_id: &str,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Account, BackendError> {
        let mut state = self.begin()?;
        if state.accounts.values().any(|(a, _)| a.email == email) {
            return Err(BackendError::api(
                409,
                "user_already_exists",
                "A user with the same id, email, or phone already exists in this project.",
            ));
        }
        let now = OffsetDateTime::now_utc();
        let account = Account {
            id: user_id.to_string(),
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            email: email.to_string(),
            status: true,
            email_verification: false,
            labels: Vec::new(),
            prefs: JsonMap::new(),
        };
        state
            .accounts
            .insert(user_id.to_string(), (account.clone(), password.to_string()));
        Ok(account)
    }

    async fn create_email_session(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let mut state = self.begin()?;
        let user_id = state
            .accounts
            .values()
            .find(|(account, stored)| account.email == email && stored == password)
            .map(|(account, _)| account.id.clone())
            .ok_or_else(|| {
                BackendError::api(
                    401,
                    "user_invalid_credentials",
                    "Invalid credentials. Please check the email and password.",
                )
            })?;
        state.current_user = Some(user_id.clone());
        let now = OffsetDateTime::now_utc();
        Ok(Session {
            id: crate::domain::ids::unique_id(),
            created_at: now,
            user_id,
            expire: now + time::Duration::days(365),
            provider: "email".to_string(),
            provider_uid: email.to_string(),
            ip: "127.0.0.1".to_string(),
            current: true,
        })
    }

    async fn get(&self) -> Result<Account, BackendError> {
        let state = self.begin()?;
        let user = state.current_user.as_ref().ok_or_else(unauthorized)?;
        state
            .accounts
            .get(user)
            .map(|(account, _)| account.clone())
            .ok_or_else(unauthorized)
    }

    async fn delete_sessions(&self) -> Result<(), BackendError> {
        let mut state = self.begin()?;
        state.current_user.take().map(|_| ()).ok_or_else(unauthorized)
    }
}

#[async_trait]
impl DatabaseApi for InMemoryBackend {
    async fn create_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
        data: serde_json::Value,
        permissions: &[Permission],
    ) -> Result<RawDocument, BackendError> {
        let mut state = self.begin()?;
        if state.current_user.is_none() {
            return Err(unauthorized());
        }
        if state.documents.contains_key(document_id) {
            return Err(BackendError::api(
                409,
                "document_already_exists",
                "Document with the requested ID already exists.",
            ));
        }
        let serde_json::Value::Object(data) = data else {
            return Err(BackendError::api(400, "document_invalid_structure", "not an object"));
        };
        let now = OffsetDateTime::now_utc();
        let document = RawDocument {
            id: document_id.to_string(),
            collection_id: collection.collection_id.clone(),
            database_id: collection.database_id.clone(),
            created_at: now,
            updated_at: now,
            permissions: permissions.iter().map(ToString::to_string).collect(),
            data,
        };
        state.last_permissions = permissions.to_vec();
        state
            .documents
            .insert(document_id.to_string(), document.clone());
        Ok(document)
    }

    async fn update_document(
        &self,
        _collection: &CollectionPath,
        document_id: &str,
        data: serde_json::Value,
    ) -> Result<RawDocument, BackendError> {
        let mut state = self.begin()?;
        let user = state.current_user.clone();
        let document = state.documents.get_mut(document_id).ok_or_else(|| {
            BackendError::api(
                404,
                "document_not_found",
                "Document with the requested ID could not be found.",
            )
        })?;
        if !allows(&document.permissions, PermissionKind::Update, user.as_deref()) {
            return Err(unauthorized());
        }
        if let serde_json::Value::Object(fields) = data {
            document.data.extend(fields);
        }
        document.updated_at = OffsetDateTime::now_utc();
        Ok(document.clone())
    }

    async fn delete_document(
        &self,
        _collection: &CollectionPath,
        document_id: &str,
    ) -> Result<(), BackendError> {
        let mut state = self.begin()?;
        let user = state.current_user.clone();
        let document = state.documents.get(document_id).ok_or_else(|| {
            BackendError::api(
                404,
                "document_not_found",
                "Document with the requested ID could not be found.",
            )
        })?;
        if !allows(&document.permissions, PermissionKind::Delete, user.as_deref()) {
            return Err(unauthorized());
        }
        state.documents.remove(document_id);
        Ok(())
    }

    async fn get_document(
        &self,
        _collection: &CollectionPath,
        document_id: &str,
    ) -> Result<RawDocument, BackendError> {
        let state = self.begin()?;
        state
            .documents
            .get(document_id)
            .filter(|doc| {
                allows(
                    &doc.permissions,
                    PermissionKind::Read,
                    state.current_user.as_deref(),
                )
            })
            .cloned()
            .ok_or_else(|| {
                BackendError::api(
                    404,
                    "document_not_found",
                    "Document with the requested ID could not be found.",
                )
            })
    }

    async fn list_documents(
        &self,
        _collection: &CollectionPath,
        queries: &[Query],
    ) -> Result<RawDocumentList, BackendError> {
        let mut state = self.begin()?;
        state.last_queries = queries.iter().map(ToString::to_string).collect();
        let user = state.current_user.clone();
        let mut documents: Vec<RawDocument> = state
            .documents
            .values()
            .filter(|doc| allows(&doc.permissions, PermissionKind::Read, user.as_deref()))
            .filter(|doc| queries.iter().all(|q| satisfies(doc, q)))
            .cloned()
            .collect();
        documents.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(RawDocumentList {
            total: documents.len() as u64,
            documents,
        })
    }
}

#[async_trait]
impl StorageApi for InMemoryBackend {
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        upload: FileUpload,
        permissions: &[Permission],
    ) -> Result<StoredFile, BackendError> {
        let mut state = self.begin()?;
        if state.current_user.is_none() {
            return Err(unauthorized());
        }
        let now = OffsetDateTime::now_utc();
        let file = StoredFile {
            id: file_id.to_string(),
            bucket_id: bucket_id.to_string(),
            created_at: now,
            updated_at: now,
            permissions: permissions.iter().map(ToString::to_string).collect(),
            name: upload.file_name.clone(),
            signature: String::new(),
            mime_type: upload.content_type.clone(),
            size_original: upload.len() as u64,
            chunks_total: 1,
            chunks_uploaded: 1,
        };
        state.last_permissions = permissions.to_vec();
        state.files.insert(file_id.to_string(), file.clone());
        Ok(file)
    }

    async fn delete_file(&self, _bucket_id: &str, file_id: &str) -> Result<(), BackendError> {
        let mut state = self.begin()?;
        let user = state.current_user.clone();
        let file = state.files.get(file_id).ok_or_else(|| {
            BackendError::api(
                404,
                "storage_file_not_found",
                "The requested file could not be found.",
            )
        })?;
        if !allows(&file.permissions, PermissionKind::Delete, user.as_deref()) {
            return Err(unauthorized());
        }
        state.files.remove(file_id);
        Ok(())
    }

    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> Result<Url, BackendError> {
        let state = self.begin()?;
        drop(state);
        let mut url = Url::parse("http://backend.test/v1").map_err(BackendError::invalid_request)?;
        url.path_segments_mut()
            .map_err(|()| BackendError::invalid_request("endpoint cannot be a base"))?
            .extend(["storage", "buckets", bucket_id, "files", file_id, "preview"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("project", "test");
            for (key, value) in options.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }
}
