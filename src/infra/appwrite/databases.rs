use async_trait::async_trait;
use blogwright_api_types::{RawDocument, RawDocumentList};
use reqwest::Url;
use serde_json::json;

use crate::application::backend::{BackendError, CollectionPath, DatabaseApi};
use crate::domain::permissions::Permission;
use crate::domain::query::Query;

use super::AppwriteClient;

impl AppwriteClient {
    fn documents_url(
        &self,
        collection: &CollectionPath,
        document_id: Option<&str>,
    ) -> Result<Url, BackendError> {
        let mut segments = vec![
            "databases",
            collection.database_id.as_str(),
            "collections",
            collection.collection_id.as_str(),
            "documents",
        ];
        segments.extend(document_id);
        self.url(&segments)
    }
}

#[async_trait]
impl DatabaseApi for AppwriteClient {
    async fn create_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
        data: serde_json::Value,
        permissions: &[Permission],
    ) -> Result<RawDocument, BackendError> {
        let url = self.documents_url(collection, None)?;
        let permissions: Vec<String> = permissions.iter().map(ToString::to_string).collect();
        let body = json!({
            "documentId": document_id,
            "data": data,
            "permissions": permissions,
        });
        self.execute("databases.create_document", self.http.post(url).json(&body))
            .await
    }

    async fn update_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
        data: serde_json::Value,
    ) -> Result<RawDocument, BackendError> {
        let url = self.documents_url(collection, Some(document_id))?;
        let body = json!({ "data": data });
        self.execute("databases.update_document", self.http.patch(url).json(&body))
            .await
    }

    async fn delete_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
    ) -> Result<(), BackendError> {
        let url = self.documents_url(collection, Some(document_id))?;
        self.execute_unit("databases.delete_document", self.http.delete(url))
            .await
    }

    async fn get_document(
        &self,
        collection: &CollectionPath,
        document_id: &str,
    ) -> Result<RawDocument, BackendError> {
        let url = self.documents_url(collection, Some(document_id))?;
        self.execute("databases.get_document", self.http.get(url))
            .await
    }

    async fn list_documents(
        &self,
        collection: &CollectionPath,
        queries: &[Query],
    ) -> Result<RawDocumentList, BackendError> {
        let mut url = self.documents_url(collection, None)?;
        if !queries.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for query in queries {
                pairs.append_pair("queries[]", &query.to_string());
            }
        }
        self.execute("databases.list_documents", self.http.get(url))
            .await
    }
}
