//! Wire types returned by the blog backend (Appwrite response format 1.4).
//!
//! Shared between the client library and the command-line front end so both
//! decode and print exactly the same shapes.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// Attribute map of a document whose collection schema is not known statically.
pub type JsonMap = serde_json::Map<String, serde_json::Value>;

/// A user account as reported by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "$updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub email_verification: bool,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub prefs: JsonMap,
}

/// An authenticated session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expire: OffsetDateTime,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub provider_uid: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub current: bool,
}

/// A stored document: system attributes plus the collection's own attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document<T> {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "$collectionId")]
    pub collection_id: String,
    #[serde(rename = "$databaseId")]
    pub database_id: String,
    #[serde(rename = "$createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "$updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(rename = "$permissions", default)]
    pub permissions: Vec<String>,
    #[serde(flatten)]
    pub data: T,
}

/// A document whose attributes have not been decoded into a schema type.
pub type RawDocument = Document<JsonMap>;

impl RawDocument {
    /// Decode the attribute map into `T`, keeping the system attributes.
    pub fn decode<T: DeserializeOwned>(self) -> Result<Document<T>, serde_json::Error> {
        let data = serde_json::from_value(serde_json::Value::Object(self.data))?;
        Ok(Document {
            id: self.id,
            collection_id: self.collection_id,
            database_id: self.database_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            permissions: self.permissions,
            data,
        })
    }
}

/// One page of documents matching a query list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentList<T> {
    pub total: u64,
    pub documents: Vec<Document<T>>,
}

pub type RawDocumentList = DocumentList<JsonMap>;

impl RawDocumentList {
    pub fn decode<T: DeserializeOwned>(self) -> Result<DocumentList<T>, serde_json::Error> {
        let documents = self
            .documents
            .into_iter()
            .map(RawDocument::decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(DocumentList {
            total: self.total,
            documents,
        })
    }
}

/// Publication state stored on every post.
///
/// The collection attribute is a free string, so values written by other
/// clients (`draft`, `archived`, ...) are kept as [`PostStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostStatus {
    Active,
    Inactive,
    Other(String),
}

impl PostStatus {
    pub fn as_str(&self) -> &str {
        match self {
            PostStatus::Active => "active",
            PostStatus::Inactive => "inactive",
            PostStatus::Other(value) => value,
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for PostStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => PostStatus::Active,
            "inactive" => PostStatus::Inactive,
            _ => PostStatus::Other(value),
        }
    }
}

impl From<PostStatus> for String {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for PostStatus {
    type Err = Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Ok(PostStatus::from(value.to_string()))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Attributes of the posts collection. The slug is the document id.
///
/// `title` and `content` are optional attributes on the backend and decode
/// to an empty string when absent or `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PostFields {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default)]
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub user_id: String,
}

pub type Post = Document<PostFields>;
pub type PostList = DocumentList<PostFields>;

/// Metadata of an object held in a storage bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    #[serde(rename = "$id")]
    pub id: String,
    pub bucket_id: String,
    #[serde(rename = "$createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(rename = "$updatedAt", with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(rename = "$permissions", default)]
    pub permissions: Vec<String>,
    pub name: String,
    #[serde(default)]
    pub signature: String,
    pub mime_type: String,
    pub size_original: u64,
    #[serde(default)]
    pub chunks_total: u32,
    #[serde(default)]
    pub chunks_uploaded: u32,
}

/// Error body returned by the backend for non-2xx responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub message: String,
    #[serde(default)]
    pub code: u16,
    #[serde(rename = "type", default)]
    pub error_type: String,
}
