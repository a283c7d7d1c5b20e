//! Write payloads for the posts collection.

use blogwright_api_types::PostStatus;
use serde::Serialize;

/// Everything needed to create a post. The slug becomes the document id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
    pub user_id: String,
}

impl NewPost {
    /// Attribute map sent to the backend; the slug travels separately as the id.
    pub fn attributes(&self) -> serde_json::Value {
        serde_json::json!(CreateAttributes {
            title: &self.title,
            content: &self.content,
            featured_image: self.featured_image.as_deref(),
            status: &self.status,
            user_id: &self.user_id,
        })
    }
}

/// Full replacement of a post's mutable attributes. Ownership is not touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: String,
    pub content: String,
    pub featured_image: Option<String>,
    pub status: PostStatus,
}

impl PostUpdate {
    pub fn attributes(&self) -> serde_json::Value {
        serde_json::json!(UpdateAttributes {
            title: &self.title,
            content: &self.content,
            featured_image: self.featured_image.as_deref(),
            status: &self.status,
        })
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAttributes<'a> {
    title: &'a str,
    content: &'a str,
    featured_image: Option<&'a str>,
    status: &'a PostStatus,
    user_id: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAttributes<'a> {
    title: &'a str,
    content: &'a str,
    featured_image: Option<&'a str>,
    status: &'a PostStatus,
}
