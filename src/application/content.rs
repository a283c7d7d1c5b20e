use std::sync::Arc;

use blogwright_api_types::{Post, PostFields, PostList, RawDocument, StoredFile};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::application::backend::{BackendError, CollectionPath, DatabaseApi, StorageApi};
use crate::application::error::ErrorKind;
use crate::domain::error::{DomainError, require_id};
use crate::domain::files::{FileUpload, PreviewOptions};
use crate::domain::ids::unique_id;
use crate::domain::permissions::owner_only;
use crate::domain::posts::{NewPost, PostUpdate};
use crate::domain::query::Query;

/// Post and file failures. Most variants display a fixed message and keep the
/// backend error only as their source; listing surfaces it unchanged.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Failed to create post. Ensure the user has appropriate permissions.")]
    CreatePost(#[source] BackendError),
    #[error("Failed to update post. Ensure the user has appropriate permissions.")]
    UpdatePost(#[source] BackendError),
    /// The write was accepted but the returned document does not decode.
    #[error("Post `{slug}` was saved but the backend response could not be read.")]
    UnreadablePost {
        slug: String,
        #[source]
        source: BackendError,
    },
    #[error("Failed to fetch post. Ensure the user has appropriate permissions.")]
    GetPost(#[source] BackendError),
    #[error("Failed to delete post.")]
    DeletePost(#[source] BackendError),
    #[error(transparent)]
    ListPosts(BackendError),
    #[error("Failed to upload file. Ensure the user has appropriate permissions.")]
    UploadFile(#[source] BackendError),
    #[error("Failed to delete file.")]
    DeleteFile(#[source] BackendError),
    #[error("Failed to get file preview.")]
    FilePreview(#[source] BackendError),
}

impl ContentError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContentError::Domain(err) => err.kind(),
            other => other.backend().map_or(ErrorKind::Unexpected, BackendError::kind),
        }
    }

    pub fn backend(&self) -> Option<&BackendError> {
        match self {
            ContentError::Domain(_) => None,
            ContentError::CreatePost(err)
            | ContentError::UpdatePost(err)
            | ContentError::GetPost(err)
            | ContentError::DeletePost(err)
            | ContentError::ListPosts(err)
            | ContentError::UploadFile(err)
            | ContentError::DeleteFile(err)
            | ContentError::FilePreview(err) => Some(err),
            ContentError::UnreadablePost { source, .. } => Some(source),
        }
    }
}

/// Where posts and their images live on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentTargets {
    pub posts: CollectionPath,
    pub bucket_id: String,
}

/// Posts collection and image bucket operations.
#[derive(Clone)]
pub struct ContentService {
    databases: Arc<dyn DatabaseApi>,
    storage: Arc<dyn StorageApi>,
    targets: ContentTargets,
}

impl ContentService {
    pub fn new(
        databases: Arc<dyn DatabaseApi>,
        storage: Arc<dyn StorageApi>,
        targets: ContentTargets,
    ) -> Self {
        Self {
            databases,
            storage,
            targets,
        }
    }

    pub fn targets(&self) -> &ContentTargets {
        &self.targets
    }

    /// Create a post readable, editable and deletable only by `post.user_id`.
    pub async fn create_post(&self, post: &NewPost) -> Result<Post, ContentError> {
        require_id("slug", &post.slug)?;
        require_id("user_id", &post.user_id)?;

        let permissions = owner_only(&post.user_id);
        let raw = self
            .databases
            .create_document(
                &self.targets.posts,
                &post.slug,
                post.attributes(),
                &permissions,
            )
            .await
            .map_err(|err| {
                log_failure("create_post", &err);
                ContentError::CreatePost(err)
            })?;

        let created = decode_saved_post("create_post", raw)?;
        info!(slug = %created.id, user_id = %post.user_id, "Post created");
        Ok(created)
    }

    /// Overwrite every mutable attribute of the post keyed by `slug`.
    pub async fn update_post(&self, slug: &str, update: &PostUpdate) -> Result<Post, ContentError> {
        require_id("slug", slug)?;

        let raw = self
            .databases
            .update_document(&self.targets.posts, slug, update.attributes())
            .await
            .map_err(|err| {
                log_failure("update_post", &err);
                ContentError::UpdatePost(err)
            })?;
        decode_saved_post("update_post", raw)
    }

    /// Delete a post, reporting only whether it worked.
    pub async fn delete_post(&self, slug: &str) -> bool {
        match self.try_delete_post(slug).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    operation = "delete_post",
                    slug,
                    kind = %err.kind(),
                    error = %err,
                    "Post not deleted"
                );
                false
            }
        }
    }

    pub async fn try_delete_post(&self, slug: &str) -> Result<(), ContentError> {
        require_id("slug", slug)?;

        self.databases
            .delete_document(&self.targets.posts, slug)
            .await
            .map_err(ContentError::DeletePost)?;
        info!(slug, "Post deleted");
        Ok(())
    }

    pub async fn get_post(&self, slug: &str) -> Result<Post, ContentError> {
        require_id("slug", slug)?;

        self.databases
            .get_document(&self.targets.posts, slug)
            .await
            .and_then(decode_post)
            .map_err(|err| {
                log_failure("get_post", &err);
                ContentError::GetPost(err)
            })
    }

    /// List posts matching `queries`, or active posts when none are given.
    pub async fn list_posts(&self, queries: Option<Vec<Query>>) -> Result<PostList, ContentError> {
        let queries = queries.unwrap_or_else(Query::active_posts);
        debug!(query_count = queries.len(), "Listing posts");

        self.databases
            .list_documents(&self.targets.posts, &queries)
            .await
            .and_then(|list| list.decode::<PostFields>().map_err(BackendError::decode))
            .map_err(|err| {
                log_failure("list_posts", &err);
                ContentError::ListPosts(err)
            })
    }

    /// Store a file under a generated id, owned by `user_id` alone.
    pub async fn upload_file(
        &self,
        upload: FileUpload,
        user_id: &str,
    ) -> Result<StoredFile, ContentError> {
        require_id("user_id", user_id)?;

        let file_id = unique_id();
        let permissions = owner_only(user_id);
        let file_name = upload.file_name.clone();
        let size = upload.len();

        match self
            .storage
            .create_file(&self.targets.bucket_id, &file_id, upload, &permissions)
            .await
        {
            Ok(file) => {
                info!(file_id = %file.id, file_name = %file_name, size, "File uploaded");
                Ok(file)
            }
            Err(err) => {
                log_failure("upload_file", &err);
                Err(ContentError::UploadFile(err))
            }
        }
    }

    /// Delete a stored file, reporting only whether it worked.
    pub async fn delete_file(&self, file_id: &str) -> bool {
        match self.try_delete_file(file_id).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    operation = "delete_file",
                    file_id,
                    kind = %err.kind(),
                    error = %err,
                    "File not deleted"
                );
                false
            }
        }
    }

    pub async fn try_delete_file(&self, file_id: &str) -> Result<(), ContentError> {
        require_id("file_id", file_id)?;

        self.storage
            .delete_file(&self.targets.bucket_id, file_id)
            .await
            .map_err(ContentError::DeleteFile)?;
        info!(file_id, "File deleted");
        Ok(())
    }

    /// Preview URL for a stored image. Computed locally, so it succeeds even
    /// when the file does not exist; the backend reports that on fetch.
    pub fn get_file_preview(
        &self,
        file_id: &str,
        options: &PreviewOptions,
    ) -> Result<Url, ContentError> {
        require_id("file_id", file_id)?;

        self.storage
            .file_preview_url(&self.targets.bucket_id, file_id, options)
            .map_err(|err| {
                log_failure("get_file_preview", &err);
                ContentError::FilePreview(err)
            })
    }
}

fn decode_post(raw: RawDocument) -> Result<Post, BackendError> {
    raw.decode::<PostFields>().map_err(BackendError::decode)
}

/// Decode the document echoed back by a successful write.
fn decode_saved_post(operation: &'static str, raw: RawDocument) -> Result<Post, ContentError> {
    let slug = raw.id.clone();
    decode_post(raw).map_err(|source| {
        error!(operation, %slug, error = %source, "Post saved but response not decodable");
        ContentError::UnreadablePost { slug, source }
    })
}

fn log_failure(operation: &'static str, err: &BackendError) {
    error!(operation, kind = %err.kind(), error = %err, "Content operation failed");
}

#[cfg(test)]
mod tests;
