use async_trait::async_trait;
use blogwright_api_types::StoredFile;
use reqwest::Url;
use reqwest::multipart::{Form, Part};

use crate::application::backend::{BackendError, StorageApi};
use crate::domain::files::{FileUpload, PreviewOptions};
use crate::domain::permissions::Permission;

use super::AppwriteClient;

#[async_trait]
impl StorageApi for AppwriteClient {
    async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        upload: FileUpload,
        permissions: &[Permission],
    ) -> Result<StoredFile, BackendError> {
        let url = self.url(&["storage", "buckets", bucket_id, "files"])?;
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(BackendError::invalid_request)?;

        let mut form = Form::new()
            .text("fileId", file_id.to_string())
            .part("file", part);
        for permission in permissions {
            form = form.text("permissions[]", permission.to_string());
        }

        self.execute("storage.create_file", self.http.post(url).multipart(form))
            .await
    }

    async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<(), BackendError> {
        let url = self.url(&["storage", "buckets", bucket_id, "files", file_id])?;
        self.execute_unit("storage.delete_file", self.http.delete(url))
            .await
    }

    fn file_preview_url(
        &self,
        bucket_id: &str,
        file_id: &str,
        options: &PreviewOptions,
    ) -> Result<Url, BackendError> {
        let mut url = self.url(&["storage", "buckets", bucket_id, "files", file_id, "preview"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("project", &self.project_id);
            for (key, value) in options.query_pairs() {
                pairs.append_pair(key, &value);
            }
        }
        Ok(url)
    }
}
