use std::sync::Arc;

use blogwright_api_types::PostStatus;

use super::*;
use crate::application::testing::InMemoryBackend;
use crate::domain::permissions::{PermissionKind, Role};

fn service() -> (Arc<InMemoryBackend>, ContentService) {
    let backend = Arc::new(InMemoryBackend::default());
    backend.sign_in_as("u1");
    let targets = ContentTargets {
        posts: CollectionPath::new("blog", "posts"),
        bucket_id: "images".to_string(),
    };
    let service = ContentService::new(backend.clone(), backend.clone(), targets);
    (backend, service)
}

fn sample_post(slug: &str) -> NewPost {
    NewPost {
        title: "T".into(),
        slug: slug.into(),
        content: "C".into(),
        featured_image: Some("f1".into()),
        status: PostStatus::Active,
        user_id: "u1".into(),
    }
}

#[tokio::test]
async fn create_post_stores_fields_under_slug() {
    let (_, content) = service();
    let post = content
        .create_post(&sample_post("t-1"))
        .await
        .expect("create");

    assert_eq!(post.id, "t-1");
    assert_eq!(post.data.title, "T");
    assert_eq!(post.data.content, "C");
    assert_eq!(post.data.featured_image.as_deref(), Some("f1"));
    assert_eq!(post.data.status, PostStatus::Active);
    assert_eq!(post.data.user_id, "u1");
}

#[tokio::test]
async fn create_post_attaches_exactly_three_owner_entries() {
    let (backend, content) = service();
    for (slug, status, image) in [
        ("a", PostStatus::Active, Some("f1")),
        ("b", PostStatus::Inactive, None),
    ] {
        let mut post = sample_post(slug);
        post.status = status;
        post.featured_image = image.map(str::to_string);
        content.create_post(&post).await.expect("create");

        let acl = backend.last_permissions();
        assert_eq!(acl.len(), 3);
        assert!(acl.iter().all(|p| p.role == Role::user("u1")));
        let kinds: Vec<_> = acl.iter().map(|p| p.kind).collect();
        assert!(kinds.contains(&PermissionKind::Read));
        assert!(kinds.contains(&PermissionKind::Update));
        assert!(kinds.contains(&PermissionKind::Delete));
    }
}

#[tokio::test]
async fn other_users_cannot_read_a_post() {
    let (backend, content) = service();
    content
        .create_post(&sample_post("t-1"))
        .await
        .expect("create");

    backend.sign_in_as("u2");
    let err = content.get_post("t-1").await.expect_err("not readable");
    assert!(matches!(err, ContentError::GetPost(_)));
    assert_eq!(
        err.to_string(),
        "Failed to fetch post. Ensure the user has appropriate permissions."
    );

    backend.sign_in_as("u1");
    assert_eq!(content.get_post("t-1").await.expect("owner reads").id, "t-1");
}

#[tokio::test]
async fn duplicate_slug_fails_with_translated_error() {
    let (_, content) = service();
    content
        .create_post(&sample_post("t-1"))
        .await
        .expect("create");

    let err = content
        .create_post(&sample_post("t-1"))
        .await
        .expect_err("duplicate slug");
    assert!(matches!(err, ContentError::CreatePost(_)));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.to_string().starts_with("Failed to create post."));
}

#[tokio::test]
async fn update_post_is_idempotent_and_keeps_permissions() {
    let (backend, content) = service();
    content
        .create_post(&sample_post("t-1"))
        .await
        .expect("create");
    let before = backend.document("t-1").expect("stored").permissions;

    let update = PostUpdate {
        title: "T2".into(),
        content: "C2".into(),
        featured_image: None,
        status: PostStatus::Inactive,
    };
    let first = content.update_post("t-1", &update).await.expect("first");
    let stored_after_first = backend.document("t-1").expect("stored").data;
    let second = content.update_post("t-1", &update).await.expect("second");
    let stored_after_second = backend.document("t-1").expect("stored");

    assert_eq!(first.data, second.data);
    assert_eq!(stored_after_first, stored_after_second.data);
    assert_eq!(stored_after_second.permissions, before);
    assert_eq!(second.data.user_id, "u1");
    assert_eq!(second.data.featured_image, None);
}

#[tokio::test]
async fn update_missing_post_translates_not_found() {
    let (_, content) = service();
    let update = PostUpdate {
        title: "T".into(),
        content: "C".into(),
        featured_image: None,
        status: PostStatus::Active,
    };
    let err = content
        .update_post("missing", &update)
        .await
        .expect_err("missing");
    assert!(matches!(err, ContentError::UpdatePost(_)));
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn delete_post_reports_every_outcome_as_bool() {
    let (backend, content) = service();
    content
        .create_post(&sample_post("t-1"))
        .await
        .expect("create");

    backend.sign_in_as("u2");
    assert!(!content.delete_post("t-1").await, "forbidden");

    backend.sign_in_as("u1");
    assert!(content.delete_post("t-1").await, "owner deletes");
    assert!(!content.delete_post("t-1").await, "already gone");

    backend.fail_with(503, "general_server_error");
    assert!(!content.delete_post("t-2").await, "backend down");
    assert!(!content.delete_post("").await, "blank slug");
}

#[tokio::test]
async fn try_delete_post_exposes_cause() {
    let (_, content) = service();
    let err = content
        .try_delete_post("missing")
        .await
        .expect_err("missing");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn list_posts_defaults_to_active_filter() {
    let (backend, content) = service();
    content
        .create_post(&sample_post("a"))
        .await
        .expect("active");
    let mut hidden = sample_post("b");
    hidden.status = PostStatus::Inactive;
    content.create_post(&hidden).await.expect("inactive");

    let list = content.list_posts(None).await.expect("list");
    assert_eq!(
        backend.last_queries(),
        vec![r#"equal("status", ["active"])"#.to_string()]
    );
    assert_eq!(list.total, 1);
    assert_eq!(list.documents[0].id, "a");

    let all = content.list_posts(Some(Vec::new())).await.expect("all");
    assert_eq!(all.total, 2);
    assert!(backend.last_queries().is_empty());
}

#[tokio::test]
async fn list_posts_keeps_posts_with_unknown_status() {
    let (backend, content) = service();
    content
        .create_post(&sample_post("a"))
        .await
        .expect("active");
    let mut draft = backend.document("a").expect("stored");
    draft.id = "b".into();
    draft.data.insert("status".into(), serde_json::json!("draft"));
    draft.data.insert("content".into(), serde_json::Value::Null);
    backend.insert_document(draft);

    let all = content.list_posts(Some(Vec::new())).await.expect("all");
    assert_eq!(all.total, 2);
    let draft = &all.documents[1];
    assert_eq!(draft.id, "b");
    assert_eq!(draft.data.status, PostStatus::Other("draft".into()));
    assert_eq!(draft.data.content, "");

    let drafts = content
        .list_posts(Some(vec![Query::not_equal("status", ["active"])]))
        .await
        .expect("drafts");
    assert_eq!(drafts.total, 1);
    assert_eq!(content.get_post("b").await.expect("get").data.title, "T");
}

#[tokio::test]
async fn list_posts_failure_keeps_backend_error() {
    let (backend, content) = service();
    backend.fail_with(503, "general_server_error");

    let list_err = content.list_posts(None).await.expect_err("list fails");
    assert_eq!(list_err.to_string(), "injected failure");
    assert!(matches!(
        list_err,
        ContentError::ListPosts(BackendError::Api { status: 503, .. })
    ));

    let get_err = content.get_post("a").await.expect_err("get fails");
    assert_ne!(get_err.to_string(), list_err.to_string());
    assert_eq!(get_err.kind(), list_err.kind());
}

#[tokio::test]
async fn upload_file_is_owner_only() {
    let (backend, content) = service();
    let file = content
        .upload_file(FileUpload::new("cover.png", vec![0u8; 16]), "u1")
        .await
        .expect("upload");

    assert_eq!(file.mime_type, "image/png");
    assert_eq!(file.size_original, 16);
    assert_eq!(file.permissions.len(), 3);
    assert!(file.permissions.iter().all(|p| p.contains("user:u1")));
    assert_eq!(backend.last_permissions().len(), 3);
}

#[tokio::test]
async fn upload_failure_is_translated() {
    let (backend, content) = service();
    backend.fail_with(401, "user_unauthorized");
    let err = content
        .upload_file(FileUpload::new("cover.png", vec![1]), "u1")
        .await
        .expect_err("upload fails");
    assert!(matches!(err, ContentError::UploadFile(_)));
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(backend.file_count(), 0);
}

#[tokio::test]
async fn delete_file_reports_every_outcome_as_bool() {
    let (backend, content) = service();
    let file = content
        .upload_file(FileUpload::new("cover.png", vec![1]), "u1")
        .await
        .expect("upload");

    backend.sign_in_as("u2");
    assert!(!content.delete_file(&file.id).await, "forbidden");
    assert_eq!(backend.file_count(), 1);

    backend.sign_in_as("u1");
    assert!(content.delete_file(&file.id).await, "owner deletes");
    assert!(!content.delete_file(&file.id).await, "already gone");
    assert_eq!(backend.file_count(), 0);

    backend.fail_with(503, "general_server_error");
    assert!(!content.delete_file("f2").await, "backend down");

    backend.recover();
    let calls = backend.calls();
    assert!(!content.delete_file("").await, "blank id");
    assert!(!content.delete_file("   ").await, "whitespace id");
    assert_eq!(backend.calls(), calls);
}

#[tokio::test]
async fn undecodable_update_response_is_reported_as_unreadable() {
    let (backend, content) = service();
    content
        .create_post(&sample_post("t-1"))
        .await
        .expect("create");
    let mut broken = backend.document("t-1").expect("stored");
    broken.data.remove("userId");
    backend.insert_document(broken);

    let update = PostUpdate {
        title: "T2".into(),
        content: "C2".into(),
        featured_image: None,
        status: PostStatus::Active,
    };
    let err = content
        .update_post("t-1", &update)
        .await
        .expect_err("response lacks userId");
    assert!(matches!(
        err,
        ContentError::UnreadablePost { ref slug, source: BackendError::Decode(_) } if slug == "t-1"
    ));
    assert_eq!(err.kind(), ErrorKind::Unexpected);
    assert_eq!(backend.document("t-1").expect("stored").data["title"], "T2");
}

#[tokio::test]
async fn blank_parameters_never_reach_backend() {
    let (backend, content) = service();
    let calls = backend.calls();

    let mut post = sample_post("");
    assert!(matches!(
        content.create_post(&post).await,
        Err(ContentError::Domain(_))
    ));
    post.slug = "ok".into();
    post.user_id = " ".into();
    assert!(matches!(
        content.create_post(&post).await,
        Err(ContentError::Domain(_))
    ));
    assert!(matches!(
        content.get_file_preview("", &PreviewOptions::default()),
        Err(ContentError::Domain(_))
    ));
    assert_eq!(backend.calls(), calls);
}

#[test]
fn preview_url_points_at_bucket_file() {
    let (_, content) = service();
    let options = PreviewOptions {
        width: Some(320),
        ..Default::default()
    };
    let url = content.get_file_preview("file-1", &options).expect("url");
    assert_eq!(
        url.as_str(),
        "http://backend.test/v1/storage/buckets/images/files/file-1/preview?project=test&width=320"
    );
}

#[test]
fn preview_failure_is_translated() {
    let (backend, content) = service();
    backend.fail_with(500, "general_unknown");
    let err = content
        .get_file_preview("file-1", &PreviewOptions::default())
        .expect_err("preview fails");
    assert_eq!(err.to_string(), "Failed to get file preview.");
    backend.recover();
    assert!(
        content
            .get_file_preview("file-1", &PreviewOptions::default())
            .is_ok()
    );
}
