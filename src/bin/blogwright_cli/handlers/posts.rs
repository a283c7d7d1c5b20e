#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use blogwright::domain::posts::{NewPost, PostUpdate};
use blogwright::domain::query::Query;
use blogwright::domain::slug::{derive_slug, validate_document_id};
use blogwright_api_types::PostStatus;

use crate::args::{PostStatusArg, PostsCmd};
use crate::client::{CliError, Ctx};
use crate::handlers::files::read_upload;
use crate::io::read_text;
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: PostsCmd) -> Result<(), CliError> {
    match cmd {
        PostsCmd::List { status, all } => list(ctx, status, all).await,
        PostsCmd::Get { slug } => get(ctx, &slug).await,
        PostsCmd::Create {
            title,
            slug,
            content,
            content_file,
            featured_image,
            image,
            status,
        } => {
            let input = PostCreateInput {
                title,
                slug,
                content,
                content_file,
                featured_image,
                image,
                status,
            };
            create(ctx, input).await
        }
        PostsCmd::Update {
            slug,
            title,
            content,
            content_file,
            featured_image,
            status,
        } => {
            let update = PostUpdate {
                title,
                content: read_text("content", content, content_file)?,
                featured_image,
                status: status.into(),
            };
            update_post(ctx, &slug, &update).await
        }
        PostsCmd::Delete { slug } => delete(ctx, slug).await,
    }
}

struct PostCreateInput {
    title: String,
    slug: Option<String>,
    content: Option<String>,
    content_file: Option<PathBuf>,
    featured_image: Option<String>,
    image: Option<PathBuf>,
    status: PostStatusArg,
}

/// Queries for `posts list`: `None` keeps the service default (active only).
fn list_queries(status: Option<PostStatusArg>, all: bool) -> Option<Vec<Query>> {
    if all {
        return Some(Vec::new());
    }
    status.map(|status| vec![Query::status_is(&PostStatus::from(status))])
}

async fn list(ctx: &Ctx, status: Option<PostStatusArg>, all: bool) -> Result<(), CliError> {
    ctx.sign_in().await?;
    let posts = ctx.content.list_posts(list_queries(status, all)).await?;
    print_json(&posts)
}

async fn get(ctx: &Ctx, slug: &str) -> Result<(), CliError> {
    ctx.sign_in().await?;
    let post = ctx.content.get_post(slug).await?;
    print_json(&post)
}

async fn create(ctx: &Ctx, input: PostCreateInput) -> Result<(), CliError> {
    let slug = match input.slug {
        Some(slug) => {
            validate_document_id(&slug)?;
            slug
        }
        None => derive_slug(&input.title)?,
    };
    let content = read_text("content", input.content, input.content_file)?;
    let upload = match input.image.as_deref() {
        Some(path) => Some(read_upload(path).await?),
        None => None,
    };

    let session = ctx.sign_in().await?;
    let featured_image = match upload {
        Some(upload) => Some(ctx.content.upload_file(upload, &session.user_id).await?.id),
        None => input.featured_image,
    };

    let post = NewPost {
        title: input.title,
        slug,
        content,
        featured_image,
        status: input.status.into(),
        user_id: session.user_id,
    };
    let created = ctx.content.create_post(&post).await?;
    print_json(&created)
}

async fn update_post(ctx: &Ctx, slug: &str, update: &PostUpdate) -> Result<(), CliError> {
    ctx.sign_in().await?;
    let post = ctx.content.update_post(slug, update).await?;
    print_json(&post)
}

async fn delete(ctx: &Ctx, slug: String) -> Result<(), CliError> {
    ctx.sign_in().await?;
    if !ctx.content.delete_post(&slug).await {
        return Err(CliError::NotDeleted {
            what: "post",
            id: slug,
        });
    }
    print_json(&serde_json::json!({ "slug": slug, "deleted": true }))
}
