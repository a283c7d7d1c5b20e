#![deny(clippy::all, clippy::pedantic)]

use std::path::Path;

use blogwright::domain::files::{FileUpload, PreviewOptions};

use crate::args::{FilesCmd, ImageFormatArg};
use crate::client::{CliError, Ctx};
use crate::print::print_json;

pub async fn handle(ctx: &Ctx, cmd: FilesCmd) -> Result<(), CliError> {
    match cmd {
        FilesCmd::Upload { path } => upload(ctx, &path).await,
        FilesCmd::Delete { file_id } => delete(ctx, file_id).await,
        FilesCmd::Preview {
            file_id,
            width,
            height,
            quality,
            output,
        } => preview(ctx, &file_id, width, height, quality, output),
    }
}

pub async fn read_upload(path: &Path) -> Result<FileUpload, CliError> {
    FileUpload::from_path(path)
        .await
        .map_err(|source| CliError::InputFile {
            path: path.display().to_string(),
            source,
        })
}

async fn upload(ctx: &Ctx, path: &Path) -> Result<(), CliError> {
    let upload = read_upload(path).await?;
    let session = ctx.sign_in().await?;
    let file = ctx.content.upload_file(upload, &session.user_id).await?;
    print_json(&file)
}

async fn delete(ctx: &Ctx, file_id: String) -> Result<(), CliError> {
    ctx.sign_in().await?;
    if !ctx.content.delete_file(&file_id).await {
        return Err(CliError::NotDeleted {
            what: "file",
            id: file_id,
        });
    }
    print_json(&serde_json::json!({ "file_id": file_id, "deleted": true }))
}

fn preview(
    ctx: &Ctx,
    file_id: &str,
    width: Option<u32>,
    height: Option<u32>,
    quality: Option<u8>,
    output: Option<ImageFormatArg>,
) -> Result<(), CliError> {
    let options = PreviewOptions {
        width,
        height,
        quality,
        output: output.map(Into::into),
    };
    let url = ctx.content.get_file_preview(file_id, &options)?;
    print_json(&serde_json::json!({ "file_id": file_id, "url": url.as_str() }))
}
