//! Workbook upload endpoint

use std::io;
use std::path::{Path, PathBuf};

use actix_multipart::Multipart;
use actix_web::{HttpResponse, post, web};
use futures::TryStreamExt;
use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::api::error::ApiError;
use crate::model::EntryPartition;
use crate::service::ImportService;

/// Where uploads are stored while a request is processed
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub upload_dir: PathBuf,
}

/// Per-request scratch folder, removed with everything in it when dropped
pub struct ScratchDir {
    dir: Option<TempDir>,
}

impl ScratchDir {
    pub fn create(parent: &Path) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("runbook-upload-")
            .tempdir_in(parent)?;

        Ok(Self { dir: Some(dir) })
    }

    pub fn path(&self) -> &Path {
        self.dir.as_ref().map(TempDir::path).unwrap_or(Path::new(""))
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };

        let path = dir.path().to_path_buf();
        tracing::info!(path = %path.display(), "Cleaning up uploaded files");

        match dir.close() {
            Ok(()) => tracing::info!(path = %path.display(), "File cleanup successful"),
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Failed to clean up uploaded files")
            }
        }
    }
}

/// Import runbooks from uploaded Excel workbooks
///
/// Every row of every sheet ends up in exactly one of `validEntries` or
/// `invalidEntries`. Uploaded files are deleted once the request finishes.
#[utoipa::path(
    post,
    path = "/api/v1/upload",
    request_body(
        content = String,
        content_type = "multipart/form-data",
        description = "One or more .xlsx workbooks"
    ),
    responses(
        (status = 200, description = "Workbooks processed", body = EntryPartition),
        (status = 400, description = "No files were uploaded", body = crate::api::error::ErrorResponse),
        (status = 502, description = "Class conversion service unavailable", body = crate::api::error::ErrorResponse),
        (status = 500, description = "Internal server error", body = crate::api::error::ErrorResponse)
    ),
    tag = "import"
)]
#[post("/api/v1/upload")]
pub async fn upload(
    service: web::Data<ImportService>,
    settings: web::Data<UploadSettings>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    tracing::info!("Received upload request");

    let scratch = ScratchDir::create(&settings.upload_dir)?;

    let paths = save_files(scratch.path(), payload).await?;
    if paths.is_empty() {
        return Err(ApiError::NoFiles);
    }

    let result = service.import(paths).await?;

    tracing::info!(
        valid = result.valid_entries.len(),
        invalid = result.invalid_entries.len(),
        "Upload processed"
    );

    Ok(HttpResponse::Ok().json(result))
}

/// Stream every file part into its own folder under `dir`
///
/// Parts may share a filename, so each one is stored as `dir/<index>/<name>`
/// and every submitted workbook is parsed.
async fn save_files(dir: &Path, mut payload: Multipart) -> Result<Vec<PathBuf>, ApiError> {
    let mut paths: Vec<PathBuf> = Vec::new();

    while let Some(mut field) = payload.try_next().await? {
        let Some(filename) = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .and_then(sanitize_filename)
        else {
            continue;
        };

        let part_dir = dir.join(paths.len().to_string());
        tokio::fs::create_dir(&part_dir).await?;

        let path = part_dir.join(&filename);
        let mut file = File::create(&path).await?;
        let mut size = 0;
        while let Some(chunk) = field.try_next().await? {
            size += chunk.len();
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        tracing::info!(file = %filename, bytes = size, "File uploaded");
        paths.push(path);
    }

    Ok(paths)
}

/// Last path component of a client-supplied filename
fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next()?.trim();

    match base {
        "" | "." | ".." => None,
        _ => Some(base.to_string()),
    }
}

/// Configure upload routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(upload);
}
