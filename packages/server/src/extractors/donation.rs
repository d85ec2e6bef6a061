use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use chrono::Utc;
use common::storage::{BoxReader, object_name};
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::donation::DonationPayload;
use crate::error::AppError;
use crate::extractors::json::AppJson;
use crate::state::AppState;
use crate::utils::filename::validate_flat_filename;

/// Object name prefix for donation photos.
const PHOTO_PREFIX: &str = "donations";
const PHOTO_FIELD: &str = "photos";

/// A donation body accepted as either JSON or `multipart/form-data`.
///
/// Multipart requests carry the text fields plus any number of `photos`
/// files; each file is uploaded to object storage as it is read and its URL
/// appended to `photos` in upload order. Uploads are not rolled back when a
/// later part fails.
pub struct DonationSubmission(pub DonationPayload);

impl FromRequest<AppState> for DonationSubmission {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            read_form(multipart, state).await.map(DonationSubmission)
        } else {
            let AppJson(payload) = AppJson::<DonationPayload>::from_request(req, state).await?;
            Ok(DonationSubmission(payload))
        }
    }
}

#[derive(Default)]
struct FormFields {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    condition: Option<String>,
    status: Option<String>,
}

fn required(value: Option<String>, name: &str) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::Validation(format!("Missing required field '{name}'")))
}

async fn read_form(mut multipart: Multipart, state: &AppState) -> Result<DonationPayload, AppError> {
    let mut fields = FormFields::default();
    let mut photos = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        match name.as_str() {
            PHOTO_FIELD => {
                if let Some(url) = upload_photo(field, state).await? {
                    photos.push(url);
                }
            }
            "title" => fields.title = Some(text(field).await?),
            "description" => fields.description = Some(text(field).await?),
            "category" => fields.category = Some(text(field).await?),
            "condition" => fields.condition = Some(text(field).await?),
            "status" => fields.status = Some(text(field).await?),
            other => debug!(field = other, "ignoring unknown form field"),
        }
    }

    Ok(DonationPayload {
        user_id: None,
        title: required(fields.title, "title")?,
        description: required(fields.description, "description")?,
        category: required(fields.category, "category")?,
        condition: required(fields.condition, "condition")?,
        status: fields.status.unwrap_or_default(),
        photos,
    })
}

async fn text(field: Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(e.body_text()))
}

/// Upload one `photos` part and return its public URL.
///
/// Parts without a filename are form values, not files, and are skipped.
#[instrument(skip_all, fields(filename = field.file_name()))]
async fn upload_photo(field: Field<'_>, state: &AppState) -> Result<Option<String>, AppError> {
    let Some(raw_name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_owned) else {
        debug!("skipping photos part without a filename");
        return Ok(None);
    };
    let uploader = state
        .uploader
        .as_ref()
        .ok_or(AppError::StorageUnavailable)?;

    let filename = validate_flat_filename(&raw_name)?;
    let content_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_owned();
    let object = object_name(PHOTO_PREFIX, filename, Utc::now());

    let temp_path = std::env::temp_dir().join(format!("donation-upload-{}", Uuid::new_v4()));
    let result = async {
        let reader = spool_to_disk(field, &temp_path, state.config.storage.max_file_size).await?;
        let url = uploader.upload(&object, &content_type, reader).await?;
        debug!(object = %object, "photo uploaded");
        Ok::<_, AppError>(url)
    }
    .await;

    // Best effort.
    let _ = tokio::fs::remove_file(&temp_path).await;

    result.map(Some)
}

/// Copy the part into a temp file, enforcing `max_size`, and reopen it for reading.
async fn spool_to_disk(
    mut field: Field<'_>,
    path: &std::path::Path,
    max_size: u64,
) -> Result<BoxReader, AppError> {
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

    let mut total: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        total += chunk.len() as u64;
        if total > max_size {
            return Err(AppError::Validation(format!(
                "Photo exceeds maximum size of {max_size} bytes"
            )));
        }
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
    }

    file.flush()
        .await
        .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
    drop(file);

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
    Ok(Box::new(file))
}
