use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
};
use pixbatch_core::pipeline::validate_width;
use pixbatch_core::Blob;
use serde::Deserialize;
use serde_json::{json, Value};

use super::errors::ApiError;
use super::AppState;

/// Body of POST /generate-thumbnails
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateThumbnailsPayload {
    pub image_path: String,
    pub width_size: i64,
}

/// Fields of a multipart upload the endpoints care about.
struct UploadForm {
    file: Option<Blob>,
    width_size: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, ApiError> {
    let mut form = UploadForm {
        file: None,
        width_size: None,
    };
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                form.file = Some(Blob::new(name, bytes));
            }
            Some("widthSize") => {
                form.width_size = Some(field.text().await?);
            }
            _ => {}
        }
    }
    Ok(form)
}

/// GET /health
/// Also reports the widths clients should offer
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "presetWidths": state.service.preset_widths(),
            "defaultWidth": state.service.default_width(),
        })),
    )
}

/// POST /upload-image
/// Store one image unchanged and return its location
pub async fn upload_image_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<String, ApiError> {
    let form = read_upload_form(multipart).await?;
    let blob = form
        .file
        .ok_or_else(|| ApiError::bad_request("File error: missing `file` field"))?;

    let location = state.service.upload_image(blob).await?;
    Ok(format!("{location}\n"))
}

/// POST /upload-zip
/// Resize every image in the archive; one string per entry, completion order
pub async fn upload_zip_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Vec<String>>, ApiError> {
    let form = read_upload_form(multipart).await?;
    let archive = form
        .file
        .ok_or_else(|| ApiError::bad_request("File error: missing `file` field"))?;

    let width = match form.width_size.as_deref().map(str::trim) {
        None | Some("") => state.service.default_width(),
        Some(raw) => {
            let parsed: i64 = raw
                .parse()
                .map_err(|_| ApiError::bad_request(format!("Invalid widthSize: {raw}")))?;
            validate_width(parsed)?
        }
    };

    let outcome = state.service.process_archive(archive.bytes, width).await?;
    Ok(Json(outcome.locations()))
}

/// POST /generate-thumbnails
/// Write a `<width>x` sibling of an already stored image
pub async fn generate_thumbnails_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<String, ApiError> {
    let payload: GenerateThumbnailsPayload = serde_json::from_slice(&body)
        .map_err(|e| ApiError::bad_request(format!("Invalid body: {e}")))?;
    let width = validate_width(payload.width_size)?;

    let location = state
        .service
        .generate_thumbnail(&payload.image_path, width)
        .await?;
    Ok(format!("{location}\n"))
}
