//! Request handlers.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use tonecap_core::{GenerateResponse, ToneMode};

use super::AppState;

/// Tone applied when the form omits `tone`.
const DEFAULT_TONE: &str = "casual";

pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Tonecap caption backend running" }))
}

/// Fields read from a `/generate` form.
#[derive(Debug, Default)]
struct Upload {
    file: Option<(String, Vec<u8>)>,
    tone: Option<String>,
}

async fn read_upload(multipart: &mut Multipart) -> Result<Upload, String> {
    let mut upload = Upload::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Invalid form data: {e}"))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| format!("Failed to read upload: {e}"))?;
                upload.file = Some((filename, bytes.to_vec()));
            }
            Some("tone") => {
                let tone = field
                    .text()
                    .await
                    .map_err(|e| format!("Failed to read tone: {e}"))?;
                upload.tone = Some(tone);
            }
            _ => {}
        }
    }
    Ok(upload)
}

/// Caption an uploaded image. Every outcome is a 200 response.
pub async fn generate(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Json<GenerateResponse> {
    let Some(pipeline) = state.pipeline.as_deref() else {
        return Json(GenerateResponse::model_unavailable());
    };

    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(message) => return Json(GenerateResponse::error(message)),
    };
    let Some((filename, bytes)) = upload.file else {
        return Json(GenerateResponse::error("Missing 'file' field"));
    };

    let tone_name = upload.tone.as_deref().unwrap_or(DEFAULT_TONE);
    let tone = tone_name.parse::<ToneMode>().ok();

    match pipeline.caption_bytes(bytes, Path::new(&filename), tone).await {
        Ok(captions) => Json(GenerateResponse::success(captions)),
        Err(e) => {
            tracing::warn!("Caption request for {filename} ({tone_name}) failed: {e}");
            Json(GenerateResponse::error(e.to_string()))
        }
    }
}
