use axum::extract::Multipart;
use axum::{extract::State, routing::post, Json, Router};
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::pipeline::{derive, parse, summarize};
use crate::samples;
use crate::state::{AppState, RideSession};
use crate::types::activity::{FileFormat, RideSummary};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/upload", post(upload))
}

#[derive(Serialize)]
struct UploadResponse {
    session_id: String,
    file_type: FileFormat,
    point_count: usize,
    summary: RideSummary,
}

async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut filename: Option<String> = None;
    let mut session_id: Option<String> = None;
    let mut sample: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(format!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                filename = field.file_name().map(|s| s.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file bytes: {}", e))
                })?;
                // browsers send an empty, unnamed part when no file is picked
                if filename.as_deref().map_or(true, str::is_empty) && bytes.is_empty() {
                    filename = None;
                } else {
                    file_bytes = Some(bytes.to_vec());
                }
            }
            "sample" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read sample: {}", e))
                })?;
                let text = text.trim();
                if !text.is_empty() {
                    sample = Some(text.to_string());
                }
            }
            "session_id" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read session_id: {}", e))
                })?;
                let text = text.trim();
                if !text.is_empty() {
                    session_id = Some(text.to_string());
                }
            }
            _ => {}
        }
    }

    let (bytes, filename) = match (file_bytes, sample) {
        (Some(bytes), _) => {
            let filename = filename
                .ok_or_else(|| AppError::BadRequest("No filename provided".to_string()))?;
            (bytes, filename)
        }
        (None, Some(id)) => {
            let sample = samples::find(&id)
                .ok_or_else(|| AppError::BadRequest(format!("Unknown sample ride: {}", id)))?;
            tracing::debug!("Using bundled sample ride {}", sample.id);
            (sample.content.as_bytes().to_vec(), sample.file_name.to_string())
        }
        (None, None) => {
            return Err(AppError::BadRequest("No file or sample ride provided".to_string()));
        }
    };

    if let Some(id) = session_id.as_deref() {
        if !state.contains(id) {
            return Err(AppError::NotFound(id.to_string()));
        }
    }

    let format = FileFormat::from_filename(&filename)?;

    tracing::info!("Parsing {} file: {}", format.as_str(), filename);

    let track = parse::parse(&bytes, format)?;
    let derived = derive::derive(track);
    let summary = summarize::summarize(&derived, state.config.speed_window)?;

    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let point_count = derived.len();
    let replaced = state.insert(
        session_id.clone(),
        RideSession::new(filename.clone(), format, derived, summary.clone()),
    );

    tracing::info!(
        "{} session {} with {} ({} points, {:.2} km)",
        if replaced { "Replaced" } else { "Created" },
        session_id,
        filename,
        point_count,
        summary.distance_km
    );

    Ok(Json(UploadResponse {
        session_id,
        file_type: format,
        point_count,
        summary,
    }))
}
