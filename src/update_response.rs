use crate::domain::SketchHash;
use crate::extensions::path_ext::FileName;
use crate::update_decision::UpdateDecision;
use axum::http::header::HeaderName;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::fs;
use tracing::error;

/// Response header carrying the MD5 of the delivered firmware, which the device compares
/// against the bytes it flashed.
pub const UPDATE_SKETCH_MD5: HeaderName = HeaderName::from_static("x-md5");

/// Maps a decision to its response. A flat table: 404 when the device has no firmware at
/// all, 304 when no download should happen, 200 with the image bytes otherwise.
pub async fn response_for(decision: UpdateDecision) -> Response {
    match decision {
        UpdateDecision::NoFirmware => StatusCode::NOT_FOUND.into_response(),
        UpdateDecision::UpToDate | UpdateDecision::IdenticalContent => StatusCode::NOT_MODIFIED.into_response(),
        UpdateDecision::Update { firmware, sketch_hash } => match fs::read(&firmware.path).await {
            Ok(bytes) => firmware_response(firmware.path.string_file_name(), bytes, &sketch_hash),
            Err(err) => {
                error!("❌ Unable to read '{}': {}", firmware.path.display(), err);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
    }
}

fn firmware_response(file_name: &str, bytes: Vec<u8>, sketch_hash: &SketchHash) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
            (UPDATE_SKETCH_MD5, sketch_hash.to_string()),
        ],
        bytes,
    )
        .into_response()
}
