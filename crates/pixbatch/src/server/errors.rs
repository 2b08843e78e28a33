use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use pixbatch_core::{PipelineError, ResizeError};
use serde_json::json;

/// API error response
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_gateway(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_GATEWAY, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.message,
        }));

        (self.status, body).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::NotImage { .. } => ApiError::bad_request("Invalid image"),
            PipelineError::InvalidInput(msg) => ApiError::bad_request(msg),
            PipelineError::Archive(msg) => ApiError::bad_request(format!("Unable to unzip: {msg}")),
            PipelineError::NotFound(_) => ApiError::not_found("File not found"),
            PipelineError::Resize {
                source: ResizeError::InvalidWidth(w),
                ..
            } => ApiError::bad_request(format!("Invalid width: {w}")),
            PipelineError::Resize {
                source: ResizeError::SourceTooLarge { width, height, max },
                ..
            } => ApiError::bad_request(format!(
                "Image too large: {width}x{height} exceeds {max}"
            )),
            e @ (PipelineError::Resize { .. }
            | PipelineError::Decode { .. }
            | PipelineError::Timeout { .. }
            | PipelineError::Task(_)) => {
                tracing::error!("Processing failed: {}", e);
                ApiError::internal_error("Error resizing image")
            }
            e @ PipelineError::Persistence { .. } => {
                tracing::error!("{}", e);
                ApiError::bad_gateway("Unable to save image")
            }
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        ApiError::new(err.status(), format!("File error: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixbatch_core::{DecodeError, StorageError};

    #[test]
    fn test_pipeline_error_status_mapping() {
        let cases = [
            (
                PipelineError::NotImage { name: "a".into() },
                StatusCode::BAD_REQUEST,
            ),
            (
                PipelineError::InvalidInput("width".into()),
                StatusCode::BAD_REQUEST,
            ),
            (PipelineError::Archive("eocd".into()), StatusCode::BAD_REQUEST),
            (PipelineError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                PipelineError::Resize {
                    name: "x".into(),
                    source: ResizeError::InvalidWidth(0),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                PipelineError::Resize {
                    name: "x".into(),
                    source: ResizeError::SourceTooLarge {
                        width: 20_000,
                        height: 10,
                        max: 10_000,
                    },
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                PipelineError::Resize {
                    name: "x".into(),
                    source: ResizeError::Decode(DecodeError::UnrecognizedFormat),
                },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PipelineError::Persistence {
                    location: "images/x".into(),
                    source: StorageError::InvalidLocation("x".into()),
                },
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status(), expected);
        }
    }
}
