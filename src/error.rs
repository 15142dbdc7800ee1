use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::ErrorBody;

/// Everything an analysis request can fail with, as seen by the client
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Image is required")]
    MissingInput,
    /// The model call failed, or the request body could not be read at all
    #[error("Failed to analyze food")]
    UpstreamFailure(#[source] anyhow::Error),
}

impl AnalysisError {
    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::MissingInput => StatusCode::BAD_REQUEST,
            AnalysisError::UpstreamFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
