use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine};
use serde_json::Value;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};

use crate::error::AnalysisError;
use crate::models::{AnalysisResult, AnalysisType, AnalyzeRequest};
use crate::presentation;
use crate::services::FoodAnalyzer;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

pub struct AppState {
    pub quick: Arc<dyn FoodAnalyzer>,
    pub detailed: Arc<dyn FoodAnalyzer>,
    pub llava: Arc<dyn FoodAnalyzer>,
}

impl AppState {
    pub fn analyzer(&self, kind: AnalysisType) -> &dyn FoodAnalyzer {
        match kind {
            AnalysisType::Quick => self.quick.as_ref(),
            AnalysisType::Detailed => self.detailed.as_ref(),
            AnalysisType::Llava => self.llava.as_ref(),
        }
    }
}

pub fn create_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_check))
        .route("/api/food-analysis/:mode", post(analyze_handler))
        .route("/scan", post(scan_form_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Validate the image and run one analyzer over it.
pub async fn analyze_image(
    analyzer: &dyn FoodAnalyzer,
    image: Option<&str>,
) -> Result<AnalysisResult, AnalysisError> {
    let kind = analyzer.analysis_type();
    let image = image.ok_or(AnalysisError::MissingInput)?;

    let prefix: String = image.chars().take(30).collect();
    log::info!("📸 {} request, image {} bytes ({}...)", kind, image.len(), prefix);

    analyzer.analyze(image).await.map_err(|e| {
        log::error!("❌ Error in {} food analysis: {:#}", kind, e);
        AnalysisError::UpstreamFailure(e)
    })
}

/// Shared path for the JSON endpoints: parse the body, then analyze.
///
/// Bytes that are not JSON fail like any other downstream error (500); a JSON
/// value without a usable `image` is the client's fault (400).
pub async fn run_analysis(analyzer: &dyn FoodAnalyzer, body: &[u8]) -> Result<AnalysisResult, AnalysisError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        log::error!("❌ Unreadable {} request body: {}", analyzer.analysis_type(), e);
        AnalysisError::UpstreamFailure(anyhow::Error::new(e).context("Request body is not JSON"))
    })?;

    let request = match value {
        Value::Object(fields) => AnalyzeRequest::from_fields(&fields),
        other => {
            log::warn!("⚠️ Analysis request body is not a JSON object: {}", json_kind(&other));
            return Err(AnalysisError::MissingInput);
        }
    };

    analyze_image(analyzer, request.image()).await
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

async fn analyze_handler(Path(mode): Path<String>, State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let Some(kind) = AnalysisType::ALL.into_iter().find(|kind| kind.slug() == mode) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match run_analysis(state.analyzer(kind), &body).await {
        Ok(result) => {
            log::info!("✅ {} analysis complete (confidence {})", kind, result.confidence());
            Json(result).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Browser form: multipart `mode` + `image` file, answered with a rendered page
async fn scan_form_handler(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> (StatusCode, Html<String>) {
    let mut kind = AnalysisType::Quick;
    let mut image: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                log::warn!("⚠️ Malformed upload form: {}", e);
                return error_page(AnalysisError::MissingInput);
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "mode" => {
                if let Ok(value) = field.text().await {
                    kind = AnalysisType::from_string(&value).unwrap_or(AnalysisType::Quick);
                }
            }
            "image" => {
                let mime = field
                    .content_type()
                    .filter(|mime| mime.starts_with("image/"))
                    .unwrap_or(DEFAULT_IMAGE_MIME)
                    .to_string();

                match field.bytes().await {
                    Ok(bytes) if !bytes.is_empty() => {
                        log::debug!("📊 Uploaded image size: {} bytes", bytes.len());
                        image = Some(format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(&bytes)));
                    }
                    Ok(_) => {}
                    Err(e) => {
                        log::warn!("⚠️ Failed to read uploaded image: {}", e);
                        return error_page(AnalysisError::MissingInput);
                    }
                }
            }
            _ => {}
        }
    }

    match analyze_image(state.analyzer(kind), image.as_deref()).await {
        Ok(result) => (StatusCode::OK, Html(presentation::render_result(kind, &result))),
        Err(e) => error_page(e),
    }
}

fn error_page(error: AnalysisError) -> (StatusCode, Html<String>) {
    (error.status(), Html(presentation::render_error(&error.to_string())))
}

async fn index_handler() -> Html<&'static str> {
    Html(presentation::INDEX_HTML)
}

async fn health_check() -> &'static str {
    "OK"
}
