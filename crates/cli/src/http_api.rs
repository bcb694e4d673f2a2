use crate::settings::Settings;
use crate::upload::{read_uploads, Uploads};
use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header::CONTENT_TYPE, Response as HttpResponse, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use oid_engine::{RemapError, RemapJob, RemapOutcome};
use oid_protocol::{serialize_json, ResponseEnvelope, STATUS_INTERNAL_ERROR};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};

pub(crate) const FIXED_ROUTE: &str = "/api/v1/generate-new-oid-barang";
pub(crate) const CATALOG_ROUTE: &str = "/generate-new-oid";
pub(crate) const UPLOAD_ROUTE: &str = "/api/v1/remap";
pub(crate) const HEALTH_ROUTE: &str = "/health";

pub(crate) struct HttpState {
    settings: Settings,
    /// Held for the whole run of a job over the configured fixed paths
    fixed_paths: Mutex<()>,
}

impl HttpState {
    pub(crate) fn new(settings: Settings) -> Self {
        Self {
            settings,
            fixed_paths: Mutex::new(()),
        }
    }
}

pub(crate) fn router(state: Arc<HttpState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    let upload_limit = DefaultBodyLimit::max(state.settings.server.upload_limit_bytes);

    Router::new()
        .route(FIXED_ROUTE, get(generate_new_oid))
        .route(CATALOG_ROUTE, get(serve_catalog))
        .route(UPLOAD_ROUTE, post(upload_remap).layer(upload_limit))
        .route(HEALTH_ROUTE, get(health))
        .layer(cors)
        .with_state(state)
}

async fn generate_new_oid(State(state): State<Arc<HttpState>>) -> Response {
    let _guard = state.fixed_paths.lock().await;
    let job = state.settings.fixed_job();
    let envelope = run_job(job, &state.settings).await;
    build_response(&envelope)
}

async fn serve_catalog(State(state): State<Arc<HttpState>>) -> Response {
    build_response(&catalog_envelope(&state.settings.paths.catalog).await)
}

async fn upload_remap(State(state): State<Arc<HttpState>>, multipart: Multipart) -> Response {
    let envelope = match read_uploads(multipart).await {
        Ok(uploads) => process_upload(&state, uploads).await,
        Err(err) => {
            log::warn!("Rejected upload: {err}");
            ResponseEnvelope::error(err.status_code(), err.to_string())
        }
    };
    build_response(&envelope)
}

async fn health() -> Response {
    build_response(&ResponseEnvelope::success(serde_json::json!({"status": "ok"})))
}

/// The JSON document at `path`, passed through untouched.
pub(crate) async fn catalog_envelope(path: &Path) -> ResponseEnvelope {
    if !tokio::fs::try_exists(path).await.unwrap_or(false) {
        return ResponseEnvelope::not_found(format!("File not found: {}", path.display()));
    }

    let parsed = match tokio::fs::read(path).await {
        Ok(bytes) => {
            serde_json::from_slice::<serde_json::Value>(&bytes).map_err(|e| e.to_string())
        }
        Err(err) => Err(err.to_string()),
    };
    match parsed {
        Ok(data) => ResponseEnvelope::success(data),
        Err(err) => {
            log::error!("Failed to read catalog {}: {err}", path.display());
            ResponseEnvelope::error(STATUS_INTERNAL_ERROR, format!("Failed to read file: {err}"))
        }
    }
}

/// Run an uploaded job in a private temporary directory under the work dir.
/// The directory and every file the job wrote are removed once the envelope
/// is built.
pub(crate) async fn process_upload(state: &HttpState, uploads: Uploads) -> ResponseEnvelope {
    let work_dir = &state.settings.paths.work_dir;
    let staged = async {
        tokio::fs::create_dir_all(work_dir).await?;
        let dir = tempfile::Builder::new()
            .prefix("upload-")
            .tempdir_in(work_dir)?;
        let job = RemapJob {
            mapping_path: dir.path().join("mapping.json"),
            table_path: dir.path().join("table.csv"),
            output_path: dir.path().join("table_fixed.csv"),
            unmapped_path: dir.path().join("unmapped.txt"),
        };
        tokio::fs::write(&job.mapping_path, &uploads.mapping).await?;
        tokio::fs::write(&job.table_path, &uploads.table).await?;
        Ok::<_, std::io::Error>((dir, job))
    };
    let (dir, job) = match staged.await {
        Ok(staged) => staged,
        Err(err) => {
            log::error!("Failed to stage upload in {}: {err}", work_dir.display());
            return ResponseEnvelope::internal(err);
        }
    };
    log::info!("Upload staged in {}", dir.path().display());

    let envelope = run_job(job, &state.settings).await;

    let dir_path = dir.path().to_path_buf();
    if let Err(err) = dir.close() {
        log::warn!("Failed to remove {}: {err}", dir_path.display());
    }
    envelope
}

async fn run_job(job: RemapJob, settings: &Settings) -> ResponseEnvelope {
    let config = settings.remap.clone();
    let result = tokio::task::spawn_blocking(move || job.run(&config)).await;
    match result {
        Ok(result) => envelope_for(result),
        Err(err) => {
            log::error!("Remap task failed: {err}");
            ResponseEnvelope::internal(err)
        }
    }
}

pub(crate) fn envelope_for(result: Result<RemapOutcome, RemapError>) -> ResponseEnvelope {
    match result {
        Ok(outcome) => {
            let rows = outcome
                .rows
                .into_iter()
                .map(serde_json::Value::Object)
                .collect();
            ResponseEnvelope::success(serde_json::Value::Array(rows))
                .with_unmapped(outcome.unmapped)
        }
        Err(err) => {
            log::warn!("Remap failed ({}): {err}", err.status_code());
            match err.status_code() {
                404 => ResponseEnvelope::not_found(err.to_string()),
                400 => ResponseEnvelope::bad_request(err.to_string()),
                _ => ResponseEnvelope::internal(err),
            }
        }
    }
}

pub(crate) fn build_response(envelope: &ResponseEnvelope) -> Response {
    let status = StatusCode::from_u16(envelope.code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let Ok(bytes) = serialize_json(envelope) else {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    };

    HttpResponse::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}
