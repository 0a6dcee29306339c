use std::convert::Infallible;

use axum::Json;
use axum::body::Body;
use axum::extract::{Extension, Multipart, Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{ContentType, HouseholdId, StatementDocument};
use crate::infrastructure::observability::RequestId;
use crate::presentation::state::AppState;

pub const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

const FILE_FIELD: &str = "file";

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

/// Accepts a statement upload and streams the import as NDJSON chunks.
#[tracing::instrument(skip(state, request_id, multipart))]
pub async fn statement_import_handler(
    State(state): State<AppState>,
    Path(household_id): Path<String>,
    request_id: Option<Extension<RequestId>>,
    mut multipart: Multipart,
) -> Response {
    let request_id = request_id
        .map(|Extension(id)| id)
        .unwrap_or_else(RequestId::generate);

    let household_id = match Uuid::parse_str(&household_id) {
        Ok(uuid) => HouseholdId::from_uuid(uuid),
        Err(_) => {
            tracing::warn!(household_id = %household_id, "Invalid household id");
            return error_response(StatusCode::BAD_REQUEST, "Invalid household id");
        }
    };

    let document = match read_document(&mut multipart, state.import_settings.max_upload_bytes())
        .await
    {
        Ok(document) => document,
        Err(response) => return response,
    };

    tracing::info!(
        household_id = %household_id,
        filename = %document.filename,
        content_type = document.content_type.as_mime(),
        bytes = document.size_bytes(),
        "Statement import started"
    );

    let context = match state.import_service.load_context(household_id).await {
        Ok(context) => context,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load import context");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to load import context: {}", e),
            );
        }
    };

    let run = state.import_service.start(household_id, document, context);

    let body_stream = async_stream::stream! {
        let mut chunks = run.chunks;
        while let Some(chunk) = chunks.recv().await {
            match chunk.to_ndjson_line() {
                Ok(line) => yield Ok::<_, Infallible>(line),
                Err(e) => tracing::error!(error = %e, "Failed to serialize import chunk"),
            }
        }

        match run.handle.await {
            Ok(summary) => tracing::info!(
                request_id = %request_id.as_str(),
                total_transactions = summary.total_transactions,
                created_count = summary.created_count,
                abandoned_pending = summary.abandoned_pending,
                failed = summary.failed,
                "Statement import finished"
            ),
            Err(e) => tracing::error!(
                request_id = %request_id.as_str(),
                error = %e,
                "Statement import task failed"
            ),
        }
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, NDJSON_CONTENT_TYPE)],
        Body::from_stream(body_stream),
    )
        .into_response()
}

async fn read_document(
    multipart: &mut Multipart,
    max_upload_bytes: usize,
) -> Result<StatementDocument, Response> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                tracing::warn!("Import request with no file");
                return Err(error_response(StatusCode::BAD_REQUEST, "No file uploaded"));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read multipart");
                return Err(error_response(
                    e.status(),
                    format!("Failed to read multipart: {}", e.body_text()),
                ));
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or("statement").to_string();
        let content_type_str = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        let Some(content_type) = ContentType::from_mime(&content_type_str) else {
            tracing::warn!(content_type = %content_type_str, "Unsupported content type");
            return Err(error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                format!("Unsupported content type: {}", content_type_str),
            ));
        };

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read file bytes");
                return Err(error_response(
                    e.status(),
                    format!("Failed to read file: {}", e.body_text()),
                ));
            }
        };

        if data.is_empty() {
            return Err(error_response(StatusCode::BAD_REQUEST, "Uploaded file is empty"));
        }

        if data.len() > max_upload_bytes {
            tracing::warn!(bytes = data.len(), max_upload_bytes, "Upload too large");
            return Err(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                format!("File exceeds {} bytes", max_upload_bytes),
            ));
        }

        tracing::debug!(filename = %filename, bytes = data.len(), "File data received");
        return Ok(StatementDocument::new(filename, content_type, data.to_vec()));
    }
}
