//! Handlers for the `/files` resource (blob storage).
//!
//! Stored files back everything binary in the program: profile
//! pictures, curriculum illustrations, card and fiche PDFs, returning
//! uploads. Uploading under an existing name replaces the content and
//! keeps the id.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use buildup_core::CoreError;
use buildup_db::models::stored_file::StoredFileInfo;
use buildup_db::repositories::FileRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::pdf::document_response;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Content type recorded for uploads when the client sends none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// POST /api/v1/files
///
/// Store a file as multipart form data: a `file` part and an optional
/// `name` text field (the part's filename otherwise). Admin only.
pub async fn upload_file(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<StoredFileInfo>)> {
    let mut name: Option<String> = None;
    let mut file: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "name" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                name = Some(text);
            }
            "file" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or(FALLBACK_CONTENT_TYPE)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, data.to_vec()));
            }
            _ => {} // ignore unknown fields
        }
    }

    let Some((file_name, content_type, data)) = file else {
        return Err(AppError::BadRequest("Missing file part".to_string()));
    };
    let stored_name = name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(file_name);
    if stored_name.trim().is_empty() {
        return Err(AppError::BadRequest("Your file needs a name".to_string()));
    }

    let info = FileRepo::upsert(&state.pool, &stored_name, &content_type, &data).await?;
    Ok((StatusCode::CREATED, Json(info)))
}

/// GET /api/v1/files/{id}
///
/// The file's bytes with its stored content type.
pub async fn get_file(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let file = FileRepo::find_by_id(&state.pool, &id)
        .await?
        .ok_or_else(|| CoreError::not_found("file", id.as_str()))?;
    Ok(document_response(&file.content_type, file.data))
}

/// GET /api/v1/files/by_name/{name}
///
/// Same as [`get_file`], addressed by stored name.
pub async fn get_file_by_name(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(name): Path<String>,
) -> AppResult<Response> {
    let file = FileRepo::find_by_name(&state.pool, &name)
        .await?
        .ok_or_else(|| CoreError::not_found("file", name.as_str()))?;
    Ok(document_response(&file.content_type, file.data))
}
