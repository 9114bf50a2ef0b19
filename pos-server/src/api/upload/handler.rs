//! Upload Handler
//!
//! Forwards one multipart file to the media host and returns its
//! hosted URL. Menu photos go to the menu folder, everything else to
//! the generic uploads folder.

use axum::{Json, extract::Multipart, extract::State};
use serde::Serialize;

use crate::core::ServerState;
use crate::media::folders;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

/// Multipart fields: `file` (required), `folder` ("menu" | "uploads", default "uploads")
pub async fn upload(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    let mut folder = folders::UPLOADS;
    let mut file: Option<(Vec<u8>, String, String)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "folder" => {
                folder = match field.text().await?.as_str() {
                    "menu" => folders::MENU,
                    "uploads" => folders::UPLOADS,
                    other => {
                        return Err(AppError::validation(format!("Unknown folder '{}'", other)));
                    }
                };
            }
            "file" => {
                let filename = field.file_name().unwrap_or("file").to_string();
                let content_type = field
                    .content_type()
                    .map(|ct| ct.to_string())
                    .unwrap_or_else(|| {
                        mime_guess::from_path(&filename)
                            .first_or_octet_stream()
                            .to_string()
                    });
                let data = field.bytes().await?.to_vec();
                file = Some((data, filename, content_type));
            }
            _ => {}
        }
    }

    let (data, filename, content_type) =
        file.ok_or_else(|| AppError::validation("Missing file field"))?;
    let size = data.len();

    let uploaded = state
        .media
        .upload(data, &filename, &content_type, folder)
        .await?;

    Ok(Json(UploadResponse {
        url: uploaded.secure_url,
        filename,
        size,
    }))
}
