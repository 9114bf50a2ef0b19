//! Check-in API Handlers

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde::Serialize;

use crate::auth::CurrentUser;
use crate::checkin::{CheckInInput, CheckInPhoto};
use crate::core::ServerState;
use crate::db::models::{CheckDirection, CheckInRecord};
use crate::db::repository::CheckInRepository;
use crate::utils::{AppError, AppResult};

/// Record one check-in / check-out
///
/// Multipart fields:
///
/// | Field | Required | Meaning |
/// |-------|----------|---------|
/// | `latitude` | yes | GPS latitude |
/// | `longitude` | yes | GPS longitude |
/// | `direction` | yes | "in" or "out" |
/// | `address` | no | reverse-geocoded address from the terminal |
/// | `photo` | no | selfie, uploaded to the media host first |
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<CheckInRecord>> {
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut direction: Option<CheckDirection> = None;
    let mut address: Option<String> = None;
    let mut photo: Option<CheckInPhoto> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name().unwrap_or_default() {
            "latitude" => {
                latitude = Some(parse_field(field.text().await?, "latitude")?);
            }
            "longitude" => {
                longitude = Some(parse_field(field.text().await?, "longitude")?);
            }
            "direction" => {
                direction = Some(match field.text().await?.as_str() {
                    "in" => CheckDirection::In,
                    "out" => CheckDirection::Out,
                    other => {
                        return Err(AppError::validation(format!(
                            "Unknown direction '{}'",
                            other
                        )));
                    }
                });
            }
            "address" => {
                let text = field.text().await?;
                if !text.is_empty() {
                    address = Some(text);
                }
            }
            "photo" => {
                let filename = field
                    .file_name()
                    .unwrap_or("selfie.jpg")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await?.to_vec();
                photo = Some(CheckInPhoto {
                    data,
                    filename,
                    content_type,
                });
            }
            _ => {}
        }
    }

    let input = CheckInInput {
        latitude: latitude.ok_or_else(|| AppError::validation("Missing latitude"))?,
        longitude: longitude.ok_or_else(|| AppError::validation("Missing longitude"))?,
        direction: direction.ok_or_else(|| AppError::validation("Missing direction"))?,
        address,
    };

    let record = state
        .check_in
        .record(&user.id, &user.name, input, photo)
        .await?;
    Ok(Json(record))
}

fn parse_field(text: String, name: &str) -> AppResult<f64> {
    text.parse()
        .map_err(|_| AppError::validation(format!("Invalid {}: {}", name, text)))
}

/// The caller's own attendance history, newest first
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<CheckInRecord>>> {
    let repo = CheckInRepository::new(state.db.clone());
    let records = repo.find_by_staff(&user.id).await?;
    Ok(Json(records))
}

#[derive(Debug, Serialize)]
pub struct TodayStatus {
    pub checked_in: bool,
}

/// Whether the caller already clocked in today
pub async fn today_status(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<TodayStatus>> {
    let checked_in = state.check_in.checked_in_today(&user.id).await?;
    Ok(Json(TodayStatus { checked_in }))
}

/// Every attendance record (admin)
pub async fn list_all(State(state): State<ServerState>) -> AppResult<Json<Vec<CheckInRecord>>> {
    let repo = CheckInRepository::new(state.db.clone());
    let records = repo.find_all().await?;
    Ok(Json(records))
}
