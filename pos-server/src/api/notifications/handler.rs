//! Notification API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::Notification;
use crate::db::repository::NotificationRepository;
use crate::utils::{AppError, AppResult};

/// The caller's notifications, newest first
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Notification>>> {
    let repo = NotificationRepository::new(state.db.clone());
    let notifications = repo.find_for_user(&user.id).await?;
    Ok(Json(notifications))
}

/// Mark one of the caller's notifications as read
pub async fn mark_read(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<Notification>> {
    let repo = NotificationRepository::new(state.db.clone());

    // Ownership check before the write
    let owned = repo
        .find_for_user(&user.id)
        .await?
        .iter()
        .any(|n| n.id_string() == id);
    if !owned {
        return Err(AppError::not_found(format!("Notification {} not found", id)));
    }

    let notification = repo.mark_read(&id).await?;
    Ok(Json(notification))
}
