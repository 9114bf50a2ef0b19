//! User API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::UserInfo;

use crate::core::ServerState;
use crate::db::models::{UserCreate, UserStatus, UserUpdate};
use crate::db::repository::UserRepository;
use crate::sync::resources;
use crate::utils::{AppError, AppResult};

/// List all accounts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<UserInfo>>> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo.find_all().await?;
    Ok(Json(users.iter().map(|u| u.to_info()).collect()))
}

/// Get one account by id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", id)))?;
    Ok(Json(user.to_info()))
}

/// Create an account (admin creation skips the approval step)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.create(payload).await?;

    let info = user.to_info();
    state.broadcast_sync(resources::USER, "created", &user.id_string(), Some(&info));
    Ok(Json(info))
}

/// Update an account
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo.update(&id, payload).await?;

    let info = user.to_info();
    state.broadcast_sync(resources::USER, "updated", &id, Some(&info));
    Ok(Json(info))
}

/// Delete an account
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = UserRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;

    if result {
        state.broadcast_sync::<()>(resources::USER, "deleted", &id, None);
    }
    Ok(Json(result))
}

async fn set_status(
    state: &ServerState,
    id: &str,
    status: UserStatus,
) -> AppResult<Json<UserInfo>> {
    let repo = UserRepository::new(state.db.clone());
    let user = repo
        .update(
            id,
            UserUpdate {
                status: Some(status),
                ..Default::default()
            },
        )
        .await?;

    let info = user.to_info();
    state.broadcast_sync(resources::USER, "updated", id, Some(&info));
    Ok(Json(info))
}

/// Approve a pending registration
pub async fn approve(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    set_status(&state, &id, UserStatus::Active).await
}

/// Lock an account
pub async fn lock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    set_status(&state, &id, UserStatus::Locked).await
}

/// Unlock an account
pub async fn unlock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserInfo>> {
    set_status(&state, &id, UserStatus::Active).await
}
