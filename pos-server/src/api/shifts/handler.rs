//! Shift API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::db::models::{NotificationKind, Shift, ShiftCreate, ShiftUpdate};
use crate::db::repository::ShiftRepository;
use crate::sync::resources;
use crate::utils::{AppError, AppResult, time};

/// All shifts
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Shift>>> {
    let repo = ShiftRepository::new(state.db.clone());
    let shifts = repo.find_all().await?;
    Ok(Json(shifts))
}

/// One shift
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Shift>> {
    let repo = ShiftRepository::new(state.db.clone());
    let shift = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Shift {} not found", id)))?;
    Ok(Json(shift))
}

/// Shifts of one calendar date
pub async fn list_by_date(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> AppResult<Json<Vec<Shift>>> {
    // Validate the format so a typo reads as an error, not an empty list
    time::parse_date(&date)?;

    let repo = ShiftRepository::new(state.db.clone());
    let shifts = repo.find_by_date(&date).await?;
    Ok(Json(shifts))
}

/// Create a shift and notify the scheduled staff
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ShiftCreate>,
) -> AppResult<Json<Shift>> {
    time::parse_date(&payload.date)?;
    if payload.staff_ids.is_empty() {
        return Err(AppError::validation("Shift needs at least one staff member"));
    }

    let repo = ShiftRepository::new(state.db.clone());
    let shift = repo.create(payload).await?;

    state.broadcast_sync(resources::SHIFT, "created", &shift.id_string(), Some(&shift));
    notify_scheduled(&state, &shift, "Bạn có ca làm mới");
    Ok(Json(shift))
}

/// Update a shift and notify the (possibly new) staff
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ShiftUpdate>,
) -> AppResult<Json<Shift>> {
    if let Some(date) = &payload.date {
        time::parse_date(date)?;
    }

    let repo = ShiftRepository::new(state.db.clone());
    let shift = repo.update(&id, payload).await?;

    state.broadcast_sync(resources::SHIFT, "updated", &id, Some(&shift));
    notify_scheduled(&state, &shift, "Ca làm của bạn đã thay đổi");
    Ok(Json(shift))
}

/// Delete a shift
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<bool>> {
    let repo = ShiftRepository::new(state.db.clone());
    let result = repo.delete(&id).await?;

    if result {
        state.broadcast_sync::<()>(resources::SHIFT, "deleted", &id, None);
    }
    Ok(Json(result))
}

fn notify_scheduled(state: &ServerState, shift: &Shift, prefix: &str) {
    let message = format!("{}: {} {}-{}", prefix, shift.date, shift.start_time, shift.end_time);
    for staff_id in &shift.staff_ids {
        state
            .notify
            .send(staff_id.clone(), message.clone(), NotificationKind::Shift);
    }
}
