//! Authentication Handlers
//!
//! Handles login, registration, logout and the current-user endpoint.

use std::time::Duration;

use axum::{Json, extract::State};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{UserCreate, UserRole, UserStatus};
use crate::db::repository::UserRepository;
use crate::sync::resources;
use crate::utils::AppError;

// Re-use shared DTOs for API consistency
use shared::client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// Synthetic user id for the offline fallback admin
const OFFLINE_ADMIN_ID: &str = "user:offline_admin";

/// Login handler
///
/// Accepts either the login name (case-insensitive) or the registered
/// phone number as the identifier. A wrong password is rejected before
/// the account status is consulted, so it never reveals whether an
/// account is pending or locked.
///
/// The configured offline admin credentials are checked before the
/// store is touched at all. A fresh install has no accounts (and may
/// have no working database yet), and the shop must be able to reach
/// the back office without internet access.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    // Offline fallback first: compared against config only, never the store
    if req.username == state.config.offline_admin_username
        && req.password == state.config.offline_admin_password
    {
        tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;
        return offline_admin_login(&state);
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo.find_by_login(&req.username).await?;

    // Fixed delay to prevent timing attacks (before checking result)
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let user = match user {
        Some(user) => user,
        None => {
            tracing::warn!(target: "security", identifier = %req.username, "login failed - unknown account");
            return Err(AppError::invalid_credentials());
        }
    };

    let password_valid = user
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {}", e)))?;
    if !password_valid {
        tracing::warn!(target: "security", username = %user.username, "login failed - wrong password");
        return Err(AppError::invalid_credentials());
    }

    match user.status {
        UserStatus::Pending => {
            return Err(AppError::forbidden("Account is awaiting approval"));
        }
        UserStatus::Locked => {
            return Err(AppError::forbidden("Account has been locked"));
        }
        UserStatus::Active => {}
    }

    let user_id = user.id_string();
    let token = state
        .get_jwt_service()
        .generate_token(&user_id, &user.username, &user.name, user.role.as_str())
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    // Presence is advisory, a failed flag write must not fail the login
    if let Err(e) = repo.set_online(&user_id, true).await {
        tracing::warn!("could not set online flag for {user_id}: {e:?}");
    }
    let mut info = user.to_info();
    info.is_online = true;
    state.broadcast_sync(resources::USER, "updated", &user_id, Some(&info));

    tracing::info!(username = %user.username, "login ok");
    Ok(Json(LoginResponse { token, user: info }))
}

fn offline_admin_login(state: &ServerState) -> Result<Json<LoginResponse>, AppError> {
    tracing::warn!(target: "security", "offline admin fallback login used");
    let username = state.config.offline_admin_username.clone();
    let token = state
        .get_jwt_service()
        .generate_token(OFFLINE_ADMIN_ID, &username, "Quản lý", "admin")
        .map_err(|e| AppError::internal(format!("Token generation failed: {}", e)))?;

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: OFFLINE_ADMIN_ID.to_string(),
            name: "Quản lý".to_string(),
            username,
            role: "admin".to_string(),
            status: "active".to_string(),
            is_online: true,
            phone: None,
            avatar: None,
        },
    }))
}

/// Self-service registration — creates a pending staff account that an
/// admin must approve before it can log in
pub async fn register(
    State(state): State<ServerState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<UserInfo>, AppError> {
    if req.username.trim().is_empty() || req.password.len() < 6 {
        return Err(AppError::validation(
            "Username required and password must be at least 6 characters",
        ));
    }

    let repo = UserRepository::new(state.get_db());
    let user = repo
        .create(UserCreate {
            name: req.name,
            username: req.username,
            password: req.password,
            role: UserRole::Staff,
            status: UserStatus::Pending,
            phone: Some(req.phone),
        })
        .await?;

    let info = user.to_info();
    state.broadcast_sync(resources::USER, "created", &user.id_string(), Some(&info));

    tracing::info!(username = %user.username, "registration created (pending approval)");
    Ok(Json(info))
}

/// Logout — clears the online flag. The token itself simply expires.
pub async fn logout(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<bool>, AppError> {
    state.carts.clear(&user.id);

    if user.id != OFFLINE_ADMIN_ID {
        let repo = UserRepository::new(state.get_db());
        if let Err(e) = repo.set_online(&user.id, false).await {
            tracing::warn!("could not clear online flag for {}: {e:?}", user.id);
        }
        state.broadcast_sync::<()>(resources::USER, "updated", &user.id, None);
    }
    Ok(Json(true))
}

/// Current user info, fresh from the database
pub async fn me(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> Result<Json<UserInfo>, AppError> {
    if user.id == OFFLINE_ADMIN_ID {
        return Ok(Json(UserInfo {
            id: OFFLINE_ADMIN_ID.to_string(),
            name: user.name,
            username: user.username,
            role: "admin".to_string(),
            status: "active".to_string(),
            is_online: true,
            phone: None,
            avatar: None,
        }));
    }

    let repo = UserRepository::new(state.get_db());
    let db_user = repo
        .find_by_id(&user.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;
    Ok(Json(db_user.to_info()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::Config;
    use crate::db::DbService;

    async fn test_state() -> ServerState {
        let db = DbService::in_memory().await.unwrap().db;
        let config = Config::with_overrides("/tmp/pos-test", 0);
        ServerState::with_db(&config, db)
    }

    fn creds(username: &str, password: &str) -> Json<LoginRequest> {
        Json(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    async fn seed(state: &ServerState, username: &str, status: UserStatus) -> String {
        let repo = UserRepository::new(state.get_db());
        let user = repo
            .create(UserCreate {
                name: format!("NV {username}"),
                username: username.to_string(),
                password: "matkhau123".to_string(),
                role: UserRole::Staff,
                status,
                phone: None,
            })
            .await
            .unwrap();
        user.id_string()
    }

    #[tokio::test]
    async fn offline_admin_opens_session_on_fresh_install() {
        // No accounts exist yet, the configured fallback pair must work
        let state = test_state().await;

        let response = login(State(state), creds("admin", "123456")).await.unwrap();
        assert_eq!(response.user.id, OFFLINE_ADMIN_ID);
        assert_eq!(response.user.role, "admin");
        assert!(!response.token.is_empty());
    }

    #[tokio::test]
    async fn registered_account_does_not_shadow_offline_admin() {
        let state = test_state().await;
        let repo = UserRepository::new(state.get_db());
        let user_id = repo
            .create(UserCreate {
                name: "Admin That".to_string(),
                username: "admin".to_string(),
                password: "matkhau123".to_string(),
                role: UserRole::Admin,
                status: UserStatus::Active,
                phone: None,
            })
            .await
            .unwrap()
            .id_string();

        // The fallback pair wins without consulting the store
        let fallback = login(State(state.clone()), creds("admin", "123456"))
            .await
            .unwrap();
        assert_eq!(fallback.user.id, OFFLINE_ADMIN_ID);

        // The registered password still reaches the real account
        let real = login(State(state), creds("admin", "matkhau123"))
            .await
            .unwrap();
        assert_eq!(real.user.id, user_id);
    }

    #[tokio::test]
    async fn wrong_password_does_not_reveal_account_status() {
        let state = test_state().await;
        seed(&state, "moi", UserStatus::Pending).await;

        let err = login(State(state.clone()), creds("moi", "saimatkhau"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Invalid(_)));

        // The right password does surface the pending status
        let err = login(State(state), creds("moi", "matkhau123"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
