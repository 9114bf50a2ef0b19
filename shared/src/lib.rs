//! Shared types for the Bánh Mì POS stack
//!
//! Wire-level DTOs used by the server and its clients: auth
//! request/response types, realtime sync payloads, and time helpers.

pub mod client;
pub mod sync;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use client::{LoginRequest, LoginResponse, RegisterRequest, UserInfo};
pub use sync::SyncPayload;
