//! HTTP API request/response DTOs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::websocket::PresenceInfo;

/// `POST /signup` request body
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub photo: String,
}

/// Success body (`201`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Error body (`4xx` / `5xx`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// `GET /api/presence` response
pub type PresenceResponse = BTreeMap<String, PresenceInfo>;
