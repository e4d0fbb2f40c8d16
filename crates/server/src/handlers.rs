//! HTTP utility handlers outside the socket path.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;
use uuid::Uuid;

use crate::config::AppState;
use crate::error::{Error, Result};

pub async fn health() -> &'static str {
    "OK - Chat Relay Server"
}

/// GET /api/uuid
pub async fn generate_uuid() -> Json<Value> {
    Json(json!({ "id": Uuid::new_v4().to_string() }))
}

/// GET /api/ping-external — report the caller's public IP via ipify.
pub async fn ping_external(State(state): State<AppState>) -> Result<Json<Value>> {
    match fetch_external_ip(&state.http).await {
        Ok(ip) => Ok(Json(json!({ "yourIp": ip }))),
        Err(e) => {
            warn!("external ping failed: {}", e);
            Err(Error::BadGateway(e.to_string()))
        }
    }
}

async fn fetch_external_ip(client: &reqwest::Client) -> reqwest::Result<String> {
    #[derive(Deserialize)]
    struct IpifyResponse {
        ip: String,
    }

    let resp: IpifyResponse = client
        .get("https://api.ipify.org?format=json")
        .send()
        .await?
        .json()
        .await?;
    Ok(resp.ip)
}

/// Fallback for unmatched routes.
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "404 Not Found")
}
