use crate::app::hooks::ErrorResponse;
use crate::state::AppState;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

/// Runtime configuration fetched by the service worker before it
/// initializes its push subscription handle.
#[derive(Serialize)]
pub(crate) struct PushInitResponse {
    #[serde(rename = "appName")]
    pub(crate) app_name: String,
    #[serde(rename = "publicKey")]
    pub(crate) public_key: String,
}

pub(crate) async fn push_init(
    State(state): State<AppState>,
) -> Result<Json<PushInitResponse>, (StatusCode, Json<ErrorResponse>)> {
    match state.config.push_public_key {
        Some(public_key) => Ok(Json(PushInitResponse {
            app_name: state.config.app_name,
            public_key,
        })),
        None => Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "push notifications are not configured".to_string(),
            }),
        )),
    }
}
