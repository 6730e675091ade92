use crate::adapters::{HttpPushGateway, HttpTokenStore};
use crate::config;
use crate::dispatch;
use crate::state::AppState;
use crate::types::event::{NoticeDoc, NotificationDoc};

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: String,
}

#[derive(Serialize)]
pub(crate) struct HookResponse {
    pub(crate) success: bool,
    #[serde(rename = "messageId", skip_serializing_if = "Option::is_none")]
    pub(crate) message_id: Option<String>,
    #[serde(rename = "successCount", skip_serializing_if = "Option::is_none")]
    pub(crate) success_count: Option<usize>,
}

impl HookResponse {
    fn skipped() -> Self {
        Self {
            success: true,
            message_id: None,
            success_count: None,
        }
    }

    fn from_outcome(outcome: dispatch::DispatchOutcome) -> Self {
        match outcome {
            dispatch::DispatchOutcome::Broadcast { message_id } => Self {
                success: true,
                message_id: Some(message_id),
                success_count: None,
            },
            dispatch::DispatchOutcome::Sent { success_count } => Self {
                success: true,
                message_id: None,
                success_count: Some(success_count),
            },
            dispatch::DispatchOutcome::Skipped(_) => Self::skipped(),
        }
    }
}

pub(crate) async fn notice_created(
    State(state): State<AppState>,
    Path(notice_id): Path<String>,
    body: Bytes,
) -> Result<Json<HookResponse>, (StatusCode, Json<ErrorResponse>)> {
    let doc: NoticeDoc = match parse_doc(&body, "notices", &notice_id)? {
        Some(doc) => doc,
        None => return Ok(Json(HookResponse::skipped())),
    };
    let gateway = gateway_from_state(&state)?;
    let event = doc.into_event(&notice_id);

    match dispatch::dispatch_announcement(&gateway, &event).await {
        Ok(outcome) => Ok(Json(HookResponse::from_outcome(outcome))),
        Err(err) => {
            eprintln!("announcement dispatch error: {err} ({notice_id})");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: err.code().to_string(),
                }),
            ))
        }
    }
}

pub(crate) async fn notification_created(
    State(state): State<AppState>,
    Path(notification_id): Path<String>,
    body: Bytes,
) -> Result<Json<HookResponse>, (StatusCode, Json<ErrorResponse>)> {
    let doc: NotificationDoc = match parse_doc(&body, "notifications", &notification_id)? {
        Some(doc) => doc,
        None => return Ok(Json(HookResponse::skipped())),
    };
    // Non-mention notifications are ignored silently.
    let event = match doc.into_event(&notification_id) {
        Some(event) => event,
        None => return Ok(Json(HookResponse::skipped())),
    };
    let gateway = gateway_from_state(&state)?;
    let store = store_from_state(&state)?;

    match dispatch::dispatch_mention(&gateway, &store, &event).await {
        Ok(outcome) => Ok(Json(HookResponse::from_outcome(outcome))),
        Err(err) => {
            eprintln!("mention dispatch error: {err} ({notification_id})");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse {
                    error: err.code().to_string(),
                }),
            ))
        }
    }
}

/// An event with no attached document is a logged no-op, matching the
/// upstream change feed occasionally firing without a body.
fn parse_doc<T: serde::de::DeserializeOwned>(
    body: &Bytes,
    collection: &str,
    doc_id: &str,
) -> Result<Option<T>, (StatusCode, Json<ErrorResponse>)> {
    if body.is_empty() {
        eprintln!("{collection} hook: no document attached to event ({doc_id})");
        return Ok(None);
    }
    match serde_json::from_slice(body) {
        Ok(doc) => Ok(Some(doc)),
        Err(err) => {
            eprintln!("{collection} hook: invalid document body ({doc_id}): {err}");
            Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: "invalid-payload".to_string(),
                }),
            ))
        }
    }
}

fn gateway_from_state(
    state: &AppState,
) -> Result<HttpPushGateway, (StatusCode, Json<ErrorResponse>)> {
    match config::load_gateway_config(&state.config) {
        config::GatewayConfigStatus::Ready(gateway) => {
            Ok(HttpPushGateway::new(state.http.clone(), gateway))
        }
        config::GatewayConfigStatus::Incomplete => {
            eprintln!("push dispatch disabled: incomplete gateway configuration");
            Err(not_configured())
        }
        config::GatewayConfigStatus::Missing => Err(not_configured()),
    }
}

fn store_from_state(
    state: &AppState,
) -> Result<HttpTokenStore, (StatusCode, Json<ErrorResponse>)> {
    match state.config.user_store_url.as_deref() {
        Some(url) => Ok(HttpTokenStore::new(state.http.clone(), url)),
        None => {
            eprintln!("push dispatch disabled: user store is not configured");
            Err(not_configured())
        }
    }
}

fn not_configured() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ErrorResponse {
            error: "push notifications are not configured".to_string(),
        }),
    )
}
