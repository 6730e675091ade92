use crate::assets;
use crate::config;
use crate::state;

use axum::Router;
use axum::routing::get;
use axum::routing::post;

mod hooks;
mod push;

pub fn app(config: config::AppConfig) -> Router {
    if let config::GatewayConfigStatus::Incomplete = config::load_gateway_config(&config) {
        eprintln!("push dispatch disabled: incomplete gateway configuration");
    }
    let state = state::AppState {
        config,
        http: reqwest::Client::new(),
    };
    Router::new()
        .route("/hooks/notices/{notice_id}", post(hooks::notice_created))
        .route(
            "/hooks/notifications/{notification_id}",
            post(hooks::notification_created),
        )
        .route("/push/init.json", get(push::push_init))
        .route("/sw.js", get(assets::service_worker))
        .route("/health", get(health))
        .with_state(state)
}

pub(crate) async fn health() -> &'static str {
    "ok"
}
