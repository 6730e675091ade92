use std::net::SocketAddr;

pub mod adapters;
pub mod app;
pub mod config;
pub mod dispatch;
pub mod ports;
pub mod state;
pub mod types;

mod assets;

pub use app::app;

pub async fn serve(addr: SocketAddr, config: config::AppConfig) {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app(config)).await.expect("server error");
}
