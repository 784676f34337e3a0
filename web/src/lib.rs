use log::*;
use tokio::net::TcpListener;

pub use self::error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
pub mod router;

pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let server_url = format!(
        "{}:{}",
        app_state
            .config
            .interface
            .as_deref()
            .unwrap_or("127.0.0.1"),
        app_state.config.port
    );

    info!("Server starting... listening for connections on http://{server_url}");

    let listener = TcpListener::bind(&server_url).await?;
    axum::serve(listener, router::define_routes(app_state)).await
}
