//! Query Service：餐厅列表 / 单店 / 健康检查三个只读接口

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use axum::{
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::food::{config::AppConfig, db::create_sqlite_pool_with_migration};

pub mod routes;
pub mod state;

use routes::{detail_handler, health_handler, list_handler};
pub use state::State;

pub fn build_router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/restaurants", get(list_handler))
        .route("/api/restaurants/{id}", get(detail_handler))
        .route("/api/health", get(health_handler))
        .layer(cors)
        .with_state(state)
}

pub async fn start_server(config: AppConfig) -> Result<()> {
    info!("[Server] Initializing state...");
    let db = create_sqlite_pool_with_migration(&config.database_url, 5).await?;
    let state = State::new(config, db);

    let address = format!("0.0.0.0:{}", state.config.port);
    let app = build_router(state);

    let listener = TcpListener::bind(&address)
        .await
        .context(format!("绑定地址失败: {}", address))?;
    info!("[Server] ✅ Server running: http://{address}");
    info!("[Server] ✅ API health:     http://{address}/api/health");
    info!("[Server] ✅ Restaurants:    http://{address}/api/restaurants");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("服务异常退出")?;

    info!("[Server] Server shutting down...");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_ok() {
            info!("[Server] Received Ctrl+C, shutting down");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal as unix_signal, SignalKind};
        match unix_signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("[Server] Received terminate signal, shutting down");
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
