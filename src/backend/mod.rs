use crate::backend::{config::MagpieConfig, store::MagpieContext, utils::error::BackendResult};
use axum::Router;
use log::info;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod config;
pub mod store;
pub mod utils;

pub async fn start(config: MagpieConfig) -> BackendResult<()> {
    let context = MagpieContext::new(config);

    let app = Router::new()
        .nest("/api/v1", api::api_routes(context.clone()))
        .layer(CorsLayer::permissive());

    info!("Listening on {}", &context.config.bind);
    let listener = TcpListener::bind(context.config.bind).await?;
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
