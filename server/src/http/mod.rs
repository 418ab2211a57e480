//! HTTP surface of the gateway.
//!
//! Routes mirror the remote file system: `/folder/*path` for folder
//! operations, `/file/*path` for file operations. Every request carries its
//! own remote credentials, so there is no server-side session state.

pub mod auth;
pub mod response;
pub mod routes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use ftpgate_core::handler::CommandHandler;

/// Shared, read-only request-handling state.
#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<CommandHandler>,
}

/// Build the gateway router.
pub fn router(handler: CommandHandler) -> Router {
    let state = AppState {
        handler: Arc::new(handler),
    };

    Router::new()
        .route(
            "/folder/*path",
            get(routes::retrieve_folder)
                .put(routes::create_folder)
                .delete(routes::delete_folder),
        )
        .route(
            "/file/*path",
            get(routes::retrieve_file)
                .put(routes::upload_file)
                .post(routes::rename_file)
                .delete(routes::delete_file),
        )
        // Upload bodies are arbitrary byte streams; no artificial cap.
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
