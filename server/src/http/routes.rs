//! Route handlers: translate one HTTP request into one command, run it on
//! the blocking pool, and render the outcome.

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::error;

use ftpgate_core::filter::Filter;
use ftpgate_core::model::Command;

use super::{auth, response, AppState};

#[derive(Deserialize)]
pub struct ListQuery {
    /// Optional glob filter on entry names.
    name: Option<String>,
}

#[derive(Deserialize)]
pub struct RenameQuery {
    /// New file name, within the same folder.
    to: Option<String>,
}

pub async fn retrieve_folder(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<ListQuery>,
    headers: HeaderMap,
) -> Response {
    let command = Command::RetrieveFolder {
        path,
        filter: Filter::from_option(query.name.as_deref()),
    };
    dispatch(state, headers, command).await
}

pub async fn create_folder(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    dispatch(state, headers, Command::CreateFolder { path }).await
}

pub async fn delete_folder(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    dispatch(state, headers, Command::DeleteFolder { path }).await
}

pub async fn retrieve_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    let (path, file_name) = split_file_path(&path);
    dispatch(state, headers, Command::RetrieveFile { path, file_name }).await
}

pub async fn upload_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (path, file_name) = split_file_path(&path);
    let command = Command::UploadFile {
        path,
        file_name,
        content: body.to_vec(),
    };
    dispatch(state, headers, command).await
}

pub async fn delete_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    headers: HeaderMap,
) -> Response {
    let (path, file_name) = split_file_path(&path);
    dispatch(state, headers, Command::DeleteFile { path, file_name }).await
}

pub async fn rename_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Query(query): Query<RenameQuery>,
    headers: HeaderMap,
) -> Response {
    let Some(new_name) = query.to else {
        return (StatusCode::BAD_REQUEST, "missing query parameter: to").into_response();
    };
    let (path, old_name) = split_file_path(&path);
    let command = Command::RenameFile {
        path,
        old_name,
        new_name,
    };
    dispatch(state, headers, command).await
}

/// Resolve credentials, then run the command's connect–operate–close cycle
/// on the blocking pool (the remote clients are synchronous).
async fn dispatch(state: AppState, headers: HeaderMap, command: Command) -> Response {
    let remote_host = match auth::remote_host(&headers) {
        Ok(host) => host,
        Err(e) => return (StatusCode::UNAUTHORIZED, e.to_string()).into_response(),
    };

    let handler = state.handler.clone();
    match tokio::task::spawn_blocking(move || handler.handle(&remote_host, command)).await {
        Ok(result) => response::render(result),
        Err(e) => {
            error!("command task failed: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Split a file path into (containing folder, file name) on the last slash.
fn split_file_path(path: &str) -> (String, String) {
    match path.rsplit_once('/') {
        Some((folder, name)) => (folder.to_string(), name.to_string()),
        None => (String::new(), path.to_string()),
    }
}
