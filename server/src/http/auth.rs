//! Per-request credential extraction.
//!
//! The remote host is resolved from custom headers; username and password may
//! alternatively arrive as standard basic-auth credentials. A missing field
//! is an unauthorized outcome, never a panic.

use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use ftpgate_core::errors::AuthError;
use ftpgate_core::model::RemoteHost;

pub const HOST_HEADER: &str = "FTP-Host";
pub const PORT_HEADER: &str = "FTP-Port";
pub const USER_HEADER: &str = "FTP-User";
pub const PWD_HEADER: &str = "FTP-Password";

/// Resolve the remote host for one request.
pub fn remote_host(headers: &HeaderMap) -> Result<RemoteHost, AuthError> {
    let host = required_header(headers, HOST_HEADER)?;
    let port = required_header(headers, PORT_HEADER)?
        .parse::<u16>()
        .map_err(|_| AuthError::MissingCredentials(format!("{PORT_HEADER} is not a valid port")))?;

    let (username, password) = match basic_credentials(headers) {
        Some(creds) => creds,
        None => (
            required_header(headers, USER_HEADER)?,
            required_header(headers, PWD_HEADER)?,
        ),
    };

    Ok(RemoteHost {
        host,
        port,
        username,
        password,
    })
}

fn required_header(headers: &HeaderMap, name: &str) -> Result<String, AuthError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .ok_or_else(|| AuthError::MissingCredentials(format!("{name} not configured in headers")))
}

/// Decode `Authorization: Basic` into (user, password), if present and valid.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':').unwrap_or((decoded.as_str(), ""));
    Some((user.to_string(), password.to_string()))
}
