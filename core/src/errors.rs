//! Error types for the gateway core.
//!
//! The remote client interface deliberately keeps "not found" and "cannot do"
//! out of the error domain: those are ordinary `false`/`None` results. The
//! only failure worth a type is a failure to establish the session, which the
//! HTTP layer renders as 401 regardless of the requested command.

use thiserror::Error;

/// Failure to establish an authenticated remote session.
///
/// Anything that goes wrong between "dial the host" and "session ready" ends
/// up here: unreachable host, protocol handshake failure, rejected login.
#[derive(Error, Debug)]
pub enum AuthError {
    /// TCP connection to the remote host failed.
    #[error("connection to {0} failed: {1}")]
    Connect(String, String),

    /// Protocol-level handshake failed before authentication.
    #[error("handshake with {0} failed: {1}")]
    Handshake(String, String),

    /// The server rejected the supplied credentials.
    #[error("login rejected for {0}: {1}")]
    Login(String, String),

    /// Required credential fields were missing from the request.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_error_display() {
        let err = AuthError::Connect("ftp.example.com:21".into(), "refused".into());
        assert_eq!(
            err.to_string(),
            "connection to ftp.example.com:21 failed: refused"
        );

        let err = AuthError::Login("user@host:22".into(), "bad password".into());
        assert_eq!(
            err.to_string(),
            "login rejected for user@host:22: bad password"
        );

        let err = AuthError::MissingCredentials("FTP-Host".into());
        assert_eq!(err.to_string(), "missing credentials: FTP-Host");
    }
}
