//! Remote-client capability interface and its protocol adapters.
//!
//! Each protocol (FTP, SFTP) provides its own implementation of the
//! [`RemoteClient`] trait. The command handler never knows which one it is
//! talking to: the protocol is chosen once at startup through a
//! [`ClientFactory`], not per request.

pub mod ftp;
pub mod sftp;

use std::sync::Arc;

use crate::errors::AuthError;
use crate::filter::Filter;
use crate::model::{FileSystemElement, RemoteHost};

/// Builds a fresh, unconnected client for one request's remote host.
pub type ClientFactory = Arc<dyn Fn(&RemoteHost) -> Box<dyn RemoteClient> + Send + Sync>;

/// Operations available against one remote session.
///
/// "Not found" and "cannot do" are ordinary `None`/`false` results, not
/// errors; adapters catch their library's errors at this boundary and
/// collapse them into that convention. Only [`RemoteClient::connect`] can
/// fail, and that failure always means "unauthorized" to the caller.
///
/// Implementations are blocking; the server wraps each request's whole
/// connect–operate–close cycle in `spawn_blocking`.
pub trait RemoteClient: Send {
    /// Establish and authenticate the session. Must precede everything else.
    fn connect(&mut self) -> Result<(), AuthError>;

    /// Observability hook, no side effects.
    fn is_connected(&self) -> bool;

    /// List a folder. `None` means the folder does not exist; an existing
    /// but empty folder is `Some` of an empty vec. Only entries whose name
    /// matches `filter` are returned.
    fn list_files(&mut self, folder_path: &str, filter: &Filter)
        -> Option<Vec<FileSystemElement>>;

    /// `false` if the folder already exists or cannot be created.
    fn create_folder(&mut self, folder_path: &str) -> bool;

    /// `false` if the folder is absent, not empty, or not deletable.
    fn delete_folder(&mut self, folder_path: &str) -> bool;

    /// `None` when the file or its folder does not exist.
    fn retrieve_file(&mut self, folder_path: &str, file_name: &str) -> Option<Vec<u8>>;

    /// Atomic upload: the content is written under a temporary name and
    /// renamed onto the target as the final step, so readers never observe a
    /// partial file. An existing target is replaced. `false` if the target
    /// folder does not exist or the write fails.
    fn upload_file(&mut self, folder_path: &str, file_name: &str, content: &[u8]) -> bool;

    /// `false` if the file is absent.
    fn delete_file(&mut self, folder_path: &str, file_name: &str) -> bool;

    /// `false` if the source is absent.
    fn rename_file(&mut self, folder_path: &str, old_name: &str, new_name: &str) -> bool;

    /// Release the session. Idempotent, never fails, safe even if `connect`
    /// was never called or already failed.
    fn close(&mut self);
}

/// Seconds-since-epoch to UTC timestamp, clamping anything unrepresentable
/// to the epoch itself.
pub(crate) fn datetime_from_epoch(secs: u64) -> chrono::DateTime<chrono::Utc> {
    use chrono::TimeZone;
    chrono::Utc
        .timestamp_opt(secs as i64, 0)
        .single()
        .unwrap_or(chrono::DateTime::UNIX_EPOCH)
}

/// Join a folder path and a file name with exactly one slash.
pub(crate) fn join_path(folder_path: &str, file_name: &str) -> String {
    if folder_path.is_empty() {
        file_name.to_string()
    } else if folder_path.ends_with('/') {
        format!("{folder_path}{file_name}")
    } else {
        format!("{folder_path}/{file_name}")
    }
}
