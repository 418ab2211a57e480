//! SFTP adapter built on `ssh2`.
//!
//! One instance owns one SSH session, established in [`RemoteClient::connect`]
//! and torn down in [`RemoteClient::close`]. Every libssh2 error inside an
//! operation collapses into the trait's `false`/`None` convention.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::time::Duration;

use ssh2::{Session, Sftp};
use tracing::{debug, info};

use crate::errors::AuthError;
use crate::filter::Filter;
use crate::model::{FileInfo, FileSystemElement, FolderInfo, RemoteHost};

use super::{datetime_from_epoch, join_path, RemoteClient};

/// SFTP implementation of the remote-client interface.
pub struct SftpClient {
    remote_host: RemoteHost,
    timeout: Duration,
    temp_suffix: String,
    session: Option<Session>,
    sftp: Option<Sftp>,
}

// ssh2::Session and ssh2::Sftp contain raw pointers but each client instance
// is owned by a single request and never shared.
unsafe impl Send for SftpClient {}

impl SftpClient {
    pub fn new(remote_host: RemoteHost, timeout: Duration, temp_suffix: String) -> Self {
        Self {
            remote_host,
            timeout,
            temp_suffix,
            session: None,
            sftp: None,
        }
    }

    fn sftp(&self) -> Option<&Sftp> {
        self.sftp.as_ref()
    }

    fn temp_name(&self, file_name: &str) -> String {
        format!("{file_name}{}", self.temp_suffix)
    }
}

impl RemoteClient for SftpClient {
    fn connect(&mut self) -> Result<(), AuthError> {
        let endpoint = self.remote_host.endpoint();
        info!("CONNECT -> {endpoint}");

        let addr = format!("{}:{}", self.remote_host.host, self.remote_host.port);
        let tcp = TcpStream::connect(&addr)
            .map_err(|e| AuthError::Connect(endpoint.clone(), e.to_string()))?;

        let mut session = Session::new()
            .map_err(|e| AuthError::Handshake(endpoint.clone(), e.to_string()))?;
        session.set_timeout(self.timeout.as_millis() as u32);
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| AuthError::Handshake(endpoint.clone(), e.to_string()))?;

        session
            .userauth_password(&self.remote_host.username, &self.remote_host.password)
            .map_err(|e| AuthError::Login(endpoint.clone(), e.to_string()))?;
        if !session.authenticated() {
            return Err(AuthError::Login(endpoint, "not authenticated".into()));
        }

        let sftp = session
            .sftp()
            .map_err(|e| AuthError::Handshake(endpoint, e.to_string()))?;

        self.session = Some(session);
        self.sftp = Some(sftp);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.session
            .as_ref()
            .map(|s| s.authenticated())
            .unwrap_or(false)
    }

    fn list_files(
        &mut self,
        folder_path: &str,
        filter: &Filter,
    ) -> Option<Vec<FileSystemElement>> {
        let endpoint = self.remote_host.endpoint();
        let entries = self
            .sftp()?
            .readdir(Path::new(folder_path))
            .map_err(|e| debug!("readdir {folder_path} failed: {e}"))
            .ok()?;

        let mut result = Vec::new();
        for (pathbuf, stat) in entries {
            let name = pathbuf
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if name == "." || name == ".." {
                continue;
            }

            let modified = datetime_from_epoch(stat.mtime.unwrap_or(0));
            let element = if stat.is_dir() {
                FileSystemElement::Folder(FolderInfo {
                    name,
                    modified,
                    folder_path: folder_path.to_string(),
                })
            } else {
                FileSystemElement::File(FileInfo {
                    name,
                    modified,
                    size: stat.size.unwrap_or(0),
                    folder_path: folder_path.to_string(),
                })
            };

            if filter.accept(&element) {
                result.push(element);
            }
        }

        info!("LIST -> {endpoint}/{folder_path} <- {} items", result.len());
        Some(result)
    }

    fn create_folder(&mut self, folder_path: &str) -> bool {
        let ok = self
            .sftp()
            .map(|sftp| sftp.mkdir(Path::new(folder_path), 0o755).is_ok())
            .unwrap_or(false);
        info!(
            "CREATE -> {}/{folder_path} <- {ok}",
            self.remote_host.endpoint()
        );
        ok
    }

    fn delete_folder(&mut self, folder_path: &str) -> bool {
        let ok = self
            .sftp()
            .map(|sftp| sftp.rmdir(Path::new(folder_path)).is_ok())
            .unwrap_or(false);
        info!(
            "DELETE -> {}/{folder_path} <- {ok}",
            self.remote_host.endpoint()
        );
        ok
    }

    fn retrieve_file(&mut self, folder_path: &str, file_name: &str) -> Option<Vec<u8>> {
        let full_path = join_path(folder_path, file_name);
        let data = (|| {
            let mut file = self.sftp()?.open(Path::new(&full_path)).ok()?;
            let mut data = Vec::new();
            file.read_to_end(&mut data).ok()?;
            Some(data)
        })();
        info!(
            "GET -> {}/{full_path} <- {} bytes",
            self.remote_host.endpoint(),
            data.as_ref().map(|d| d.len()).unwrap_or(0)
        );
        data
    }

    fn upload_file(&mut self, folder_path: &str, file_name: &str, content: &[u8]) -> bool {
        let target = join_path(folder_path, file_name);
        let temp = join_path(folder_path, &self.temp_name(file_name));

        let ok = (|| {
            let sftp = self.sftp()?;

            // Write the full content under the temporary name first; a failed
            // write must leave the target untouched.
            let mut file = sftp.create(Path::new(&temp)).ok()?;
            file.write_all(content).ok()?;
            drop(file);

            // SFTP rename does not overwrite, so clear an existing target
            // before the final rename.
            if sftp.stat(Path::new(&target)).is_ok() {
                sftp.unlink(Path::new(&target)).ok()?;
            }
            sftp.rename(Path::new(&temp), Path::new(&target), None).ok()
        })()
        .is_some();

        info!("UPLOAD -> {}/{target} <- {ok}", self.remote_host.endpoint());
        ok
    }

    fn delete_file(&mut self, folder_path: &str, file_name: &str) -> bool {
        let full_path = join_path(folder_path, file_name);
        let ok = self
            .sftp()
            .map(|sftp| sftp.unlink(Path::new(&full_path)).is_ok())
            .unwrap_or(false);
        info!("DELETE -> {}/{full_path} <- {ok}", self.remote_host.endpoint());
        ok
    }

    fn rename_file(&mut self, folder_path: &str, old_name: &str, new_name: &str) -> bool {
        let old = join_path(folder_path, old_name);
        let new = join_path(folder_path, new_name);
        let ok = self
            .sftp()
            .map(|sftp| {
                sftp.rename(Path::new(&old), Path::new(&new), None)
                    .is_ok()
            })
            .unwrap_or(false);
        info!(
            "RENAME -> {}/{old} to {new_name} <- {ok}",
            self.remote_host.endpoint()
        );
        ok
    }

    fn close(&mut self) {
        self.sftp = None;
        if let Some(session) = self.session.take() {
            let _ = session.disconnect(None, "closing", None);
        }
    }
}
