//! FTP adapter built on `suppaftp`.
//!
//! Mirrors the SFTP adapter's contract: one control connection per request,
//! established in `connect` and released in `close`. Folder existence is
//! probed with `CWD`, which is also how "folder not found" is told apart
//! from "folder empty" on servers that return an empty `LIST` for both.

use std::io::Cursor;
use std::time::Duration;

use suppaftp::list;
use suppaftp::types::FileType;
use suppaftp::FtpStream;
use tracing::{debug, info};

use crate::errors::AuthError;
use crate::filter::Filter;
use crate::model::{FileInfo, FileSystemElement, FolderInfo, RemoteHost};

use super::{join_path, RemoteClient};

/// FTP implementation of the remote-client interface.
pub struct FtpClient {
    remote_host: RemoteHost,
    timeout: Duration,
    temp_suffix: String,
    stream: Option<FtpStream>,
}

impl FtpClient {
    pub fn new(remote_host: RemoteHost, timeout: Duration, temp_suffix: String) -> Self {
        Self {
            remote_host,
            timeout,
            temp_suffix,
            stream: None,
        }
    }

    fn stream(&mut self) -> Option<&mut FtpStream> {
        self.stream.as_mut()
    }

    fn temp_name(&self, file_name: &str) -> String {
        format!("{file_name}{}", self.temp_suffix)
    }

    /// `CWD` into the folder; false means the folder does not exist.
    fn enter_folder(&mut self, folder_path: &str) -> bool {
        self.stream()
            .map(|ftp| ftp.cwd(folder_path).is_ok())
            .unwrap_or(false)
    }
}

impl RemoteClient for FtpClient {
    fn connect(&mut self) -> Result<(), AuthError> {
        let endpoint = self.remote_host.endpoint();
        info!("CONNECT -> {endpoint}");

        let addr = format!("{}:{}", self.remote_host.host, self.remote_host.port);
        let mut stream = FtpStream::connect(&addr)
            .map_err(|e| AuthError::Connect(endpoint.clone(), e.to_string()))?;

        stream
            .get_ref()
            .set_read_timeout(Some(self.timeout))
            .and_then(|_| stream.get_ref().set_write_timeout(Some(self.timeout)))
            .map_err(|e| AuthError::Connect(endpoint.clone(), e.to_string()))?;

        stream
            .login(&self.remote_host.username, &self.remote_host.password)
            .map_err(|e| AuthError::Login(endpoint.clone(), e.to_string()))?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| AuthError::Handshake(endpoint, e.to_string()))?;

        self.stream = Some(stream);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn list_files(
        &mut self,
        folder_path: &str,
        filter: &Filter,
    ) -> Option<Vec<FileSystemElement>> {
        let endpoint = self.remote_host.endpoint();
        if !self.enter_folder(folder_path) {
            debug!("LIST -> {endpoint}/{folder_path} <- folder not found");
            return None;
        }

        let lines = self.stream()?.list(None).ok()?;
        let mut result = Vec::new();
        for line in &lines {
            let Ok(entry) = line.parse::<list::File>() else {
                debug!("unparseable LIST line: {line}");
                continue;
            };
            if entry.name() == "." || entry.name() == ".." {
                continue;
            }

            let modified = chrono::DateTime::from(entry.modified());
            let element = if entry.is_directory() {
                FileSystemElement::Folder(FolderInfo {
                    name: entry.name().to_string(),
                    modified,
                    folder_path: folder_path.to_string(),
                })
            } else {
                FileSystemElement::File(FileInfo {
                    name: entry.name().to_string(),
                    modified,
                    size: entry.size() as u64,
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
            .stream()
            .map(|ftp| ftp.mkdir(folder_path).is_ok())
            .unwrap_or(false);
        info!(
            "CREATE -> {}/{folder_path} <- {ok}",
            self.remote_host.endpoint()
        );
        ok
    }

    fn delete_folder(&mut self, folder_path: &str) -> bool {
        let ok = self
            .stream()
            .map(|ftp| ftp.rmdir(folder_path).is_ok())
            .unwrap_or(false);
        info!(
            "DELETE -> {}/{folder_path} <- {ok}",
            self.remote_host.endpoint()
        );
        ok
    }

    fn retrieve_file(&mut self, folder_path: &str, file_name: &str) -> Option<Vec<u8>> {
        let data = if self.enter_folder(folder_path) {
            self.stream()?
                .retr_as_buffer(file_name)
                .ok()
                .map(Cursor::into_inner)
        } else {
            None
        };
        info!(
            "GET -> {}/{} <- {} bytes",
            self.remote_host.endpoint(),
            join_path(folder_path, file_name),
            data.as_ref().map(|d| d.len()).unwrap_or(0)
        );
        data
    }

    fn upload_file(&mut self, folder_path: &str, file_name: &str, content: &[u8]) -> bool {
        let temp = self.temp_name(file_name);

        // Store under the temporary name, then rename onto the target as the
        // final step; RNTO replaces an existing target server-side.
        let ok = self.enter_folder(folder_path)
            && (|| {
                let ftp = self.stream()?;
                ftp.put_file(&temp, &mut Cursor::new(content)).ok()?;
                ftp.rename(temp.as_str(), file_name).ok()
            })()
            .is_some();

        info!(
            "UPLOAD -> {}/{} <- {ok}",
            self.remote_host.endpoint(),
            join_path(folder_path, file_name)
        );
        ok
    }

    fn delete_file(&mut self, folder_path: &str, file_name: &str) -> bool {
        let ok = self.enter_folder(folder_path)
            && self
                .stream()
                .map(|ftp| ftp.rm(file_name).is_ok())
                .unwrap_or(false);
        info!(
            "DELETE -> {}/{} <- {ok}",
            self.remote_host.endpoint(),
            join_path(folder_path, file_name)
        );
        ok
    }

    fn rename_file(&mut self, folder_path: &str, old_name: &str, new_name: &str) -> bool {
        let old = join_path(folder_path, old_name);
        let new = join_path(folder_path, new_name);
        let ok = self
            .stream()
            .map(|ftp| ftp.rename(&old, &new).is_ok())
            .unwrap_or(false);
        info!(
            "RENAME -> {}/{old} to {new_name} <- {ok}",
            self.remote_host.endpoint()
        );
        ok
    }

    fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.quit();
        }
    }
}
