//! In-memory fake remote server and client for tests.
//!
//! [`FakeRemote`] holds the "server side" state shared across the per-request
//! [`FakeRemoteClient`] instances a factory hands out, so tests can assert on
//! state across requests and on session hygiene.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::client::RemoteClient;
use crate::errors::AuthError;
use crate::filter::Filter;
use crate::model::{FileInfo, FileSystemElement, FolderInfo, RemoteHost};

#[derive(Default)]
struct RemoteState {
    folders: Vec<String>,
    files: BTreeMap<(String, String), Vec<u8>>,
    open_sessions: usize,
}

/// Shared in-memory file-system state.
#[derive(Clone, Default)]
pub struct FakeRemote {
    state: Arc<Mutex<RemoteState>>,
}

impl FakeRemote {
    pub fn with_folders(folders: &[&str]) -> Self {
        let remote = Self::default();
        {
            let mut state = remote.state.lock().unwrap();
            state.folders = folders.iter().map(|f| f.to_string()).collect();
        }
        remote
    }

    /// Place a file directly into the fake server's state.
    pub fn put(&self, folder: &str, name: &str, content: &[u8]) {
        let mut state = self.state.lock().unwrap();
        state
            .files
            .insert((folder.to_string(), name.to_string()), content.to_vec());
    }

    pub fn folder_exists(&self, folder: &str) -> bool {
        self.state.lock().unwrap().folders.iter().any(|f| f == folder)
    }

    /// Number of sessions connected but not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.state.lock().unwrap().open_sessions
    }
}

/// Per-request client over a [`FakeRemote`].
///
/// Connect fails whenever the password contains `"bad"`, mirroring how the
/// real adapters surface any connect-phase failure as an auth error.
pub struct FakeRemoteClient {
    remote_host: RemoteHost,
    remote: FakeRemote,
    connected: bool,
}

impl FakeRemoteClient {
    pub fn new(remote_host: RemoteHost, remote: FakeRemote) -> Self {
        Self {
            remote_host,
            remote,
            connected: false,
        }
    }
}

impl RemoteClient for FakeRemoteClient {
    fn connect(&mut self) -> Result<(), AuthError> {
        if self.remote_host.password.contains("bad") {
            return Err(AuthError::Login(
                self.remote_host.endpoint(),
                "invalid password".into(),
            ));
        }
        self.connected = true;
        self.remote.state.lock().unwrap().open_sessions += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn list_files(
        &mut self,
        folder_path: &str,
        filter: &Filter,
    ) -> Option<Vec<FileSystemElement>> {
        let state = self.remote.state.lock().unwrap();
        if !state.folders.iter().any(|f| f == folder_path) {
            return None;
        }

        let mut elements = Vec::new();
        for ((folder, name), content) in &state.files {
            if folder == folder_path {
                elements.push(FileSystemElement::File(FileInfo {
                    name: name.clone(),
                    modified: chrono::DateTime::UNIX_EPOCH,
                    size: content.len() as u64,
                    folder_path: folder.clone(),
                }));
            }
        }
        for folder in &state.folders {
            if let Some(name) = folder.strip_prefix(&format!("{folder_path}/")) {
                if !name.contains('/') {
                    elements.push(FileSystemElement::Folder(FolderInfo {
                        name: name.to_string(),
                        modified: chrono::DateTime::UNIX_EPOCH,
                        folder_path: folder_path.to_string(),
                    }));
                }
            }
        }

        elements.retain(|e| filter.accept(e));
        Some(elements)
    }

    fn create_folder(&mut self, folder_path: &str) -> bool {
        let mut state = self.remote.state.lock().unwrap();
        if state.folders.iter().any(|f| f == folder_path) {
            return false;
        }
        state.folders.push(folder_path.to_string());
        true
    }

    fn delete_folder(&mut self, folder_path: &str) -> bool {
        let mut state = self.remote.state.lock().unwrap();
        let occupied = state.files.keys().any(|(folder, _)| folder == folder_path)
            || state
                .folders
                .iter()
                .any(|f| f.starts_with(&format!("{folder_path}/")));
        if occupied {
            return false;
        }
        let before = state.folders.len();
        state.folders.retain(|f| f != folder_path);
        state.folders.len() < before
    }

    fn retrieve_file(&mut self, folder_path: &str, file_name: &str) -> Option<Vec<u8>> {
        self.remote
            .state
            .lock()
            .unwrap()
            .files
            .get(&(folder_path.to_string(), file_name.to_string()))
            .cloned()
    }

    fn upload_file(&mut self, folder_path: &str, file_name: &str, content: &[u8]) -> bool {
        let mut state = self.remote.state.lock().unwrap();
        if !state.folders.iter().any(|f| f == folder_path) {
            return false;
        }
        state
            .files
            .insert((folder_path.to_string(), file_name.to_string()), content.to_vec());
        true
    }

    fn delete_file(&mut self, folder_path: &str, file_name: &str) -> bool {
        self.remote
            .state
            .lock()
            .unwrap()
            .files
            .remove(&(folder_path.to_string(), file_name.to_string()))
            .is_some()
    }

    fn rename_file(&mut self, folder_path: &str, old_name: &str, new_name: &str) -> bool {
        match self.retrieve_file(folder_path, old_name) {
            Some(content) => {
                self.delete_file(folder_path, old_name);
                self.upload_file(folder_path, new_name, &content)
            }
            None => false,
        }
    }

    fn close(&mut self) {
        if self.connected {
            self.connected = false;
            self.remote.state.lock().unwrap().open_sessions -= 1;
        }
    }
}
