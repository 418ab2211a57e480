//! Data model shared between the HTTP layer and the remote clients.

use chrono::{DateTime, Utc};
use http::StatusCode;
use serde::Serialize;

/// Connection coordinates for one request's remote session.
///
/// Built from request credentials, used once, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteHost {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

impl RemoteHost {
    /// `user@host:port`, for log lines. The password never appears.
    pub fn endpoint(&self) -> String {
        format!("{}@{}:{}", self.username, self.host, self.port)
    }
}

/// One logical file-system operation, decoupled from HTTP.
///
/// Constructed once per request from the parsed path segments and consumed
/// exactly once by the command handler.
#[derive(Debug)]
pub enum Command {
    RetrieveFolder {
        path: String,
        filter: crate::filter::Filter,
    },
    CreateFolder {
        path: String,
    },
    DeleteFolder {
        path: String,
    },
    RetrieveFile {
        path: String,
        file_name: String,
    },
    UploadFile {
        path: String,
        file_name: String,
        content: Vec<u8>,
    },
    DeleteFile {
        path: String,
        file_name: String,
    },
    RenameFile {
        path: String,
        old_name: String,
        new_name: String,
    },
}

/// A regular file returned by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileInfo {
    pub name: String,
    pub modified: DateTime<Utc>,
    pub size: u64,
    pub folder_path: String,
}

/// A sub-folder returned by a folder listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderInfo {
    pub name: String,
    pub modified: DateTime<Utc>,
    pub folder_path: String,
}

/// One directory entry: either a file or a folder, with metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileSystemElement {
    File(FileInfo),
    Folder(FolderInfo),
}

impl FileSystemElement {
    pub fn name(&self) -> &str {
        match self {
            Self::File(f) => &f.name,
            Self::Folder(f) => &f.name,
        }
    }
}

/// Listing body: folders and files split into separate arrays.
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub folders: Vec<FolderInfo>,
    pub files: Vec<FileInfo>,
}

impl FromIterator<FileSystemElement> for FolderResponse {
    fn from_iter<I: IntoIterator<Item = FileSystemElement>>(iter: I) -> Self {
        let mut folders = Vec::new();
        let mut files = Vec::new();
        for element in iter {
            match element {
                FileSystemElement::Folder(f) => folders.push(f),
                FileSystemElement::File(f) => files.push(f),
            }
        }
        Self { folders, files }
    }
}

/// Protocol-neutral outcome of one command, rendered by the HTTP layer.
#[derive(Debug)]
pub struct HttpResult {
    pub status: StatusCode,
    pub body: ResponseBody,
}

#[derive(Debug)]
pub enum ResponseBody {
    Text(String),
    Binary(Vec<u8>),
    Json(serde_json::Value),
}

impl HttpResult {
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: ResponseBody::Text(body.into()),
        }
    }

    pub fn binary(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            status,
            body: ResponseBody::Binary(body),
        }
    }

    pub fn json(status: StatusCode, body: serde_json::Value) -> Self {
        Self {
            status,
            body: ResponseBody::Json(body),
        }
    }
}
