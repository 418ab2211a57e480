//! Command dispatch: one remote session per command, released on every path.

use http::StatusCode;
use tracing::warn;

use crate::client::{ClientFactory, RemoteClient};
use crate::model::{Command, FolderResponse, HttpResult, RemoteHost};

/// Executes one [`Command`] against a freshly built remote client.
///
/// The factory decides the protocol (FTP or SFTP) once at gateway startup;
/// the handler itself is protocol-agnostic. Every call is an independent
/// connect → operate → close cycle with no pooling and no retries.
pub struct CommandHandler {
    factory: ClientFactory,
}

impl CommandHandler {
    pub fn new(factory: ClientFactory) -> Self {
        Self { factory }
    }

    /// Open a session for `remote_host`, run `command`, and close the
    /// session regardless of the outcome.
    ///
    /// A connect failure short-circuits to 401 before any operation-specific
    /// mapping; everything else maps per command variant. Blocking: callers
    /// on an async runtime wrap this in `spawn_blocking`.
    pub fn handle(&self, remote_host: &RemoteHost, command: Command) -> HttpResult {
        let mut client = (self.factory)(remote_host);

        if let Err(e) = client.connect() {
            warn!("connect failed for {}: {e}", remote_host.endpoint());
            client.close();
            return HttpResult::text(StatusCode::UNAUTHORIZED, e.to_string());
        }

        let result = Self::execute(client.as_mut(), command);
        client.close();
        result
    }

    fn execute(client: &mut dyn RemoteClient, command: Command) -> HttpResult {
        match command {
            Command::RetrieveFolder { path, filter } => {
                match client.list_files(&path, &filter) {
                    Some(elements) => {
                        let response: FolderResponse = elements.into_iter().collect();
                        HttpResult::json(
                            StatusCode::OK,
                            serde_json::to_value(response).unwrap(),
                        )
                    }
                    None => HttpResult::text(StatusCode::NOT_FOUND, ""),
                }
            }
            Command::CreateFolder { path } => {
                if client.create_folder(&path) {
                    HttpResult::text(StatusCode::OK, format!("created folder: {path}"))
                } else {
                    HttpResult::text(
                        StatusCode::NOT_FOUND,
                        format!("impossible to create folder: {path}"),
                    )
                }
            }
            Command::DeleteFolder { path } => {
                if client.delete_folder(&path) {
                    HttpResult::text(StatusCode::OK, format!("deleted folder: {path}"))
                } else {
                    HttpResult::text(
                        StatusCode::NOT_FOUND,
                        format!("impossible to delete folder: {path}"),
                    )
                }
            }
            Command::RetrieveFile { path, file_name } => {
                match client.retrieve_file(&path, &file_name) {
                    Some(content) => HttpResult::binary(StatusCode::OK, content),
                    None => HttpResult::text(StatusCode::NOT_FOUND, ""),
                }
            }
            Command::UploadFile {
                path,
                file_name,
                content,
            } => {
                if client.upload_file(&path, &file_name, &content) {
                    HttpResult::text(StatusCode::OK, format!("uploaded: {path}/{file_name}"))
                } else {
                    HttpResult::text(
                        StatusCode::BAD_REQUEST,
                        format!("could not upload: {path}/{file_name}"),
                    )
                }
            }
            Command::DeleteFile { path, file_name } => {
                if client.delete_file(&path, &file_name) {
                    HttpResult::text(StatusCode::OK, format!("deleted: {path}/{file_name}"))
                } else {
                    HttpResult::text(
                        StatusCode::NOT_FOUND,
                        format!("impossible to delete: {path}/{file_name}"),
                    )
                }
            }
            Command::RenameFile {
                path,
                old_name,
                new_name,
            } => {
                if client.rename_file(&path, &old_name, &new_name) {
                    HttpResult::text(
                        StatusCode::OK,
                        format!("renamed: {path}/{old_name} to {new_name}"),
                    )
                } else {
                    HttpResult::text(
                        StatusCode::BAD_REQUEST,
                        format!("could not rename: {path}/{old_name}"),
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Filter;
    use crate::model::ResponseBody;
    use crate::testing::{FakeRemote, FakeRemoteClient};

    fn host(password: &str) -> RemoteHost {
        RemoteHost {
            host: "server".into(),
            port: 22,
            username: "user".into(),
            password: password.into(),
        }
    }

    fn handler_for(remote: &FakeRemote) -> CommandHandler {
        let remote = remote.clone();
        let factory: ClientFactory = std::sync::Arc::new(move |host: &RemoteHost| {
            Box::new(FakeRemoteClient::new(host.clone(), remote.clone()))
                as Box<dyn RemoteClient>
        });
        CommandHandler::new(factory)
    }

    fn body_text(result: &HttpResult) -> &str {
        match &result.body {
            ResponseBody::Text(s) => s,
            other => panic!("expected text body, got {other:?}"),
        }
    }

    // ── Folder commands ─────────────────────────────────────────────

    #[test]
    fn retrieve_folder_returns_json_listing() {
        let remote = FakeRemote::with_folders(&["folder1"]);
        remote.put("folder1", "file1", b"<xml/>");

        let result = handler_for(&remote).handle(
            &host("pwd"),
            Command::RetrieveFolder {
                path: "folder1".into(),
                filter: Filter::all(),
            },
        );

        assert_eq!(result.status, StatusCode::OK);
        let ResponseBody::Json(json) = &result.body else {
            panic!("expected json body");
        };
        assert_eq!(json["files"][0]["name"], "file1");
        assert_eq!(json["folders"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn retrieve_folder_applies_filter() {
        let remote = FakeRemote::with_folders(&["folder1"]);
        remote.put("folder1", "test.xml", b"a");
        remote.put("folder1", "test.xml.bak", b"b");

        let result = handler_for(&remote).handle(
            &host("pwd"),
            Command::RetrieveFolder {
                path: "folder1".into(),
                filter: Filter::from_glob("*.xml"),
            },
        );

        let ResponseBody::Json(json) = &result.body else {
            panic!("expected json body");
        };
        let files = json["files"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["name"], "test.xml");
    }

    #[test]
    fn retrieve_missing_folder_is_404() {
        let remote = FakeRemote::with_folders(&["folder1"]);
        let result = handler_for(&remote).handle(
            &host("pwd"),
            Command::RetrieveFolder {
                path: "folder3".into(),
                filter: Filter::all(),
            },
        );
        assert_eq!(result.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn retrieve_empty_folder_is_200_with_empty_listing() {
        let remote = FakeRemote::with_folders(&["empty"]);
        let result = handler_for(&remote).handle(
            &host("pwd"),
            Command::RetrieveFolder {
                path: "empty".into(),
                filter: Filter::all(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
        let ResponseBody::Json(json) = &result.body else {
            panic!("expected json body");
        };
        assert_eq!(json["files"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn create_folder_succeeds_then_conflicts() {
        let remote = FakeRemote::with_folders(&[]);
        let handler = handler_for(&remote);

        let result = handler.handle(
            &host("pwd"),
            Command::CreateFolder {
                path: "upload/new".into(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(body_text(&result), "created folder: upload/new");

        let result = handler.handle(
            &host("pwd"),
            Command::CreateFolder {
                path: "upload/new".into(),
            },
        );
        assert_eq!(result.status, StatusCode::NOT_FOUND);
        assert_eq!(body_text(&result), "impossible to create folder: upload/new");
    }

    #[test]
    fn delete_folder_succeeds_then_misses() {
        let remote = FakeRemote::with_folders(&["upload/new"]);
        let handler = handler_for(&remote);

        let result = handler.handle(
            &host("pwd"),
            Command::DeleteFolder {
                path: "upload/new".into(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(body_text(&result), "deleted folder: upload/new");

        let result = handler.handle(
            &host("pwd"),
            Command::DeleteFolder {
                path: "upload/new".into(),
            },
        );
        assert_eq!(result.status, StatusCode::NOT_FOUND);
    }

    // ── File commands ───────────────────────────────────────────────

    #[test]
    fn upload_then_retrieve_round_trips() {
        let remote = FakeRemote::with_folders(&["upload"]);
        let handler = handler_for(&remote);

        let result = handler.handle(
            &host("pwd"),
            Command::UploadFile {
                path: "upload".into(),
                file_name: "report.txt".into(),
                content: b"hello".to_vec(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(body_text(&result), "uploaded: upload/report.txt");

        let result = handler.handle(
            &host("pwd"),
            Command::RetrieveFile {
                path: "upload".into(),
                file_name: "report.txt".into(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
        let ResponseBody::Binary(content) = &result.body else {
            panic!("expected binary body");
        };
        assert_eq!(content, b"hello");
    }

    #[test]
    fn second_upload_overwrites() {
        let remote = FakeRemote::with_folders(&["upload"]);
        let handler = handler_for(&remote);

        for content in [b"hello".to_vec(), b"hello2".to_vec()] {
            let result = handler.handle(
                &host("pwd"),
                Command::UploadFile {
                    path: "upload".into(),
                    file_name: "report.txt".into(),
                    content,
                },
            );
            assert_eq!(result.status, StatusCode::OK);
        }

        let result = handler.handle(
            &host("pwd"),
            Command::RetrieveFile {
                path: "upload".into(),
                file_name: "report.txt".into(),
            },
        );
        let ResponseBody::Binary(content) = &result.body else {
            panic!("expected binary body");
        };
        assert_eq!(content, b"hello2");
    }

    #[test]
    fn upload_to_missing_folder_is_400() {
        let remote = FakeRemote::with_folders(&[]);
        let result = handler_for(&remote).handle(
            &host("pwd"),
            Command::UploadFile {
                path: "nowhere".into(),
                file_name: "report.txt".into(),
                content: b"hello".to_vec(),
            },
        );
        assert_eq!(result.status, StatusCode::BAD_REQUEST);
        assert_eq!(body_text(&result), "could not upload: nowhere/report.txt");
    }

    #[test]
    fn delete_file_then_retrieve_is_404() {
        let remote = FakeRemote::with_folders(&["upload"]);
        remote.put("upload", "report.txt", b"hello");
        let handler = handler_for(&remote);

        let result = handler.handle(
            &host("pwd"),
            Command::DeleteFile {
                path: "upload".into(),
                file_name: "report.txt".into(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(body_text(&result), "deleted: upload/report.txt");

        let result = handler.handle(
            &host("pwd"),
            Command::RetrieveFile {
                path: "upload".into(),
                file_name: "report.txt".into(),
            },
        );
        assert_eq!(result.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn delete_missing_file_is_404() {
        let remote = FakeRemote::with_folders(&["upload"]);
        let result = handler_for(&remote).handle(
            &host("pwd"),
            Command::DeleteFile {
                path: "upload".into(),
                file_name: "ghost.txt".into(),
            },
        );
        assert_eq!(result.status, StatusCode::NOT_FOUND);
        assert_eq!(body_text(&result), "impossible to delete: upload/ghost.txt");
    }

    #[test]
    fn rename_file_moves_content() {
        let remote = FakeRemote::with_folders(&["upload"]);
        remote.put("upload", "old.txt", b"hello");
        let handler = handler_for(&remote);

        let result = handler.handle(
            &host("pwd"),
            Command::RenameFile {
                path: "upload".into(),
                old_name: "old.txt".into(),
                new_name: "new.txt".into(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(body_text(&result), "renamed: upload/old.txt to new.txt");

        let result = handler.handle(
            &host("pwd"),
            Command::RetrieveFile {
                path: "upload".into(),
                file_name: "new.txt".into(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
    }

    #[test]
    fn rename_missing_source_is_400() {
        let remote = FakeRemote::with_folders(&["upload"]);
        let result = handler_for(&remote).handle(
            &host("pwd"),
            Command::RenameFile {
                path: "upload".into(),
                old_name: "ghost.txt".into(),
                new_name: "new.txt".into(),
            },
        );
        assert_eq!(result.status, StatusCode::BAD_REQUEST);
    }

    // ── Session discipline ──────────────────────────────────────────

    #[test]
    fn bad_password_is_401_for_every_command() {
        let remote = FakeRemote::with_folders(&["folder1"]);
        let handler = handler_for(&remote);

        let commands = [
            Command::RetrieveFolder {
                path: "folder1".into(),
                filter: Filter::all(),
            },
            Command::CreateFolder {
                path: "x".into(),
            },
            Command::DeleteFolder {
                path: "folder1".into(),
            },
            Command::RetrieveFile {
                path: "folder1".into(),
                file_name: "f".into(),
            },
            Command::UploadFile {
                path: "folder1".into(),
                file_name: "f".into(),
                content: vec![],
            },
            Command::DeleteFile {
                path: "folder1".into(),
                file_name: "f".into(),
            },
            Command::RenameFile {
                path: "folder1".into(),
                old_name: "a".into(),
                new_name: "b".into(),
            },
        ];

        for command in commands {
            let result = handler.handle(&host("bad-password"), command);
            assert_eq!(result.status, StatusCode::UNAUTHORIZED);
        }
        // Auth failure must not touch the remote state.
        assert!(remote.folder_exists("folder1"));
    }

    // ── Full gateway flow ───────────────────────────────────────────

    #[test]
    fn full_file_lifecycle() {
        let remote = FakeRemote::with_folders(&["upload"]);
        let handler = handler_for(&remote);
        let host = host("pwd");

        let upload = |content: &[u8]| Command::UploadFile {
            path: "upload".into(),
            file_name: "report.txt".into(),
            content: content.to_vec(),
        };
        let retrieve = || Command::RetrieveFile {
            path: "upload".into(),
            file_name: "report.txt".into(),
        };

        // 1. Upload, then read back.
        assert_eq!(handler.handle(&host, upload(b"hello")).status, StatusCode::OK);
        let result = handler.handle(&host, retrieve());
        assert_eq!(result.status, StatusCode::OK);
        let ResponseBody::Binary(content) = &result.body else {
            panic!("expected binary body");
        };
        assert_eq!(content, b"hello");

        // 2. Overwrite, then read back the new content.
        assert_eq!(handler.handle(&host, upload(b"hello2")).status, StatusCode::OK);
        let result = handler.handle(&host, retrieve());
        let ResponseBody::Binary(content) = &result.body else {
            panic!("expected binary body");
        };
        assert_eq!(content, b"hello2");

        // 3. Delete, then a retrieve misses.
        let result = handler.handle(
            &host,
            Command::DeleteFile {
                path: "upload".into(),
                file_name: "report.txt".into(),
            },
        );
        assert_eq!(result.status, StatusCode::OK);
        assert_eq!(handler.handle(&host, retrieve()).status, StatusCode::NOT_FOUND);

        // No session left behind anywhere along the way.
        assert_eq!(remote.open_sessions(), 0);
    }

    #[test]
    fn session_is_closed_after_success_and_failure() {
        let remote = FakeRemote::with_folders(&["folder1"]);
        let handler = handler_for(&remote);

        handler.handle(
            &host("pwd"),
            Command::CreateFolder {
                path: "folder2".into(),
            },
        );
        assert_eq!(remote.open_sessions(), 0);

        handler.handle(
            &host("pwd"),
            Command::DeleteFile {
                path: "folder1".into(),
                file_name: "ghost".into(),
            },
        );
        assert_eq!(remote.open_sessions(), 0);

        handler.handle(
            &host("bad-password"),
            Command::CreateFolder {
                path: "folder3".into(),
            },
        );
        assert_eq!(remote.open_sessions(), 0);
    }
}
