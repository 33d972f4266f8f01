//! Dropbox HTTP API backend

use reqwest::blocking::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info};

use super::error::{StorageError, StorageResult};
use super::{ListOptions, StorageBackend};

/// Default base URL of the Dropbox RPC endpoints
pub const DROPBOX_API: &str = "https://api.dropboxapi.com/2";

/// Environment variable holding the access token
pub const TOKEN_ENV: &str = "DROPBOX_TOKEN";

/// One entry of a folder listing
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = ".tag", rename_all = "lowercase")]
pub enum Entry {
    File { path_display: String },
    Folder { path_display: String },
    Deleted { path_display: String },
}

/// A page of `files/list_folder` results
#[derive(Debug, Clone, Deserialize)]
pub struct ListFolderPage {
    pub entries: Vec<Entry>,
    pub cursor: String,
    pub has_more: bool,
}

/// Backend talking to a Dropbox account
pub struct DropboxBackend {
    client: Client,
    token: String,
    api: String,
}

impl DropboxBackend {
    /// Create a backend, checking that the token is accepted
    pub fn connect(token: impl Into<String>) -> StorageResult<Self> {
        let backend = Self::with_api(token, DROPBOX_API)?;
        backend.check_token()?;
        Ok(backend)
    }

    /// Create a backend against another API base URL, without any request
    pub fn with_api(token: impl Into<String>, api: impl Into<String>) -> StorageResult<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(StorageError::MissingToken(format!(
                "pass --token or set {}",
                TOKEN_ENV
            )));
        }
        Ok(Self {
            client: Client::new(),
            token,
            api: api.into().trim_end_matches('/').to_string(),
        })
    }

    fn post(&self, endpoint: &str, body: Option<Value>) -> StorageResult<Response> {
        let request = self
            .client
            .post(format!("{}/{}", self.api, endpoint))
            .bearer_auth(&self.token);
        let request = match body {
            Some(body) => request.json(&body),
            None => request,
        };
        let response = request.send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .text()
            .unwrap_or_else(|_| "Unable to read error message".to_string());
        if status.as_u16() == 401 {
            return Err(StorageError::Auth(body));
        }
        Err(StorageError::Api {
            status: status.as_u16(),
            body,
        })
    }

    fn call<T: DeserializeOwned>(&self, endpoint: &str, body: Value) -> StorageResult<T> {
        Ok(self.post(endpoint, Some(body))?.json()?)
    }

    /// Fail early on a rejected token
    pub fn check_token(&self) -> StorageResult<()> {
        self.post("users/get_current_account", None)?;
        debug!("access token is valid");
        Ok(())
    }

    fn list_folder(&self, root: &str, recursive: bool) -> StorageResult<Vec<Entry>> {
        let first: ListFolderPage = self.call(
            "files/list_folder",
            json!({ "path": api_path(root), "recursive": recursive }),
        )?;
        collect_pages(first, |cursor| {
            self.call("files/list_folder/continue", json!({ "cursor": cursor }))
        })
    }
}

/// Entries of `first` and of every page after it, fetched by cursor
pub fn collect_pages<F>(first: ListFolderPage, mut next: F) -> StorageResult<Vec<Entry>>
where
    F: FnMut(&str) -> StorageResult<ListFolderPage>,
{
    let mut page = first;
    let mut entries = std::mem::take(&mut page.entries);

    while page.has_more {
        page = next(&page.cursor)?;
        debug!(entries = page.entries.len(), "fetched next listing page");
        entries.append(&mut page.entries);
    }
    Ok(entries)
}

/// Dropbox names the account root `""`, not `/`
fn api_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Storage paths of a listing
///
/// Recursive listings keep files only; flat listings keep folders too.
pub fn listed_paths(entries: Vec<Entry>, root: &str, options: ListOptions<'_>) -> Vec<String> {
    entries
        .into_iter()
        .filter_map(|entry| match entry {
            Entry::File { path_display } => Some(path_display),
            Entry::Folder { path_display } if !options.recursive => Some(path_display),
            _ => None,
        })
        .map(|path| options.listed_path(path, root))
        .collect()
}

impl StorageBackend for DropboxBackend {
    fn list_paths(&self, root: &str, options: ListOptions<'_>) -> StorageResult<Vec<String>> {
        let entries = self.list_folder(root, options.recursive)?;
        let paths = listed_paths(entries, root, options);
        info!(root, count = paths.len(), "listed Dropbox files");
        Ok(paths)
    }

    fn copy(&self, from: &str, to: &str) -> StorageResult<()> {
        self.post(
            "files/copy_v2",
            Some(json!({ "from_path": api_path(from), "to_path": api_path(to) })),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_is_rejected() {
        let err = DropboxBackend::with_api("", DROPBOX_API).err().unwrap();
        assert!(matches!(err, StorageError::MissingToken(_)));
    }

    #[test]
    fn parses_listing_page() {
        let page: ListFolderPage = serde_json::from_str(
            r#"{
                "entries": [
                    {".tag": "folder", "path_display": "/source/study", "id": "id:1"},
                    {".tag": "file", "path_display": "/source/study/P01_mri_1.nii.gz", "size": 3},
                    {".tag": "deleted", "path_display": "/source/old.nii"}
                ],
                "cursor": "abc",
                "has_more": false
            }"#,
        )
        .unwrap();
        assert_eq!(page.entries.len(), 3);
        assert!(!page.has_more);

        let recursive = listed_paths(page.entries.clone(), "/source", ListOptions::default());
        assert_eq!(recursive, ["/study/P01_mri_1.nii.gz"]);

        let flat = ListOptions {
            recursive: false,
            strip_root: false,
            ..Default::default()
        };
        assert_eq!(
            listed_paths(page.entries, "/source", flat),
            ["/source/study", "/source/study/P01_mri_1.nii.gz"]
        );
    }

    #[test]
    fn displayed_casing_of_source_is_stripped() {
        let entries = vec![Entry::File {
            path_display: "/Source/study/P01_mri_1.nii".to_string(),
        }];
        assert_eq!(
            listed_paths(entries, "/source", ListOptions::default()),
            ["/study/P01_mri_1.nii"]
        );
    }

    #[test]
    fn subfolder_listing_keeps_source_relative_paths() {
        let entries = vec![Entry::File {
            path_display: "/source/study/tissues/P01_mri_5.nii.gz".to_string(),
        }];
        assert_eq!(
            listed_paths(entries, "/source/study/tissues", ListOptions::default()),
            ["/study/tissues/P01_mri_5.nii.gz"]
        );
    }

    fn page(paths: &[&str], cursor: &str, has_more: bool) -> ListFolderPage {
        ListFolderPage {
            entries: paths
                .iter()
                .map(|p| Entry::File {
                    path_display: p.to_string(),
                })
                .collect(),
            cursor: cursor.to_string(),
            has_more,
        }
    }

    #[test]
    fn follows_cursor_until_last_page() {
        let mut cursors = Vec::new();
        let mut rest = vec![
            page(&["/source/c.nii"], "c2", false),
            page(&["/source/b.nii"], "c1", true),
        ];

        let entries = collect_pages(page(&["/source/a.nii"], "c0", true), |cursor| {
            cursors.push(cursor.to_string());
            rest.pop().ok_or_else(|| StorageError::NotFound(cursor.to_string()))
        })
        .unwrap();

        assert_eq!(cursors, ["c0", "c1"]);
        assert_eq!(
            listed_paths(entries, "/source", ListOptions::default()),
            ["/a.nii", "/b.nii", "/c.nii"]
        );
    }

    #[test]
    fn failed_page_fails_the_listing() {
        let err = collect_pages(page(&["/source/a.nii"], "c0", true), |_| {
            Err(StorageError::Api {
                status: 409,
                body: "reset".to_string(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, StorageError::Api { status: 409, .. }));
    }

    #[test]
    fn api_paths() {
        assert_eq!(api_path("/"), "");
        assert_eq!(api_path("/source/"), "/source");
        assert_eq!(api_path("target/x"), "/target/x");
    }
}
