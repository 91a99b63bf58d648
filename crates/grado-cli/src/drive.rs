//! Google Drive downloads for form attachments.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use indicatif::ProgressBar;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use grado_core::models::config::DownloadConfig;
use grado_core::{DocumentSlot, DownloadedFile};

/// Bytes inspected when looking for an HTML error page.
const ERROR_PAGE_PEEK: usize = 500;

/// Anything smaller is not a real document.
const MIN_DOWNLOAD_SIZE: u64 = 1000;

const DRIVE_API: &str = "https://www.googleapis.com/drive/v3/files";

lazy_static! {
    static ref FILE_ID_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"/file/d/([^/?#]+)").unwrap(),
        Regex::new(r"[?&]id=([^&#]+)").unwrap(),
        Regex::new(r"/d/([^/?#]+)").unwrap(),
    ];
}

/// Why a download failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadErrorKind {
    /// No file ID could be found in the URL.
    InvalidUrl,
    /// The host refused access (HTTP 403).
    PermissionDenied,
    /// The file does not exist (HTTP 404).
    NotFound,
    /// The host answered with an HTML page instead of the file.
    ErrorPage,
    /// The payload is too small to be a document.
    TooSmall,
    /// Network, HTTP or local write failure.
    Transport,
    /// The form carries no Drive URL at all.
    NoDocuments,
}

/// A failed download, tagged where it happened.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DownloadError {
    kind: DownloadErrorKind,
    message: String,
}

impl DownloadError {
    pub fn new(kind: DownloadErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> DownloadErrorKind {
        self.kind
    }
}

impl From<reqwest::Error> for DownloadError {
    fn from(e: reqwest::Error) -> Self {
        DownloadError::new(DownloadErrorKind::Transport, e.to_string())
    }
}

impl From<std::io::Error> for DownloadError {
    fn from(e: std::io::Error) -> Self {
        DownloadError::new(DownloadErrorKind::Transport, e.to_string())
    }
}

/// Extract the Drive file ID from a share or download URL.
pub fn extract_file_id(url: &str) -> Result<String, DownloadError> {
    FILE_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(url))
        .map(|caps| caps[1].to_string())
        .ok_or_else(|| {
            DownloadError::new(
                DownloadErrorKind::InvalidUrl,
                format!("cannot extract a file ID from {}", url),
            )
        })
}

/// Whether a response is a Drive interstitial rather than file content.
pub fn is_error_page(content_type: Option<&str>, head: &[u8]) -> bool {
    if content_type.is_some_and(|ct| ct.contains("text/html")) {
        return true;
    }
    let head = String::from_utf8_lossy(&head[..head.len().min(ERROR_PAGE_PEEK)]);
    head.contains("<!DOCTYPE") || head.contains("<html")
}

#[derive(Deserialize)]
struct DriveMetadata {
    name: Option<String>,
}

/// Downloads Drive files into a working directory.
pub struct DriveClient {
    client: reqwest::Client,
    access_token: Option<String>,
    dir: PathBuf,
}

impl DriveClient {
    /// Create a client writing into `dir`. A bearer token is read from the
    /// configured environment variable when present.
    pub fn new(config: &DownloadConfig, dir: &Path) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let access_token = std::env::var(&config.access_token_env)
            .ok()
            .filter(|token| !token.trim().is_empty());
        if access_token.is_none() {
            debug!("{} not set, using public download URLs", config.access_token_env);
        }

        Ok(Self {
            client,
            access_token,
            dir: dir.to_path_buf(),
        })
    }

    /// Download one attachment URL.
    pub async fn download(&self, url: &str) -> Result<DownloadedFile, DownloadError> {
        let file_id = extract_file_id(url)?;

        let auth_error = match &self.access_token {
            Some(token) => match self.download_authenticated(&file_id, token).await {
                Ok((path, file_name)) => return Ok(downloaded(url, path, file_name)),
                Err(e) => {
                    warn!("Authenticated download of {} failed: {}", file_id, e);
                    Some(e)
                }
            },
            None => None,
        };

        // Public URLs do not report a file name.
        match self.download_public(&file_id).await {
            Ok(path) => Ok(downloaded(url, path, String::new())),
            // An auth-side refusal says more than a public-URL failure.
            Err(public_error) => Err(auth_error.unwrap_or(public_error)),
        }
    }

    async fn download_authenticated(
        &self,
        file_id: &str,
        token: &str,
    ) -> Result<(PathBuf, String), DownloadError> {
        let metadata_url = format!("{}/{}?fields=name,mimeType,size", DRIVE_API, file_id);
        let response = self.client.get(&metadata_url).bearer_auth(token).send().await?;
        let response = check_status(response, file_id)?;
        let metadata: DriveMetadata = serde_json::from_slice(&response.bytes().await?)
            .map_err(|e| DownloadError::new(DownloadErrorKind::Transport, e.to_string()))?;

        let file_name = metadata
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_default();

        let media_url = format!("{}/{}?alt=media", DRIVE_API, file_id);
        let response = self.client.get(&media_url).bearer_auth(token).send().await?;
        let response = check_status(response, file_id)?;

        let path = self.target_path(file_id, &file_name);
        let (size, _) = write_body(response, &path).await?;
        info!("Downloaded {} ({} bytes, authenticated)", path.display(), size);

        Ok((path, file_name))
    }

    async fn download_public(&self, file_id: &str) -> Result<PathBuf, DownloadError> {
        let urls = [
            format!(
                "https://drive.google.com/uc?export=download&id={}&confirm=t",
                file_id
            ),
            format!(
                "https://drive.google.com/u/0/uc?id={}&export=download&confirm=t",
                file_id
            ),
        ];
        let path = self.target_path(file_id, "");
        let mut last_error = None;

        for (index, url) in urls.iter().enumerate() {
            debug!("Trying public URL {} for {}", index + 1, file_id);

            match self.fetch_public(url, &path).await {
                Ok(size) => {
                    info!("Downloaded {} ({} bytes)", file_id, size);
                    return Ok(path);
                }
                Err(e) => {
                    debug!("Public URL {} failed: {}", index + 1, e);
                    let _ = fs::remove_file(&path);
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DownloadError::new(DownloadErrorKind::Transport, "all download URLs failed")
        }))
    }

    async fn fetch_public(&self, url: &str, path: &Path) -> Result<u64, DownloadError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(DownloadError::new(
                DownloadErrorKind::Transport,
                format!("HTTP {}", response.status()),
            ));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let (size, head) = write_body(response, path).await?;

        if is_error_page(content_type.as_deref(), &head) {
            return Err(DownloadError::new(
                DownloadErrorKind::ErrorPage,
                "Drive returned an HTML page instead of the file",
            ));
        }
        if size < MIN_DOWNLOAD_SIZE {
            return Err(DownloadError::new(
                DownloadErrorKind::TooSmall,
                format!("downloaded file is only {} bytes", size),
            ));
        }
        Ok(size)
    }

    /// Local path for a download. Files without a reported name are stored
    /// as `{file_id}.pdf`.
    fn target_path(&self, file_id: &str, file_name: &str) -> PathBuf {
        if file_name.is_empty() {
            return self.dir.join(format!("{}.pdf", file_id));
        }
        let safe_name: String = file_name
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':') { '_' } else { c })
            .collect();
        self.dir.join(format!("{}-{}", file_id, safe_name))
    }
}

fn check_status(
    response: reqwest::Response,
    file_id: &str,
) -> Result<reqwest::Response, DownloadError> {
    let status = response.status();
    match status.as_u16() {
        403 => Err(DownloadError::new(
            DownloadErrorKind::PermissionDenied,
            format!("no permission to access file {}", file_id),
        )),
        404 => Err(DownloadError::new(
            DownloadErrorKind::NotFound,
            format!("file {} does not exist or is not shared", file_id),
        )),
        _ if !status.is_success() => Err(DownloadError::new(
            DownloadErrorKind::Transport,
            format!("HTTP {} for file {}", status, file_id),
        )),
        _ => Ok(response),
    }
}

/// Stream a response body to `path`, returning its size and leading bytes.
async fn write_body(
    response: reqwest::Response,
    path: &Path,
) -> Result<(u64, Vec<u8>), DownloadError> {
    let mut file = File::create(path)?;
    let mut stream = response.bytes_stream();
    let mut head = Vec::with_capacity(ERROR_PAGE_PEEK);
    let mut size: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if head.len() < ERROR_PAGE_PEEK {
            let take = (ERROR_PAGE_PEEK - head.len()).min(chunk.len());
            head.extend_from_slice(&chunk[..take]);
        }
        file.write_all(&chunk)?;
        size += chunk.len() as u64;
    }

    file.flush()?;
    Ok((size, head))
}

fn downloaded(url: &str, path: PathBuf, file_name: String) -> DownloadedFile {
    let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    DownloadedFile {
        path,
        original_url: url.to_string(),
        file_name,
        size,
    }
}

/// Outcome of downloading every attachment of a form.
#[derive(Debug, Default)]
pub struct DownloadBatch {
    pub files: Vec<DownloadedFile>,
    pub failures: Vec<(DocumentSlot, DownloadError)>,
}

impl DownloadBatch {
    /// The downloaded files, or an error when none could be obtained.
    pub fn into_files(self) -> Result<Vec<DownloadedFile>, DownloadError> {
        if !self.files.is_empty() {
            return Ok(self.files);
        }
        if self.failures.is_empty() {
            return Err(DownloadError::new(
                DownloadErrorKind::NoDocuments,
                "No document URLs found",
            ));
        }

        let permission = self
            .failures
            .iter()
            .any(|(_, e)| e.kind() == DownloadErrorKind::PermissionDenied);

        if permission {
            Err(DownloadError::new(
                DownloadErrorKind::PermissionDenied,
                format!(
                    "{} file(s) could not be accessed; share them or provide a Drive token",
                    self.failures.len()
                ),
            ))
        } else {
            Err(DownloadError::new(
                DownloadErrorKind::Transport,
                format!("none of the {} file(s) could be downloaded", self.failures.len()),
            ))
        }
    }
}

/// Download every slot URL in order, collecting failures.
pub async fn download_all(
    client: &DriveClient,
    urls: &BTreeMap<DocumentSlot, String>,
    pb: &ProgressBar,
) -> DownloadBatch {
    let mut batch = DownloadBatch::default();

    for (slot, url) in urls {
        pb.set_message(format!("Downloading {}", slot));
        match client.download(url).await {
            Ok(file) => batch.files.push(file),
            Err(e) => {
                warn!("{}: download failed ({:?}): {}", slot, e.kind(), e);
                batch.failures.push((*slot, e));
            }
        }
        pb.inc(1);
    }

    batch
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_file_id() {
        assert_eq!(
            extract_file_id("https://drive.google.com/file/d/1AbC_d-E/view?usp=sharing").unwrap(),
            "1AbC_d-E"
        );
        assert_eq!(
            extract_file_id("https://drive.google.com/open?id=XYZ123&authuser=0").unwrap(),
            "XYZ123"
        );
        assert_eq!(
            extract_file_id("https://docs.google.com/document/d/DOC42/edit").unwrap(),
            "DOC42"
        );
    }

    #[test]
    fn test_extract_file_id_rejects_other_urls() {
        let error = extract_file_id("https://drive.google.com/drive/folders").unwrap_err();
        assert_eq!(error.kind(), DownloadErrorKind::InvalidUrl);
    }

    #[test]
    fn test_error_page_detection() {
        assert!(is_error_page(Some("text/html; charset=utf-8"), b"%PDF-1.4"));
        assert!(is_error_page(None, b"\n<!DOCTYPE html><html>"));
        assert!(is_error_page(Some("application/octet-stream"), b"  <html lang=\"en\">"));
        assert!(!is_error_page(Some("application/pdf"), b"%PDF-1.7\n%\xE2\xE3"));
    }

    #[test]
    fn test_target_path_is_flat() {
        let dir = tempfile::tempdir().unwrap();
        let client = DriveClient::new(&DownloadConfig::default(), dir.path()).unwrap();
        let path = client.target_path("abc", "../informe/final.pdf");

        assert_eq!(path.parent(), Some(dir.path()));
        assert_eq!(path.file_name().unwrap(), "abc-.._informe_final.pdf");
    }

    #[test]
    fn test_batch_with_permission_failure() {
        let batch = DownloadBatch {
            files: Vec::new(),
            failures: vec![
                (
                    DocumentSlot::IdentityCard,
                    DownloadError::new(DownloadErrorKind::ErrorPage, "html"),
                ),
                (
                    DocumentSlot::FeeReceipt,
                    DownloadError::new(DownloadErrorKind::PermissionDenied, "denied"),
                ),
            ],
        };
        let error = batch.into_files().unwrap_err();
        assert_eq!(error.kind(), DownloadErrorKind::PermissionDenied);
    }

    #[test]
    fn test_batch_with_generic_failures() {
        let batch = DownloadBatch {
            files: Vec::new(),
            failures: vec![(
                DocumentSlot::CompetencyExam,
                DownloadError::new(DownloadErrorKind::NotFound, "gone"),
            )],
        };
        assert_eq!(batch.into_files().unwrap_err().kind(), DownloadErrorKind::Transport);
    }

    #[test]
    fn test_batch_partial_success_is_ok() {
        let batch = DownloadBatch {
            files: vec![DownloadedFile {
                path: PathBuf::from("/tmp/a.pdf"),
                original_url: "https://drive.google.com/file/d/a/view".to_string(),
                file_name: "a.pdf".to_string(),
                size: 4_000,
            }],
            failures: vec![(
                DocumentSlot::FeeReceipt,
                DownloadError::new(DownloadErrorKind::PermissionDenied, "denied"),
            )],
        };
        assert_eq!(batch.into_files().unwrap().len(), 1);
    }

    #[test]
    fn test_empty_batch_is_an_error() {
        let error = DownloadBatch::default().into_files().unwrap_err();
        assert_eq!(error.kind(), DownloadErrorKind::NoDocuments);
        assert_eq!(error.to_string(), "No document URLs found");
    }

    #[test]
    fn test_unnamed_download_keeps_empty_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let client = DriveClient::new(&DownloadConfig::default(), dir.path()).unwrap();
        let path = client.target_path("1xCUNq9_2024_aZ", "");
        std::fs::write(&path, b"%PDF-1.4\n").unwrap();

        assert_eq!(path.file_name().unwrap(), "1xCUNq9_2024_aZ.pdf");
        let file = downloaded("https://drive.google.com/file/d/1xCUNq9_2024_aZ/view", path, String::new());
        assert_eq!(file.file_name, "");
        assert_eq!(file.size, 9);
    }
}
