//! Dropbox client: folder listing, share links and downloads for the
//! newsletter folder layout.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::Config;
use crate::contract::{NewsletterStore, PdfAsset, ProviderError};
use crate::http::read_body;

pub const API_BASE_URL: &str = "https://api.dropboxapi.com";
pub const CONTENT_BASE_URL: &str = "https://content.dropboxapi.com";

/// The web-ready newsletter export always carries this suffix.
const PDF_SUFFIX: &str = "_Web.pdf";
/// The notes document is named after its author.
const NOTES_MARKER: &str = "ted";
const NOTES_EXTENSION: &str = ".docx";

/// One entry from a folder listing.
#[derive(Debug, Clone, Deserialize)]
pub struct FolderEntry {
    #[serde(rename = ".tag", default)]
    pub tag: String,
    pub name: String,
    #[serde(default)]
    pub path_lower: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl FolderEntry {
    pub fn is_folder(&self) -> bool {
        self.tag == "folder"
    }
}

#[derive(Debug, Deserialize)]
struct ListFolderResponse {
    #[serde(default)]
    entries: Vec<FolderEntry>,
}

#[derive(Debug, Deserialize)]
struct SharedLink {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ListSharedLinksResponse {
    #[serde(default)]
    links: Vec<SharedLink>,
}

/// Account details, used by the connectivity check.
#[derive(Debug, Deserialize)]
pub struct AccountInfo {
    pub name: AccountName,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountName {
    pub display_name: String,
}

/// Folder path for a given month's newsletter assets.
pub fn newsletter_folder(month: &str, year: i32) -> String {
    format!("/Newsletter/Monthly Newsletters/{year} Newsletter/{month}")
}

/// First entry that looks like the web-ready newsletter PDF.
pub fn select_newsletter_pdf(entries: &[FolderEntry]) -> Option<&FolderEntry> {
    entries.iter().find(|e| e.name.ends_with(PDF_SUFFIX))
}

/// First entry that looks like the notes document. The author marker is
/// matched case-insensitively; the extension is not.
pub fn select_notes_doc(entries: &[FolderEntry]) -> Option<&FolderEntry> {
    entries
        .iter()
        .find(|e| e.name.to_lowercase().contains(NOTES_MARKER) && e.name.ends_with(NOTES_EXTENSION))
}

/// Converts a web-viewer share URL into its direct-download form.
pub fn direct_download_url(share_url: &str) -> String {
    share_url
        .replace("dl=0", "dl=1")
        .replace("www.dropbox.com", "dl.dropboxusercontent.com")
}

pub struct DropboxClient {
    http: Client,
    access_token: String,
    api_base: String,
    content_base: String,
}

impl DropboxClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_urls(config, API_BASE_URL, CONTENT_BASE_URL)
    }

    /// Base URLs are injectable so tests can point at a local server.
    pub fn with_base_urls(config: &Config, api_base: &str, content_base: &str) -> Self {
        DropboxClient {
            http: Client::new(),
            access_token: config.dropbox_access_token.clone(),
            api_base: api_base.trim_end_matches('/').to_string(),
            content_base: content_base.trim_end_matches('/').to_string(),
        }
    }

    /// Who owns the token. Used by the `check dropbox` command.
    pub async fn current_account(&self) -> Result<AccountInfo, ProviderError> {
        let url = format!("{}/2/users/get_current_account", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, "Dropbox account lookup failed: {body}");
            return Err(format!("Dropbox account lookup failed: {status} - {body}").into());
        }
        Ok(response.json().await?)
    }

    /// Raw folder listing, also used by the `check dropbox` command.
    pub async fn list_folder(&self, path: &str) -> Result<Vec<FolderEntry>, ProviderError> {
        let url = format!("{}/2/files/list_folder", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "path": path }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, path, "Dropbox list_folder failed: {body}");
            return Err(format!("Dropbox list_folder failed: {status} - {body}").into());
        }
        let parsed: ListFolderResponse = response.json().await?;
        Ok(parsed.entries)
    }

    async fn existing_share_link(&self, path: &str) -> Result<Option<String>, ProviderError> {
        let url = format!("{}/2/sharing/list_shared_links", self.api_base);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({ "path": path }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, path, "Dropbox list_shared_links failed: {body}");
            return Err(format!("Dropbox list_shared_links failed: {status} - {body}").into());
        }
        let parsed: ListSharedLinksResponse = response.json().await?;
        Ok(parsed.links.first().map(|link| direct_download_url(&link.url)))
    }
}

#[async_trait]
impl NewsletterStore for DropboxClient {
    async fn find_newsletter_pdf(
        &self,
        month: &str,
        year: i32,
    ) -> Result<Option<PdfAsset>, ProviderError> {
        let folder = newsletter_folder(month, year);
        info!(folder = %folder, "Looking for newsletter PDF");
        let entries = self.list_folder(&folder).await?;
        match select_newsletter_pdf(&entries) {
            Some(entry) => {
                info!(name = %entry.name, "Found newsletter PDF");
                let path = entry
                    .path_lower
                    .clone()
                    .ok_or_else(|| format!("Dropbox entry {} has no path", entry.name))?;
                Ok(Some(PdfAsset {
                    path,
                    filename: entry.name.clone(),
                }))
            }
            None => {
                info!(folder = %folder, "No newsletter PDF in folder");
                Ok(None)
            }
        }
    }

    async fn find_notes_doc(
        &self,
        month: &str,
        year: i32,
    ) -> Result<Option<String>, ProviderError> {
        let folder = newsletter_folder(month, year);
        info!(folder = %folder, "Looking for notes document");
        let entries = self.list_folder(&folder).await?;
        match select_notes_doc(&entries) {
            Some(entry) => {
                info!(name = %entry.name, "Found notes document");
                Ok(entry.path_lower.clone())
            }
            None => Ok(None),
        }
    }

    async fn create_share_link(&self, path: &str) -> Result<Option<String>, ProviderError> {
        let url = format!(
            "{}/2/sharing/create_shared_link_with_settings",
            self.api_base
        );
        info!(path, "Creating share link");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&json!({
                "path": path,
                "settings": { "requested_visibility": "public" }
            }))
            .send()
            .await?;
        let status = response.status();
        if status.is_success() {
            let parsed: SharedLink = response.json().await?;
            let direct = direct_download_url(&parsed.url);
            info!(url = %direct, "Share link created");
            return Ok(Some(direct));
        }
        if status == StatusCode::CONFLICT {
            // Link already exists for this path; reuse it.
            info!(path, "Share link already exists, retrieving");
            return self.existing_share_link(path).await;
        }
        let body = read_body(response).await;
        error!(%status, path, "Dropbox create_shared_link failed: {body}");
        Err(format!("Dropbox create_shared_link failed: {status} - {body}").into())
    }

    async fn download(&self, path: &str) -> Result<Vec<u8>, ProviderError> {
        let url = format!("{}/2/files/download", self.content_base);
        info!(path, "Downloading file");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .header("Dropbox-API-Arg", json!({ "path": path }).to_string())
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, path, "Dropbox download failed: {body}");
            return Err(format!("Dropbox download failed: {status} - {body}").into());
        }
        Ok(response.bytes().await?.to_vec())
    }
}
