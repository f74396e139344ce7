//! Wix client: media import and the Newsletters data collection.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::Config;
use crate::contract::{CmsEntrySummary, ImportedMedia, NewCmsEntry, ProviderError, SiteCms};
use crate::http::read_body;

pub const BASE_URL: &str = "https://www.wixapis.com";
pub const NEWSLETTERS_COLLECTION: &str = "Newsletters";

/// Imported files come back on a GUID subdomain; the site serves them from
/// here instead.
const VANITY_FILES_PREFIX: &str = "https://www.dmlsclub.com/_files/ugd/";
/// How the CMS displays the publish date, e.g. "Nov 18, 2025".
const PUBLISH_MONTH_FORMAT: &str = "%b %d, %Y";

#[derive(Debug, Deserialize)]
struct ImportFileResponse {
    file: ImportedFile,
}

#[derive(Debug, Deserialize)]
struct ImportedFile {
    id: String,
    url: String,
}

#[derive(Debug, Deserialize)]
struct CreateItemResponse {
    #[serde(rename = "dataItem")]
    data_item: CreatedItem,
}

#[derive(Debug, Deserialize)]
struct CreatedItem {
    id: String,
}

#[derive(Debug, Deserialize)]
struct QueryItemsResponse {
    #[serde(rename = "dataItems", default)]
    data_items: Vec<QueriedItem>,
}

#[derive(Debug, Deserialize)]
struct QueriedItem {
    id: String,
    #[serde(default)]
    data: serde_json::Value,
}

/// One data collection, as listed by the auth check.
#[derive(Debug, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListCollectionsResponse {
    #[serde(default)]
    collections: Vec<CollectionInfo>,
}

/// Document reference string the Newsletters collection expects for its
/// newsletter field.
pub fn document_ref(file_id: &str, display_name: &str) -> String {
    format!("wix:document://v1/ugd/{file_id}/{display_name}")
}

/// The CMS record for a new entry. `publishMonth` is present only when a
/// publish date was supplied.
pub fn entry_payload(entry: &NewCmsEntry<'_>) -> serde_json::Value {
    let mut data = json!({
        "title": entry.title,
        "newsletter": entry.document_ref,
        "newsletterSummary": entry.summary,
    });
    if let Some(date) = entry.publish_date {
        data["publishMonth"] = json!(date.format(PUBLISH_MONTH_FORMAT).to_string());
    }
    json!({
        "dataCollectionId": NEWSLETTERS_COLLECTION,
        "dataItem": { "data": data }
    })
}

pub struct WixClient {
    http: Client,
    api_key: String,
    site_id: String,
    base_url: String,
}

impl WixClient {
    pub fn new(config: &Config) -> Self {
        Self::with_base_url(config, BASE_URL)
    }

    /// Base URL is injectable so tests can point at a local server.
    pub fn with_base_url(config: &Config, base_url: &str) -> Self {
        WixClient {
            http: Client::new(),
            api_key: config.wix_api_key.clone(),
            site_id: config.wix_site_id.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn vanity_url(&self, url: &str) -> String {
        url.replace(
            &format!("https://{}.usrfiles.com/ugd/", self.site_id),
            VANITY_FILES_PREFIX,
        )
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .post(format!("{}{path}", self.base_url))
            .header("Authorization", &self.api_key)
            .header("wix-site-id", &self.site_id)
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http
            .get(format!("{}{path}", self.base_url))
            .header("Authorization", &self.api_key)
            .header("wix-site-id", &self.site_id)
    }

    /// Lists the site's data collections. Used by the `check wix` command.
    pub async fn list_collections(&self) -> Result<Vec<CollectionInfo>, ProviderError> {
        let response = self.get("/wix-data/v2/collections").send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, "Wix collections listing failed: {body}");
            return Err(format!("Wix collections listing failed: {status} - {body}").into());
        }
        let parsed: ListCollectionsResponse = response.json().await?;
        Ok(parsed.collections)
    }

    /// Confirms the media manager API is reachable with this key.
    pub async fn check_media_manager(&self) -> Result<(), ProviderError> {
        let response = self.get("/site-media/v1/files").send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, "Wix media manager check failed: {body}");
            return Err(format!("Wix media manager check failed: {status} - {body}").into());
        }
        Ok(())
    }
}

#[async_trait]
impl SiteCms for WixClient {
    async fn import_media(
        &self,
        file_url: &str,
        display_name: &str,
    ) -> Result<ImportedMedia, ProviderError> {
        info!(display_name, "Importing file into Wix media manager");
        let response = self
            .post("/site-media/v1/files/import")
            .json(&json!({
                "url": file_url,
                "mimeType": "application/pdf",
                "displayName": display_name,
            }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, display_name, "Wix file import failed: {body}");
            return Err(format!("Wix file import failed: {status} - {body}").into());
        }
        let parsed: ImportFileResponse = response.json().await?;
        let public_url = self.vanity_url(&parsed.file.url);
        let file_id = parsed.file.id;
        let document_ref = document_ref(&file_id, display_name);
        info!(file_id = %file_id, url = %public_url, "File imported into Wix");
        Ok(ImportedMedia {
            file_id,
            url: public_url,
            document_ref,
        })
    }

    async fn create_entry<'a>(&self, entry: NewCmsEntry<'a>) -> Result<String, ProviderError> {
        info!(title = entry.title, "Creating CMS entry");
        let response = self
            .post("/wix-data/v2/items")
            .json(&entry_payload(&entry))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, title = entry.title, "Wix CMS entry creation failed: {body}");
            return Err(format!("Wix CMS entry creation failed: {status} - {body}").into());
        }
        let parsed: CreateItemResponse = response.json().await?;
        info!(item_id = %parsed.data_item.id, "CMS entry created");
        Ok(parsed.data_item.id)
    }

    async fn recent_entries(&self, limit: u32) -> Result<Vec<CmsEntrySummary>, ProviderError> {
        let response = self
            .post("/wix-data/v2/items/query")
            .json(&json!({
                "dataCollectionId": NEWSLETTERS_COLLECTION,
                "query": {
                    "sort": [{ "fieldName": "_createdDate", "order": "DESC" }],
                    "paging": { "limit": limit }
                }
            }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, "Wix CMS query failed: {body}");
            return Err(format!("Wix CMS query failed: {status} - {body}").into());
        }
        let parsed: QueryItemsResponse = response.json().await?;
        Ok(parsed
            .data_items
            .into_iter()
            .map(|item| CmsEntrySummary {
                id: item.id,
                title: string_field(&item.data, "title"),
                publish_month: string_field(&item.data, "publishMonth"),
                summary: string_field(&item.data, "newsletterSummary"),
            })
            .collect())
    }
}

fn string_field(data: &serde_json::Value, field: &str) -> Option<String> {
    data.get(field)
        .and_then(|value| value.as_str())
        .map(|value| value.to_string())
}
