//! Mailchimp client: draft campaign creation and content upload.
//!
//! Campaigns created here are left in draft state for manual review; the
//! send button stays with a human.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::Config;
use crate::contract::{CampaignService, CreatedCampaign, ProviderError};
use crate::http::read_body;

/// Mailchimp ignores the basic-auth username; the API key is the password.
const BASIC_AUTH_USER: &str = "anystring";
const FROM_NAME: &str = "DMSC";
const REPLY_TO: &str = "dmscnews@gmail.com";

pub fn subject_line(month: &str) -> String {
    format!("DMSC {month} Newsletter is available!")
}

pub fn campaign_title(month: &str) -> String {
    format!("{month} Newsletter")
}

#[derive(Debug, Deserialize)]
struct CreateCampaignResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CampaignDetails {
    web_id: u64,
}

pub struct MailchimpClient {
    http: Client,
    api_key: String,
    list_id: String,
    dc: String,
    base_url: String,
}

impl MailchimpClient {
    pub fn new(config: &Config) -> Self {
        let base_url = config.mailchimp_base_url();
        Self::with_base_url(config, &base_url)
    }

    /// Base URL is injectable so tests can point at a local server.
    pub fn with_base_url(config: &Config, base_url: &str) -> Self {
        MailchimpClient {
            http: Client::new(),
            api_key: config.mailchimp_api_key.clone(),
            list_id: config.mailchimp_list_id.clone(),
            dc: config.mailchimp_dc.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn admin_edit_url(&self, web_id: u64) -> String {
        format!(
            "https://{}.admin.mailchimp.com/campaigns/edit?id={web_id}",
            self.dc
        )
    }
}

#[async_trait]
impl CampaignService for MailchimpClient {
    async fn create_campaign(&self, month: &str) -> Result<CreatedCampaign, ProviderError> {
        let url = format!("{}/campaigns", self.base_url);
        info!(month, "Creating draft campaign");
        let response = self
            .http
            .post(&url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
            .json(&json!({
                "type": "regular",
                "recipients": { "list_id": self.list_id },
                "settings": {
                    "subject_line": subject_line(month),
                    "title": campaign_title(month),
                    "from_name": FROM_NAME,
                    "reply_to": REPLY_TO,
                }
            }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, month, "Mailchimp campaign creation failed: {body}");
            return Err(format!("Mailchimp campaign creation failed: {status} - {body}").into());
        }
        let parsed: CreateCampaignResponse = response.json().await?;
        info!(campaign_id = %parsed.id, "Campaign created");
        Ok(CreatedCampaign { id: parsed.id })
    }

    async fn set_content(&self, campaign_id: &str, html: &str) -> Result<(), ProviderError> {
        let url = format!("{}/campaigns/{campaign_id}/content", self.base_url);
        info!(campaign_id, chars = html.len(), "Uploading campaign content");
        let response = self
            .http
            .put(&url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
            .json(&json!({ "html": html }))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, campaign_id, "Mailchimp content upload failed: {body}");
            return Err(format!("Mailchimp content upload failed: {status} - {body}").into());
        }
        Ok(())
    }

    async fn edit_url(&self, campaign_id: &str) -> Result<String, ProviderError> {
        let url = format!("{}/campaigns/{campaign_id}", self.base_url);
        let response = self
            .http
            .get(&url)
            .basic_auth(BASIC_AUTH_USER, Some(&self.api_key))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = read_body(response).await;
            error!(%status, campaign_id, "Mailchimp campaign lookup failed: {body}");
            return Err(format!("Mailchimp campaign lookup failed: {status} - {body}").into());
        }
        let parsed: CampaignDetails = response.json().await?;
        Ok(self.admin_edit_url(parsed.web_id))
    }
}
