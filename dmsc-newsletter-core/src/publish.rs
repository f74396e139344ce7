//! High-level pipeline: locate assets → share → summarise → publish → draft.
//!
//! This module orchestrates one publication run end to end:
//!   - Locates the month's newsletter PDF and notes document in the store
//!   - Creates (or reuses) a public share link for the PDF
//!   - Extracts the meeting summary from the notes document
//!   - Imports the PDF into the site's media library and creates the CMS
//!     entry referencing it
//!   - Renders the email HTML and drafts the campaign, leaving it unsent
//!
//! # Error Handling
//! Strictly sequential and fail-fast: each step either passes its output
//! forward or halts the run with a formatted error. Nothing is retried and
//! completed external side effects are not rolled back; when the content
//! upload fails after campaign creation, the error carries the dangling
//! campaign id so the operator can clean it up manually.
//!
//! # Callable From
//! Used by the CLI crate and by integration tests, which substitute mock
//! providers for all three traits.

use std::path::PathBuf;

use tracing::{error, info};

use crate::contract::{CampaignService, NewCmsEntry, NewsletterStore, SiteCms};
use crate::extract;
use crate::template;

/// Inputs for one publication run.
#[derive(Debug)]
pub struct PublishRequest {
    /// Month name as it appears in the store's folder layout, e.g. "November".
    pub month: String,
    pub year: i32,
    /// Path to the newsletter HTML template on disk.
    pub template_path: PathBuf,
    /// Optional publish date for the CMS entry; omitted from the record
    /// when absent.
    pub publish_date: Option<chrono::NaiveDate>,
}

/// Everything a successful run produced, for the operator summary.
#[derive(Debug)]
pub struct PublishReport {
    pub pdf_filename: String,
    pub share_url: String,
    pub summary: String,
    pub media_file_id: String,
    pub media_url: String,
    pub cms_item_id: String,
    pub campaign_id: String,
    pub campaign_edit_url: String,
}

pub async fn publish<S, C, M>(
    request: &PublishRequest,
    store: &S,
    cms: &C,
    campaigns: &M,
) -> Result<PublishReport, String>
where
    S: NewsletterStore,
    C: SiteCms,
    M: CampaignService,
{
    info!(
        month = %request.month,
        year = request.year,
        "[PUBLISH] Starting newsletter publication run"
    );

    // --- Step 1: locate the newsletter PDF ---
    let pdf = match store.find_newsletter_pdf(&request.month, request.year).await {
        Ok(Some(pdf)) => {
            info!(filename = %pdf.filename, "[PUBLISH] Newsletter PDF located");
            pdf
        }
        Ok(None) => {
            error!(month = %request.month, year = request.year, "[PUBLISH][ERROR] No newsletter PDF found");
            return Err(format!(
                "No newsletter PDF found for {} {}",
                request.month, request.year
            ));
        }
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] Newsletter folder listing failed");
            return Err(format!("Failed to list newsletter folder: {e}"));
        }
    };

    // --- Step 2: share link for the PDF ---
    let share_url = match store.create_share_link(&pdf.path).await {
        Ok(Some(url)) => {
            info!(url = %url, "[PUBLISH] Share link ready");
            url
        }
        Ok(None) => {
            error!(path = %pdf.path, "[PUBLISH][ERROR] No share link available");
            return Err(format!("Could not retrieve a share link for {}", pdf.path));
        }
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] Share link creation failed");
            return Err(format!("Failed to create share link: {e}"));
        }
    };

    // --- Step 3: meeting summary from the notes document ---
    let summary = match store.find_notes_doc(&request.month, request.year).await {
        Ok(Some(path)) => match store.download(&path).await {
            Ok(bytes) => {
                info!(bytes = bytes.len(), "[PUBLISH] Notes document downloaded");
                extract::extract_summary(&bytes)
            }
            Err(e) => {
                error!(error = %e, path = %path, "[PUBLISH][ERROR] Notes document download failed");
                return Err(format!("Failed to download notes document: {e}"));
            }
        },
        Ok(None) => {
            info!("[PUBLISH] No notes document this month, using stock summary");
            extract::DEFAULT_SUMMARY.to_string()
        }
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] Notes document lookup failed");
            return Err(format!("Failed to look up notes document: {e}"));
        }
    };
    info!(summary = %summary, "[PUBLISH] Meeting summary");

    // --- Step 4: import the shared PDF into the site's media library ---
    let media = match cms.import_media(&share_url, &pdf.filename).await {
        Ok(media) => {
            info!(file_id = %media.file_id, url = %media.url, "[PUBLISH] Media imported");
            media
        }
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] Media import failed");
            return Err(format!("Failed to import file into the media library: {e}"));
        }
    };

    // --- Step 5: CMS entry referencing the imported media ---
    let title = format!("{} {}", request.month, request.year);
    let entry = NewCmsEntry {
        title: &title,
        document_ref: &media.document_ref,
        publish_date: request.publish_date,
        summary: &summary,
    };
    let cms_item_id = match cms.create_entry(entry).await {
        Ok(id) => {
            info!(item_id = %id, "[PUBLISH] CMS entry created");
            id
        }
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] CMS entry creation failed");
            return Err(format!("Failed to create CMS entry: {e}"));
        }
    };

    // --- Step 6: render the email body ---
    let template_html = match template::load_template(&request.template_path) {
        Ok(html) => html,
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] Template load failed");
            return Err(format!("Failed to read template: {e}"));
        }
    };
    let html = template::render(&template_html, &request.month, &media.url);

    // --- Step 7: draft the campaign and upload its content ---
    let campaign = match campaigns.create_campaign(&request.month).await {
        Ok(campaign) => {
            info!(campaign_id = %campaign.id, "[PUBLISH] Draft campaign created");
            campaign
        }
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] Campaign creation failed");
            return Err(format!("Failed to create campaign: {e}"));
        }
    };
    if let Err(e) = campaigns.set_content(&campaign.id, &html).await {
        // The campaign shell now exists remotely; leave its id for manual cleanup.
        error!(
            campaign_id = %campaign.id,
            error = %e,
            "[PUBLISH][ERROR] Content upload failed, campaign left dangling"
        );
        return Err(format!(
            "Campaign {} was created but content failed to upload: {e}",
            campaign.id
        ));
    }
    info!(campaign_id = %campaign.id, "[PUBLISH] Campaign content uploaded");

    // --- Step 8: manual-review link ---
    let campaign_edit_url = match campaigns.edit_url(&campaign.id).await {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "[PUBLISH][ERROR] Campaign edit URL lookup failed");
            return Err(format!("Failed to fetch campaign edit URL: {e}"));
        }
    };

    info!(campaign_id = %campaign.id, edit_url = %campaign_edit_url, "[PUBLISH] Run complete");
    Ok(PublishReport {
        pdf_filename: pdf.filename,
        share_url,
        summary,
        media_file_id: media.file_id,
        media_url: media.url,
        cms_item_id,
        campaign_id: campaign.id,
        campaign_edit_url,
    })
}
