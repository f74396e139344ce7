//! # contract: provider interfaces for the newsletter pipeline
//!
//! One narrow trait per external provider: the file store holding the
//! newsletter assets, the website CMS/media platform, and the email campaign
//! service. Each trait has exactly one production implementation
//! ([`crate::dropbox::DropboxClient`], [`crate::wix::WixClient`],
//! [`crate::mailchimp::MailchimpClient`]); the pipeline in
//! [`crate::publish`] is generic over all three so tests can substitute
//! mocks.
//!
//! ## Error model
//! - Transport/HTTP failures are boxed errors carrying the status and the
//!   response body.
//! - "Legitimately absent" outcomes (no matching file, no existing share
//!   link) are `Ok(None)`, never errors. The caller decides whether absence
//!   is fatal.
//!
//! ## Mocking & Testing
//! The traits are annotated for `mockall`, exported under the
//! `test-export-mocks` feature so integration tests can build deterministic
//! mocks.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Uniform boxed error for all provider calls.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// A newsletter PDF located in the file store.
#[derive(Debug, Clone)]
pub struct PdfAsset {
    /// Provider path, lowercase-normalized by the provider.
    pub path: String,
    /// Display filename as it appears in the folder.
    pub filename: String,
}

/// Result of importing a file into the site's media library.
#[derive(Debug, Clone)]
pub struct ImportedMedia {
    pub file_id: String,
    /// Public URL, already rewritten to the vanity domain.
    pub url: String,
    /// Document reference string understood by the CMS data collection.
    pub document_ref: String,
}

/// Minimal data needed to create a CMS entry in the newsletter collection.
pub struct NewCmsEntry<'a> {
    /// Entry title, e.g. "November 2025".
    pub title: &'a str,
    /// Document reference produced by the media import.
    pub document_ref: &'a str,
    /// When present, submitted as a human-readable publish date. When
    /// absent, the field is omitted from the record entirely.
    pub publish_date: Option<chrono::NaiveDate>,
    /// Meeting summary text shown next to the newsletter.
    pub summary: &'a str,
}

/// A CMS entry as returned by the query endpoint.
#[derive(Debug, Clone)]
pub struct CmsEntrySummary {
    pub id: String,
    pub title: Option<String>,
    pub publish_month: Option<String>,
    pub summary: Option<String>,
}

/// A freshly created draft campaign.
#[derive(Debug, Clone)]
pub struct CreatedCampaign {
    pub id: String,
}

/// File store holding the monthly newsletter assets.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait NewsletterStore: Send + Sync {
    /// Locate the month's newsletter PDF. `Ok(None)` when the folder has no
    /// matching file; callers treat that as a hard stop.
    async fn find_newsletter_pdf(
        &self,
        month: &str,
        year: i32,
    ) -> Result<Option<PdfAsset>, ProviderError>;

    /// Locate the month's notes document (the one the summary is taken
    /// from). `Ok(None)` when absent; callers fall back to a stock summary.
    async fn find_notes_doc(
        &self,
        month: &str,
        year: i32,
    ) -> Result<Option<String>, ProviderError>;

    /// Create a public share link for a stored file, reusing an existing
    /// link when the provider reports a conflict. The returned URL is in
    /// direct-download form. `Ok(None)` when the conflict fallback finds no
    /// link to reuse.
    async fn create_share_link(&self, path: &str) -> Result<Option<String>, ProviderError>;

    /// Download a stored file's raw bytes.
    async fn download(&self, path: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Website platform: media library plus structured data collections.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait SiteCms: Send + Sync {
    /// Import a file into the site's media library from a reachable URL.
    async fn import_media(
        &self,
        file_url: &str,
        display_name: &str,
    ) -> Result<ImportedMedia, ProviderError>;

    /// Create an entry in the newsletter collection, returning its id.
    async fn create_entry<'a>(&self, entry: NewCmsEntry<'a>) -> Result<String, ProviderError>;

    /// Most recently created entries in the newsletter collection.
    async fn recent_entries(&self, limit: u32) -> Result<Vec<CmsEntrySummary>, ProviderError>;
}

/// Email campaign service. Campaigns are only ever drafted here; sending is
/// a manual step in the provider UI.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait CampaignService: Send + Sync {
    /// Create a draft campaign for the month, returning its id.
    async fn create_campaign(&self, month: &str) -> Result<CreatedCampaign, ProviderError>;

    /// Upload the HTML body for a previously created campaign.
    async fn set_content(&self, campaign_id: &str, html: &str) -> Result<(), ProviderError>;

    /// Human-facing editor URL for the campaign, for manual review.
    async fn edit_url(&self, campaign_id: &str) -> Result<String, ProviderError>;
}
