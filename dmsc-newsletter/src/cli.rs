//! CLI glue for the newsletter pipeline: argument parsing, provider client
//! construction, and the operator-facing run summary. All pipeline logic
//! lives in `dmsc-newsletter-core`.

use anyhow::Result;
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use dmsc_newsletter_core::config::Config;
use dmsc_newsletter_core::contract::SiteCms;
use dmsc_newsletter_core::dropbox::DropboxClient;
use dmsc_newsletter_core::mailchimp::MailchimpClient;
use dmsc_newsletter_core::publish::{publish, PublishReport, PublishRequest};
use dmsc_newsletter_core::wix::WixClient;

/// CLI for the DMSC newsletter: publish the monthly issue and draft the
/// announcement campaign.
#[derive(Parser)]
#[clap(
    name = "dmsc-newsletter",
    version,
    about = "Publish the monthly DMSC newsletter: Dropbox PDF -> Wix media/CMS -> Mailchimp draft campaign"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full publication pipeline and leave a draft campaign for review
    Publish {
        /// Month name as it appears in the Dropbox folder, e.g. "November"
        month: String,
        /// Newsletter year; defaults to the current year
        #[clap(long)]
        year: Option<i32>,
        /// Path to the newsletter HTML template
        #[clap(long, default_value = "newsletter_template.html")]
        template: PathBuf,
        /// Publish date (YYYY-MM-DD) for the CMS entry; left blank when omitted
        #[clap(long)]
        publish_date: Option<chrono::NaiveDate>,
    },
    /// Connectivity checks against the external services
    Check {
        #[clap(subcommand)]
        target: CheckTarget,
    },
}

#[derive(Subcommand)]
pub enum CheckTarget {
    /// Verify the Dropbox token and optionally list a folder
    Dropbox {
        /// Folder to list, e.g. "/Newsletter"; root when omitted
        #[clap(long)]
        path: Option<String>,
    },
    /// Verify the Wix API key: collections, media manager, recent entries
    Wix,
}

/// Async CLI entrypoint, extracted for integration tests and main().
pub async fn run(cli: Cli) -> Result<()> {
    let config =
        Config::from_env().map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;
    config.trace_loaded();

    match cli.command {
        Commands::Publish {
            month,
            year,
            template,
            publish_date,
        } => {
            let year = year.unwrap_or_else(|| chrono::Local::now().year());
            let request = PublishRequest {
                month: month.clone(),
                year,
                template_path: template,
                publish_date,
            };

            let store = DropboxClient::new(&config);
            let cms = WixClient::new(&config);
            let campaigns = MailchimpClient::new(&config);

            println!("============================================================");
            println!("DMSC Newsletter Publisher");
            println!("============================================================");
            println!();

            match publish(&request, &store, &cms, &campaigns).await {
                Ok(report) => {
                    print_report(&month, &report);
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(error = %e, "Publication run failed");
                    Err(anyhow::Error::msg(e))
                }
            }
        }
        Commands::Check { target } => match target {
            CheckTarget::Dropbox { path } => check_dropbox(&config, path.as_deref()).await,
            CheckTarget::Wix => check_wix(&config).await,
        },
    }
}

fn print_report(month: &str, report: &PublishReport) {
    println!("============================================================");
    println!("SUCCESS! Draft campaign created");
    println!("============================================================");
    println!();
    println!("Newsletter PDF:  {}", report.pdf_filename);
    println!("Share link:      {}", report.share_url);
    println!("Wix media URL:   {}", report.media_url);
    println!("CMS entry id:    {}", report.cms_item_id);
    println!("Meeting summary: {}", report.summary);
    println!();
    println!("Next steps:");
    println!("1. Review the campaign in Mailchimp:");
    println!("   {}", report.campaign_edit_url);
    println!("2. Check that '{month}' appears correctly and the newsletter link works");
    println!("3. When ready, click 'Send' in Mailchimp");
    println!();
    println!("============================================================");
}

async fn check_dropbox(config: &Config, path: Option<&str>) -> Result<()> {
    let client = DropboxClient::new(config);

    let account = client
        .current_account()
        .await
        .map_err(|e| anyhow::anyhow!("Dropbox connection failed: {e}"))?;
    println!("Dropbox connection successful");
    println!("  Account: {}", account.name.display_name);
    println!("  Email:   {}", account.email);

    let folder = path.unwrap_or("");
    let entries = client
        .list_folder(folder)
        .await
        .map_err(|e| anyhow::anyhow!("Dropbox folder listing failed: {e}"))?;
    println!();
    println!(
        "Found {} items in {}:",
        entries.len(),
        if folder.is_empty() { "/ (root)" } else { folder }
    );
    for entry in entries.iter().filter(|e| e.is_folder()) {
        println!("  {}/", entry.name);
    }
    for entry in entries.iter().filter(|e| !e.is_folder()) {
        let size_mb = entry.size.unwrap_or(0) as f64 / (1024.0 * 1024.0);
        println!("  {} ({size_mb:.2} MB)", entry.name);
    }
    Ok(())
}

async fn check_wix(config: &Config) -> Result<()> {
    let client = WixClient::new(config);

    let collections = client
        .list_collections()
        .await
        .map_err(|e| anyhow::anyhow!("Wix collections listing failed: {e}"))?;
    println!("Found {} data collections:", collections.len());
    for collection in collections.iter().take(10) {
        println!(
            "  - {} ({})",
            collection.id,
            collection.display_name.as_deref().unwrap_or("N/A")
        );
    }

    client
        .check_media_manager()
        .await
        .map_err(|e| anyhow::anyhow!("Wix media manager check failed: {e}"))?;
    println!("Media Manager API accessible");

    let entries = client
        .recent_entries(5)
        .await
        .map_err(|e| anyhow::anyhow!("Wix CMS query failed: {e}"))?;
    println!();
    println!("Most recent newsletter entries:");
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "{}. {} (publish month: {})",
            i + 1,
            entry.title.as_deref().unwrap_or("<untitled>"),
            entry.publish_month.as_deref().unwrap_or("N/A")
        );
    }
    Ok(())
}
