use tracing::{debug, error, info};

/// Credentials and derived settings for the three providers, built once at
/// process start and passed by reference into each client.
#[derive(Debug, Clone)]
pub struct Config {
    pub dropbox_access_token: String,
    pub wix_api_key: String,
    pub wix_site_id: String,
    pub mailchimp_api_key: String,
    pub mailchimp_list_id: String,
    /// Mailchimp datacenter, taken from the suffix of the API key.
    pub mailchimp_dc: String,
}

impl Config {
    /// Reads all required values from the environment (after loading `.env`
    /// if present). Fails on the first missing value, naming it.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let dropbox_access_token = require_env("DROPBOX_ACCESS_TOKEN")?;
        let wix_api_key = require_env("WIX_API_KEY")?;
        let wix_site_id = require_env("WIX_SITE_ID")?;
        let mailchimp_api_key = require_env("MAILCHIMP_API_KEY")?;
        let mailchimp_list_id = require_env("MAILCHIMP_LIST_ID")?;

        // Keys look like "abc123-us21"; the part after the last dash is the
        // datacenter. A key with no dash is used as-is.
        let mailchimp_dc = mailchimp_api_key
            .rsplit('-')
            .next()
            .unwrap_or(mailchimp_api_key.as_str())
            .to_string();

        Ok(Config {
            dropbox_access_token,
            wix_api_key,
            wix_site_id,
            mailchimp_api_key,
            mailchimp_list_id,
            mailchimp_dc,
        })
    }

    pub fn mailchimp_base_url(&self) -> String {
        format!("https://{}.api.mailchimp.com/3.0", self.mailchimp_dc)
    }

    pub fn trace_loaded(&self) {
        info!(
            wix_site_id = %self.wix_site_id,
            mailchimp_dc = %self.mailchimp_dc,
            mailchimp_list_id = %self.mailchimp_list_id,
            dropbox_token_set = !self.dropbox_access_token.is_empty(),
            wix_key_set = !self.wix_api_key.is_empty(),
            "Loaded Config"
        );
        debug!(
            mailchimp_base_url = %self.mailchimp_base_url(),
            "Config derived endpoints"
        );
    }
}

fn require_env(name: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            error!(var = name, "Required environment variable missing");
            Err(format!("{name} not found in environment variables").into())
        }
    }
}
