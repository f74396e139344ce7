use std::fs;
use std::path::Path;

use tracing::{error, info};

pub const MONTH_PLACEHOLDER: &str = "{{MONTH}}";
pub const LINK_PLACEHOLDER: &str = "{{WIX_LINK}}";

/// Reads the newsletter HTML template from disk.
pub fn load_template<P: AsRef<Path>>(
    path: P,
) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
    let path_ref = path.as_ref();
    match fs::read_to_string(path_ref) {
        Ok(html) => {
            info!(template = ?path_ref, chars = html.len(), "Template loaded");
            Ok(html)
        }
        Err(e) => {
            error!(error = ?e, template = ?path_ref, "Failed to read template");
            Err(format!("Template file not found: {}: {e}", path_ref.display()).into())
        }
    }
}

/// Substitutes the month and newsletter link into the template. Plain
/// string replacement; running it twice with the same inputs yields the
/// same output.
pub fn render(template: &str, month: &str, wix_link: &str) -> String {
    template
        .replace(MONTH_PLACEHOLDER, month)
        .replace(LINK_PLACEHOLDER, wix_link)
}
