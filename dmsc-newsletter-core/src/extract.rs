//! Meeting-summary extraction from the monthly notes document.
//!
//! A `.docx` file is a ZIP archive; the paragraph text lives in
//! `word/document.xml`. The scan policy is deliberately simple: look for a
//! paragraph mentioning the meeting in the document's opening lines, fall
//! back to the first non-empty paragraph, and fall back again to a stock
//! sentence when the document is missing or unreadable.

use std::io::Read;

use regex::Regex;
use tracing::warn;

/// Used whenever no usable paragraph can be extracted.
pub const DEFAULT_SUMMARY: &str = "See newsletter for meeting details";

const KEYWORDS: [&str; 3] = ["meeting", "speaker", "program"];
/// Keyword scan only covers the document's opening paragraphs.
const KEYWORD_WINDOW: usize = 10;
/// The first-non-empty fallback looks at even fewer.
const FALLBACK_WINDOW: usize = 5;

/// Paragraph texts of a `.docx` document, in order.
pub fn paragraphs_from_docx(
    bytes: &[u8],
) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes))?;
    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut document_xml)?;

    let paragraph_re = Regex::new(r"(?s)<w:p[ >].*?</w:p>").unwrap();
    let text_run_re = Regex::new(r"<w:t[^>]*>([^<]*)</w:t>").unwrap();

    let mut paragraphs = Vec::new();
    for block in paragraph_re.find_iter(&document_xml) {
        let mut text = String::new();
        for run in text_run_re.captures_iter(block.as_str()) {
            text.push_str(&run[1]);
        }
        paragraphs.push(unescape_xml(&text));
    }
    Ok(paragraphs)
}

/// The scan policy on already-extracted paragraphs. `None` when nothing
/// usable is found.
pub fn pick_summary(paragraphs: &[String]) -> Option<String> {
    for text in paragraphs.iter().take(KEYWORD_WINDOW) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lowered = trimmed.to_lowercase();
        if KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
            return Some(trimmed.to_string());
        }
    }
    paragraphs
        .iter()
        .take(FALLBACK_WINDOW)
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .map(|text| text.to_string())
}

/// Summary for raw document bytes. Never fails: unparsable or empty input
/// yields [`DEFAULT_SUMMARY`].
pub fn extract_summary(bytes: &[u8]) -> String {
    match paragraphs_from_docx(bytes) {
        Ok(paragraphs) => {
            pick_summary(&paragraphs).unwrap_or_else(|| DEFAULT_SUMMARY.to_string())
        }
        Err(e) => {
            warn!(error = ?e, "Could not parse notes document");
            DEFAULT_SUMMARY.to_string()
        }
    }
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
