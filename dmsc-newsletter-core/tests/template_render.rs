use std::io::Write;

use dmsc_newsletter_core::template::{load_template, render};
use tempfile::NamedTempFile;

const TEMPLATE: &str =
    "<html><body><p>The {{MONTH}} newsletter</p><a href=\"{{WIX_LINK}}\">Read</a></body></html>";

#[test]
fn render_substitutes_both_placeholders() {
    let html = render(TEMPLATE, "March", "https://example.com/march.pdf");
    assert!(html.contains("The March newsletter"));
    assert!(html.contains("href=\"https://example.com/march.pdf\""));
    assert!(!html.contains("{{MONTH}}"));
    assert!(!html.contains("{{WIX_LINK}}"));
}

#[test]
fn render_is_idempotent_per_placeholder() {
    let once = render(TEMPLATE, "March", "https://example.com/march.pdf");
    let twice = render(&once, "March", "https://example.com/march.pdf");
    assert_eq!(once, twice);
}

#[test]
fn month_may_appear_multiple_times() {
    let template = "{{MONTH}} and {{MONTH}} again";
    assert_eq!(render(template, "May", "x"), "May and May again");
}

#[test]
fn load_template_reads_file_contents() {
    let mut file = NamedTempFile::new().expect("temp file should be created");
    file.write_all(TEMPLATE.as_bytes())
        .expect("writing template should succeed");
    let loaded = load_template(file.path()).expect("template should load");
    assert_eq!(loaded, TEMPLATE);
}

#[test]
fn load_template_errors_on_missing_file_naming_the_path() {
    let err = load_template("/definitely/not/here.html")
        .expect_err("missing template should be an error");
    assert!(err.to_string().contains("/definitely/not/here.html"));
}
