//! Environment-driven Config loading. These tests mutate process env vars,
//! so they are serialised.

use dmsc_newsletter_core::config::Config;
use serial_test::serial;

const VARS: [&str; 5] = [
    "DROPBOX_ACCESS_TOKEN",
    "WIX_API_KEY",
    "WIX_SITE_ID",
    "MAILCHIMP_API_KEY",
    "MAILCHIMP_LIST_ID",
];

fn clear_all() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

fn set_all() {
    std::env::set_var("DROPBOX_ACCESS_TOKEN", "dropbox-token");
    std::env::set_var("WIX_API_KEY", "wix-key");
    std::env::set_var("WIX_SITE_ID", "site-guid");
    std::env::set_var("MAILCHIMP_API_KEY", "abc123-us21");
    std::env::set_var("MAILCHIMP_LIST_ID", "list-1");
}

#[test]
#[serial]
fn loads_all_values_and_derives_the_datacenter() {
    clear_all();
    set_all();

    let config = Config::from_env().expect("config should load");
    assert_eq!(config.dropbox_access_token, "dropbox-token");
    assert_eq!(config.wix_site_id, "site-guid");
    assert_eq!(config.mailchimp_dc, "us21");
    assert_eq!(
        config.mailchimp_base_url(),
        "https://us21.api.mailchimp.com/3.0"
    );
}

#[test]
#[serial]
fn missing_value_is_named_in_the_error() {
    clear_all();
    set_all();
    std::env::remove_var("MAILCHIMP_LIST_ID");

    let err = Config::from_env().expect_err("missing var should fail");
    assert!(err.to_string().contains("MAILCHIMP_LIST_ID"), "{err}");
}

#[test]
#[serial]
fn empty_value_counts_as_missing() {
    clear_all();
    set_all();
    std::env::set_var("DROPBOX_ACCESS_TOKEN", "   ");

    let err = Config::from_env().expect_err("blank var should fail");
    assert!(err.to_string().contains("DROPBOX_ACCESS_TOKEN"), "{err}");
}

#[test]
#[serial]
fn dashless_api_key_is_its_own_datacenter() {
    clear_all();
    set_all();
    std::env::set_var("MAILCHIMP_API_KEY", "nodashkey");

    let config = Config::from_env().expect("config should load");
    assert_eq!(config.mailchimp_dc, "nodashkey");
}
