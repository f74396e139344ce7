use dmsc_newsletter_core::config::Config;
use dmsc_newsletter_core::contract::{NewCmsEntry, SiteCms};
use dmsc_newsletter_core::wix::{document_ref, entry_payload, WixClient};

fn test_config() -> Config {
    Config {
        dropbox_access_token: "test-token".to_string(),
        wix_api_key: "wix-key".to_string(),
        wix_site_id: "site-guid".to_string(),
        mailchimp_api_key: "abc123-us21".to_string(),
        mailchimp_list_id: "list-1".to_string(),
        mailchimp_dc: "us21".to_string(),
    }
}

fn entry<'a>(publish_date: Option<chrono::NaiveDate>) -> NewCmsEntry<'a> {
    NewCmsEntry {
        title: "November 2025",
        document_ref: "wix:document://v1/ugd/FILE1/DMSC_2025_Nov_Web.pdf",
        publish_date,
        summary: "Monthly Meeting Thursday November 20 at 7 PM",
    }
}

#[test]
fn document_ref_embeds_id_and_display_name() {
    assert_eq!(
        document_ref("FILE1", "DMSC_2025_Nov_Web.pdf"),
        "wix:document://v1/ugd/FILE1/DMSC_2025_Nov_Web.pdf"
    );
}

#[test]
fn entry_payload_includes_formatted_publish_date_when_present() {
    let date = chrono::NaiveDate::from_ymd_opt(2025, 11, 18).expect("valid date");
    let payload = entry_payload(&entry(Some(date)));

    assert_eq!(payload["dataCollectionId"], "Newsletters");
    let data = &payload["dataItem"]["data"];
    assert_eq!(data["title"], "November 2025");
    assert_eq!(
        data["newsletter"],
        "wix:document://v1/ugd/FILE1/DMSC_2025_Nov_Web.pdf"
    );
    assert_eq!(data["publishMonth"], "Nov 18, 2025");
}

#[test]
fn entry_payload_omits_publish_month_entirely_when_absent() {
    let payload = entry_payload(&entry(None));
    let data = payload["dataItem"]["data"]
        .as_object()
        .expect("data should be an object");
    assert!(!data.contains_key("publishMonth"));
    assert!(data.contains_key("newsletterSummary"));
}

#[tokio::test]
async fn import_media_rewrites_the_guid_subdomain() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/site-media/v1/files/import")
        .match_header("authorization", "wix-key")
        .match_header("wix-site-id", "site-guid")
        .with_status(200)
        .with_body(
            r#"{"file":{"id":"FILE1","url":"https://site-guid.usrfiles.com/ugd/FILE1/DMSC_2025_Nov_Web.pdf"}}"#,
        )
        .create_async()
        .await;

    let client = WixClient::with_base_url(&test_config(), &server.url());
    let media = client
        .import_media("https://dl.dropboxusercontent.com/s/xyz?dl=1", "DMSC_2025_Nov_Web.pdf")
        .await
        .expect("import should succeed");

    assert_eq!(media.file_id, "FILE1");
    assert_eq!(
        media.url,
        "https://www.dmlsclub.com/_files/ugd/FILE1/DMSC_2025_Nov_Web.pdf"
    );
    assert_eq!(
        media.document_ref,
        "wix:document://v1/ugd/FILE1/DMSC_2025_Nov_Web.pdf"
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn import_media_leaves_foreign_urls_untouched() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/site-media/v1/files/import")
        .with_status(200)
        .with_body(r#"{"file":{"id":"FILE2","url":"https://other.usrfiles.com/ugd/FILE2/x.pdf"}}"#)
        .create_async()
        .await;

    let client = WixClient::with_base_url(&test_config(), &server.url());
    let media = client
        .import_media("https://example.com/x.pdf", "x.pdf")
        .await
        .expect("import should succeed");
    // Only the site's own GUID subdomain is rewritten.
    assert_eq!(media.url, "https://other.usrfiles.com/ugd/FILE2/x.pdf");
}

#[tokio::test]
async fn import_failure_carries_status_and_body() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/site-media/v1/files/import")
        .with_status(403)
        .with_body(r#"{"message":"missing permission"}"#)
        .create_async()
        .await;

    let client = WixClient::with_base_url(&test_config(), &server.url());
    let err = client
        .import_media("https://example.com/x.pdf", "x.pdf")
        .await
        .expect_err("403 should surface");
    let message = err.to_string();
    assert!(message.contains("403"), "{message}");
    assert!(message.contains("missing permission"), "{message}");
}

#[tokio::test]
async fn create_entry_returns_the_item_id() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/wix-data/v2/items")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "dataCollectionId": "Newsletters",
            "dataItem": { "data": { "title": "November 2025" } }
        })))
        .with_status(200)
        .with_body(r#"{"dataItem":{"id":"ITEM9"}}"#)
        .create_async()
        .await;

    let client = WixClient::with_base_url(&test_config(), &server.url());
    let id = client
        .create_entry(entry(None))
        .await
        .expect("entry creation should succeed");
    assert_eq!(id, "ITEM9");
    mock.assert_async().await;
}

#[tokio::test]
async fn recent_entries_map_the_collection_fields() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/wix-data/v2/items/query")
        .with_status(200)
        .with_body(
            r#"{"dataItems":[
                {"id":"A","data":{"title":"November 2025","publishMonth":"Nov 18, 2025","newsletterSummary":"Meeting at 7"}},
                {"id":"B","data":{"title":"October 2025"}}
            ]}"#,
        )
        .create_async()
        .await;

    let client = WixClient::with_base_url(&test_config(), &server.url());
    let entries = client
        .recent_entries(5)
        .await
        .expect("query should succeed");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].id, "A");
    assert_eq!(entries[0].title.as_deref(), Some("November 2025"));
    assert_eq!(entries[0].publish_month.as_deref(), Some("Nov 18, 2025"));
    assert_eq!(entries[1].publish_month, None);
}
