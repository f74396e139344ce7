//! Small helpers shared by the provider clients.

/// Body text of a failed response, for error reporting.
pub(crate) async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<Failed to decode response body>"))
}
