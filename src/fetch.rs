use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

pub const BASE_URL: &str = "https://hopamchuan.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn build_client() -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    Ok(client)
}

/// GET one page body. Strict 200 contract: any other status, or a
/// transport error, means "nothing here" and never fails the run.
pub async fn fetch_html(client: &Client, url: &str) -> Option<String> {
    let res = match client.get(url).send().await {
        Ok(res) => res,
        Err(e) => {
            warn!("Request failed for {}: {}", url, e);
            return None;
        }
    };
    if res.status() != StatusCode::OK {
        debug!("Skipping {} (status {})", url, res.status());
        return None;
    }
    match res.text().await {
        Ok(body) => Some(body),
        Err(e) => {
            warn!("Failed to read body of {}: {}", url, e);
            None
        }
    }
}
