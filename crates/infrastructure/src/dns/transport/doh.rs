//! DNS-over-HTTPS JSON API client
//!
//! Queries a resolver's JSON endpoint (`GET <url>?name=<host>&type=<A|AAAA>`)
//! and reads the first usable address out of the `Answer` array:
//!
//! ```text
//! {"Status":0,"Answer":[{"name":"vpn.example.com.","type":1,"TTL":60,"data":"203.0.113.10"}]}
//! ```

use peerdns_domain::{DomainError, RecordType};
use serde::Deserialize;
use std::net::IpAddr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_DOH_URL: &str = "https://223.5.5.5/resolve";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Shared client with connection pooling; bounded on connect and total time.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .use_rustls_tls()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(2))
        .pool_max_idle_per_host(4)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
});

#[derive(Debug, Deserialize)]
struct DohResponse {
    #[serde(rename = "Answer", default)]
    answer: Option<Vec<DohAnswer>>,
}

#[derive(Debug, Deserialize)]
struct DohAnswer {
    #[serde(default)]
    data: Option<String>,
}

pub struct DohJsonClient {
    url: String,
}

impl DohJsonClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    pub fn with_default_url() -> Self {
        Self::new(DEFAULT_DOH_URL)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// `Ok(None)` when the resolver answered but had nothing usable.
    pub async fn query(
        &self,
        hostname: &str,
        record_type: RecordType,
    ) -> Result<Option<IpAddr>, DomainError> {
        debug!(url = %self.url, hostname = %hostname, record_type = %record_type, "Sending DoH JSON query");

        let response = SHARED_CLIENT
            .get(&self.url)
            .query(&[("name", hostname), ("type", record_type.as_str())])
            .header("Accept", JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| {
                DomainError::DohRequestFailed(format!("Request to {} failed: {}", self.url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::DohRequestFailed(format!(
                "{} returned HTTP {}: {}",
                self.url,
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.bytes().await.map_err(|e| {
            DomainError::DohRequestFailed(format!(
                "Failed to read response from {}: {}",
                self.url, e
            ))
        })?;

        let address = first_address(&body)?;

        debug!(
            url = %self.url,
            hostname = %hostname,
            record_type = %record_type,
            address = ?address,
            "DoH JSON response received"
        );

        Ok(address)
    }
}

/// First `data` entry that is an IP literal. CNAME targets and other
/// non-address data are skipped.
fn first_address(body: &[u8]) -> Result<Option<IpAddr>, DomainError> {
    let parsed: DohResponse = serde_json::from_slice(body)
        .map_err(|e| DomainError::InvalidDnsResponse(format!("Malformed DoH JSON: {}", e)))?;

    Ok(parsed
        .answer
        .unwrap_or_default()
        .iter()
        .filter_map(|answer| answer.data.as_deref())
        .find_map(|data| data.trim().parse::<IpAddr>().ok()))
}
