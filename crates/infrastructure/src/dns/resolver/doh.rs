use crate::dns::transport::DohJsonClient;
use async_trait::async_trait;
use peerdns_application::ports::HostResolver;
use peerdns_domain::{DomainError, RecordType};
use std::net::IpAddr;
use tracing::debug;

/// [`HostResolver`] over the DoH JSON API: A first, AAAA only when A has no answer.
pub struct DohHostResolver {
    client: DohJsonClient,
}

impl DohHostResolver {
    pub fn new(client: DohJsonClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &DohJsonClient {
        &self.client
    }
}

#[async_trait]
impl HostResolver for DohHostResolver {
    async fn resolve(&self, hostname: &str) -> Result<Option<IpAddr>, DomainError> {
        for record_type in RecordType::ADDRESS_TYPES {
            if let Some(ip) = self.client.query(hostname, record_type).await? {
                return Ok(Some(ip));
            }
            debug!(hostname = %hostname, record_type = %record_type, "No DoH answer");
        }
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "doh"
    }
}
