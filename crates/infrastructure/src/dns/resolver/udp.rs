use crate::dns::transport::{DnsServerSetting, UdpDnsResolver};
use async_trait::async_trait;
use peerdns_application::ports::HostResolver;
use peerdns_domain::{DomainError, ResolverConfig};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// [`HostResolver`] over plain UDP DNS. A records are preferred over AAAA.
pub struct UdpHostResolver {
    resolver: UdpDnsResolver,
    timeout_secs: u64,
    retries: u32,
    port: u16,
}

impl UdpHostResolver {
    pub fn new(resolver: UdpDnsResolver, timeout_secs: u64, retries: u32, port: u16) -> Self {
        Self {
            resolver,
            timeout_secs,
            retries,
            port,
        }
    }

    pub fn from_config(config: &ResolverConfig, server: Arc<DnsServerSetting>) -> Self {
        Self::new(
            UdpDnsResolver::new(server),
            config.timeout_secs,
            config.retries,
            config.dns_port,
        )
    }
}

#[async_trait]
impl HostResolver for UdpHostResolver {
    async fn resolve(&self, hostname: &str) -> Result<Option<IpAddr>, DomainError> {
        let addresses = self
            .resolver
            .resolve(hostname, self.timeout_secs, self.retries, self.port)
            .await?;

        debug!(hostname = %hostname, count = addresses.len(), "UDP addresses");

        Ok(addresses.first().copied())
    }

    fn name(&self) -> &'static str {
        "udp"
    }
}
