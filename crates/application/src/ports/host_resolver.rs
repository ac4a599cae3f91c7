use async_trait::async_trait;
use peerdns_domain::DomainError;
use std::net::IpAddr;

/// One way of turning a hostname into a single usable address.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// `Ok(None)` means the lookup completed but produced no usable address.
    async fn resolve(&self, hostname: &str) -> Result<Option<IpAddr>, DomainError>;

    fn name(&self) -> &'static str;
}
