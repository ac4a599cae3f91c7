//! Process-wide UDP DNS server selection.
//!
//! The setting is read at call time by every UDP lookup, so changing it takes
//! effect on the next resolution attempt without rebuilding resolvers.

use arc_swap::ArcSwapOption;
use peerdns_domain::DomainError;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::{Arc, LazyLock};
use tracing::info;

/// Used whenever no server has been configured.
pub const DEFAULT_DNS_SERVER: IpAddr = IpAddr::V4(Ipv4Addr::new(223, 5, 5, 5));

static GLOBAL: LazyLock<Arc<DnsServerSetting>> =
    LazyLock::new(|| Arc::new(DnsServerSetting::new()));

#[derive(Debug, Default)]
pub struct DnsServerSetting {
    server: ArcSwapOption<IpAddr>,
}

impl DnsServerSetting {
    pub fn new() -> Self {
        Self::default()
    }

    /// The instance shared by the whole process.
    pub fn global() -> Arc<Self> {
        Arc::clone(&GLOBAL)
    }

    pub fn set(&self, server: IpAddr) {
        info!(server = %server, "DNS server set");
        self.server.store(Some(Arc::new(server)));
    }

    /// Parses and stores a user-supplied server address.
    ///
    /// Only IP literals are accepted: resolving a hostname here would need the
    /// very server being configured.
    pub fn set_from_str(&self, text: &str) -> Result<IpAddr, DomainError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DomainError::InvalidIpAddress(
                "DNS server address is blank".to_string(),
            ));
        }
        let server: IpAddr = text
            .parse()
            .map_err(|_| DomainError::InvalidIpAddress(format!("'{}' is not an IP address", text)))?;
        self.set(server);
        Ok(server)
    }

    pub fn clear(&self) {
        self.server.store(None);
    }

    /// The configured server, `None` when unset.
    pub fn get(&self) -> Option<IpAddr> {
        self.server.load().as_deref().copied()
    }

    /// The configured server, or [`DEFAULT_DNS_SERVER`].
    pub fn effective(&self) -> IpAddr {
        self.get().unwrap_or(DEFAULT_DNS_SERVER)
    }
}
