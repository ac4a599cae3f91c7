//! UDP Transport for DNS queries (RFC 1035 §4.2.1)
//!
//! One socket per exchange: bound to an ephemeral port, used for a single
//! query/response pair and closed when the exchange returns, on every path.

use super::dns_server::DnsServerSetting;
use crate::dns::wire::{self, MAX_UDP_MESSAGE_SIZE};
use peerdns_domain::{DomainError, RecordType};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// DNS over UDP transport
pub struct UdpTransport {
    server_addr: SocketAddr,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server_addr
    }

    /// Sends `message` and waits up to `timeout` for each of the send and the
    /// single response datagram.
    pub async fn exchange(
        &self,
        message: &[u8],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr = if self.server_addr.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;

        let bytes_sent = tokio::time::timeout(timeout, socket.send_to(message, self.server_addr))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| {
                DomainError::IoError(format!(
                    "Failed to send UDP query to {}: {}",
                    self.server_addr, e
                ))
            })?;

        debug!(
            server = %self.server_addr,
            bytes_sent = bytes_sent,
            "UDP query sent"
        );

        let mut recv_buf = vec![0u8; MAX_UDP_MESSAGE_SIZE];

        let (bytes_received, from_addr) =
            tokio::time::timeout(timeout, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| DomainError::TransportTimeout {
                    server: self.server_addr.to_string(),
                })?
                .map_err(|e| {
                    DomainError::IoError(format!(
                        "Failed to receive UDP response from {}: {}",
                        self.server_addr, e
                    ))
                })?;

        if from_addr.ip() != self.server_addr.ip() {
            warn!(
                expected = %self.server_addr,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);

        // Unconnected socket: an off-path datagram may arrive first.
        if wire::message_id(&recv_buf) != wire::message_id(message) {
            warn!(
                server = %self.server_addr,
                received_from = %from_addr,
                "UDP response transaction ID does not match the query"
            );
            return Err(DomainError::InvalidDnsResponse(format!(
                "Transaction ID mismatch in response from {}",
                from_addr
            )));
        }

        debug!(
            server = %self.server_addr,
            bytes_received = bytes_received,
            "UDP response received"
        );

        Ok(recv_buf)
    }
}

/// Plain DNS lookups of A then AAAA records against the configured server.
pub struct UdpDnsResolver {
    server: Arc<DnsServerSetting>,
}

impl Default for UdpDnsResolver {
    fn default() -> Self {
        Self::new(DnsServerSetting::global())
    }
}

impl UdpDnsResolver {
    pub fn new(server: Arc<DnsServerSetting>) -> Self {
        Self { server }
    }

    pub fn server_setting(&self) -> &Arc<DnsServerSetting> {
        &self.server
    }

    /// Every A address followed by every AAAA address for `domain`.
    ///
    /// Each record type gets up to `retries` attempts (at least one). When all
    /// attempts for a type fail, that failure is returned and later types are
    /// not queried.
    pub async fn resolve(
        &self,
        domain: &str,
        timeout_secs: u64,
        retries: u32,
        port: u16,
    ) -> Result<Vec<IpAddr>, DomainError> {
        let server_addr = SocketAddr::new(self.server.effective(), port);
        let transport = UdpTransport::new(server_addr);
        let timeout = Duration::from_secs(timeout_secs);
        let attempts = retries.max(1);

        let mut addresses = Vec::new();
        for record_type in RecordType::ADDRESS_TYPES {
            let query = wire::build_query(domain, record_type)?;
            let found =
                Self::query_with_retries(&transport, &query, record_type, timeout, attempts)
                    .await?;

            debug!(
                domain = %domain,
                record_type = %record_type,
                server = %server_addr,
                count = found.len(),
                "UDP lookup answered"
            );
            addresses.extend(found);
        }

        Ok(addresses)
    }

    async fn query_with_retries(
        transport: &UdpTransport,
        query: &[u8],
        record_type: RecordType,
        timeout: Duration,
        attempts: u32,
    ) -> Result<Vec<IpAddr>, DomainError> {
        let mut attempt = 1;
        loop {
            let result = match transport.exchange(query, timeout).await {
                Ok(response) => wire::parse_response(&response, record_type),
                Err(e) => Err(e),
            };

            match result {
                Ok(found) => return Ok(found),
                Err(e) if attempt < attempts => {
                    debug!(
                        server = %transport.server_addr(),
                        record_type = %record_type,
                        attempt = attempt,
                        error = %e,
                        "UDP attempt failed, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Points the process-wide setting at `server`.
pub fn set_dns_server(server: IpAddr) {
    DnsServerSetting::global().set(server);
}

pub fn dns_server() -> Option<IpAddr> {
    DnsServerSetting::global().get()
}

pub fn clear_dns_server() {
    DnsServerSetting::global().clear();
}

pub fn set_dns_server_str(text: &str) -> Result<IpAddr, DomainError> {
    DnsServerSetting::global().set_from_str(text)
}
