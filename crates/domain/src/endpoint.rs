use crate::errors::DomainError;
use crate::nat64;
use std::fmt;
use std::future::Future;
use std::hash::{Hash, Hasher};
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Minimum time between two resolution attempts of the same endpoint.
pub const RESOLUTION_COOLDOWN: Duration = Duration::from_secs(10);

const FORBIDDEN_CHARACTERS: [char; 3] = ['/', '?', '#'];

#[derive(Debug, Default)]
struct ResolutionCache {
    /// `None` stands for "never attempted", so the first lookup always runs.
    last_resolution: Option<Instant>,
    resolved: Option<Endpoint>,
}

/// External address (host and port) of a peer.
///
/// Identity is `(host, port)`. A host that is already an IP literal is
/// "numeric" and resolves to the endpoint itself. Any other host is a DNS
/// name, resolved lazily by [`Endpoint::resolved_with`] and cached for
/// [`RESOLUTION_COOLDOWN`]. Clones share the same cache.
#[derive(Clone)]
pub struct Endpoint {
    host: Arc<str>,
    port: u16,
    is_numeric: bool,
    cache: Option<Arc<Mutex<ResolutionCache>>>,
}

impl Endpoint {
    pub fn parse(endpoint: &str) -> Result<Self, DomainError> {
        if endpoint.contains(FORBIDDEN_CHARACTERS) {
            return Err(DomainError::invalid_endpoint(
                endpoint,
                "Forbidden characters",
            ));
        }

        let (host, port) = split_authority(endpoint)?;

        if host_literal(host).parse::<IpAddr>().is_ok() {
            Ok(Self::numeric(host, port))
        } else {
            Ok(Self {
                host: host.into(),
                port,
                is_numeric: false,
                cache: Some(Arc::new(Mutex::new(ResolutionCache::default()))),
            })
        }
    }

    /// Numeric endpoint for an address obtained from DNS.
    pub fn from_resolved(ip: IpAddr, port: u16) -> Self {
        Self::numeric(&ip.to_string(), port)
    }

    fn numeric(host: &str, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            is_numeric: true,
            cache: None,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn is_numeric(&self) -> bool {
        self.is_numeric
    }

    /// The host as an address, for numeric endpoints only.
    pub fn ip(&self) -> Option<IpAddr> {
        if !self.is_numeric {
            return None;
        }
        host_literal(&self.host).parse().ok()
    }

    /// Returns this endpoint with its host resolved to an IP literal.
    ///
    /// Numeric endpoints return themselves without locking. For DNS names the
    /// per-endpoint lock is held for the whole attempt, so concurrent callers
    /// never run `lookup` twice; they wait and read the fresh cache instead.
    /// `lookup` only runs when the last attempt is older than `cooldown`.
    ///
    /// A failed or empty lookup clears the cached value. The attempt time is
    /// recorded either way.
    pub async fn resolved_with<F, Fut>(&self, cooldown: Duration, lookup: F) -> Option<Endpoint>
    where
        F: FnOnce(Arc<str>) -> Fut,
        Fut: Future<Output = Result<Option<IpAddr>, DomainError>>,
    {
        let Some(cache) = &self.cache else {
            return Some(self.clone());
        };

        let mut cache = cache.lock().await;

        let stale = cache
            .last_resolution
            .map_or(true, |last| last.elapsed() > cooldown);

        if stale {
            cache.resolved = match lookup(self.host.clone()).await {
                Ok(Some(ip)) => {
                    let (addr, embedded_port) = nat64::unwrap_embedded(ip);
                    Some(Endpoint::from_resolved(
                        addr,
                        embedded_port.unwrap_or(self.port),
                    ))
                }
                Ok(None) | Err(_) => None,
            };
            cache.last_resolution = Some(Instant::now());
        }

        cache.resolved.clone()
    }
}

/// Splits `host:port` the way a `scheme://host:port` URI authority would.
fn split_authority(endpoint: &str) -> Result<(&str, u16), DomainError> {
    let invalid_port = || DomainError::invalid_endpoint(endpoint, "Missing/invalid port number");

    let (host, port_str) = if endpoint.starts_with('[') {
        let end = endpoint
            .find(']')
            .ok_or_else(|| DomainError::invalid_endpoint(endpoint, "Unterminated IPv6 literal"))?;
        let host = &endpoint[..=end];
        if host_literal(host).parse::<std::net::Ipv6Addr>().is_err() {
            return Err(DomainError::invalid_endpoint(
                endpoint,
                "Malformed IPv6 literal",
            ));
        }
        let port_str = endpoint[end + 1..].strip_prefix(':').ok_or_else(invalid_port)?;
        (host, port_str)
    } else {
        let (host, port_str) = endpoint.rsplit_once(':').ok_or_else(invalid_port)?;
        // Hosts outside the server-authority grammar leave no host to read
        // a port from, hence the port error.
        if host.parse::<std::net::Ipv4Addr>().is_err() && !is_valid_hostname(host) {
            return Err(invalid_port());
        }
        (host, port_str)
    };

    if port_str.is_empty() || !port_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_port());
    }
    let port = port_str.parse::<u16>().map_err(|_| invalid_port())?;

    Ok((host, port))
}

/// RFC 2396 hostname: `*( domainlabel "." ) toplabel [ "." ]`, where the
/// top label starts with a letter.
fn is_valid_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    let mut labels = host.rsplit('.');

    let top_is_valid = labels.next().is_some_and(|top| {
        top.starts_with(|c: char| c.is_ascii_alphabetic()) && is_valid_label(top)
    });

    top_is_valid && labels.all(is_valid_label)
}

/// `alphanum | alphanum *( alphanum | "-" ) alphanum`
fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

fn host_literal(host: &str) -> &str {
    host.strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host)
}

impl FromStr for Endpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        self.host == other.host && self.port == other.port
    }
}

impl Eq for Endpoint {}

impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host.hash(state);
        self.port.hash(state);
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bare_ipv6 = self.is_numeric && self.host.contains(':') && !self.host.contains('[');
        if bare_ipv6 {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("is_numeric", &self.is_numeric)
            .finish()
    }
}
