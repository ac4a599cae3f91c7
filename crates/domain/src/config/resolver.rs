use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::str::FromStr;
use std::time::Duration;

/// Which transport(s) resolve endpoint hostnames.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    Doh,

    Udp,

    /// DoH first, raw UDP when DoH fails or has no answer.
    #[default]
    Fallback,
}

impl ResolutionStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Doh => "doh",
            Self::Udp => "udp",
            Self::Fallback => "fallback",
        }
    }
}

impl FromStr for ResolutionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "doh" => Ok(Self::Doh),
            "udp" => Ok(Self::Udp),
            "fallback" => Ok(Self::Fallback),
            _ => Err(format!(
                "Invalid strategy '{}'. Expected: doh, udp or fallback",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResolverConfig {
    #[serde(default)]
    pub strategy: ResolutionStrategy,

    /// UDP DNS server; the transport falls back to its built-in default when unset.
    #[serde(default)]
    pub dns_server: Option<IpAddr>,

    #[serde(default = "default_dns_port")]
    pub dns_port: u16,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_retries")]
    pub retries: u32,

    #[serde(default = "default_doh_url")]
    pub doh_url: String,

    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl ResolverConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            strategy: ResolutionStrategy::default(),
            dns_server: None,
            dns_port: default_dns_port(),
            timeout_secs: default_timeout_secs(),
            retries: default_retries(),
            doh_url: default_doh_url(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

fn default_dns_port() -> u16 {
    53
}

fn default_timeout_secs() -> u64 {
    2
}

fn default_retries() -> u32 {
    3
}

fn default_doh_url() -> String {
    "https://223.5.5.5/resolve".to_string()
}

fn default_cooldown_secs() -> u64 {
    10
}
