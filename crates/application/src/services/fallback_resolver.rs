use crate::ports::HostResolver;
use async_trait::async_trait;
use peerdns_domain::DomainError;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::debug;

/// Tries each strategy in order until one produces an address.
pub struct FallbackResolver {
    strategies: Vec<Arc<dyn HostResolver>>,
}

impl FallbackResolver {
    pub fn new(strategies: Vec<Arc<dyn HostResolver>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }
}

#[async_trait]
impl HostResolver for FallbackResolver {
    async fn resolve(&self, hostname: &str) -> Result<Option<IpAddr>, DomainError> {
        let mut last_error = None;
        let mut answered = false;

        for strategy in &self.strategies {
            match strategy.resolve(hostname).await {
                Ok(Some(ip)) => {
                    debug!(hostname = %hostname, strategy = strategy.name(), ip = %ip, "Resolved");
                    return Ok(Some(ip));
                }
                Ok(None) => {
                    debug!(hostname = %hostname, strategy = strategy.name(), "No usable answer");
                    answered = true;
                }
                Err(e) => {
                    debug!(hostname = %hostname, strategy = strategy.name(), error = %e, "Strategy failed");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(e) if !answered => Err(e),
            _ => Ok(None),
        }
    }

    fn name(&self) -> &'static str {
        "fallback"
    }
}
