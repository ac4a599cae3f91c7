use crate::ports::HostResolver;
use peerdns_domain::{Endpoint, RESOLUTION_COOLDOWN};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub struct ResolveEndpointUseCase {
    resolver: Arc<dyn HostResolver>,
    cooldown: Duration,
}

impl ResolveEndpointUseCase {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Self {
        Self {
            resolver,
            cooldown: RESOLUTION_COOLDOWN,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    /// May block on network I/O for as long as the configured transport
    /// timeouts allow; never call it from a latency-sensitive task.
    pub async fn execute(&self, endpoint: &Endpoint) -> Option<Endpoint> {
        if endpoint.is_numeric() {
            return Some(endpoint.clone());
        }

        let resolver = Arc::clone(&self.resolver);
        let resolved = endpoint
            .resolved_with(self.cooldown, |host| async move {
                debug!(host = %host, strategy = resolver.name(), "Resolving endpoint host");
                let result = resolver.resolve(&host).await;
                match &result {
                    Ok(Some(ip)) => {
                        info!(host = %host, strategy = resolver.name(), ip = %ip, "Endpoint host resolved")
                    }
                    Ok(None) => {
                        warn!(host = %host, strategy = resolver.name(), "Endpoint host has no address")
                    }
                    Err(e) => {
                        warn!(host = %host, strategy = resolver.name(), error = %e, "Endpoint resolution failed")
                    }
                }
                result
            })
            .await;

        match &resolved {
            Some(r) => debug!(endpoint = %endpoint, resolved = %r, "Endpoint address"),
            None => debug!(endpoint = %endpoint, "Endpoint has no resolved address"),
        }

        resolved
    }
}
