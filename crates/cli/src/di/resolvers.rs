use peerdns_application::ports::HostResolver;
use peerdns_application::services::FallbackResolver;
use peerdns_application::use_cases::ResolveEndpointUseCase;
use peerdns_domain::{ResolutionStrategy, ResolverConfig};
use peerdns_infrastructure::dns::transport::{
    dns_server, set_dns_server, DnsServerSetting, DohJsonClient, DEFAULT_DNS_SERVER,
};
use peerdns_infrastructure::dns::{DohHostResolver, UdpHostResolver};
use std::sync::Arc;
use tracing::info;

pub struct Resolvers {
    pub resolve_endpoint: Arc<ResolveEndpointUseCase>,
}

impl Resolvers {
    pub fn new(config: &ResolverConfig) -> Self {
        if let Some(ip) = config.dns_server {
            set_dns_server(ip);
        }
        let server = DnsServerSetting::global();

        let strategy: Arc<dyn HostResolver> = match config.strategy {
            ResolutionStrategy::Doh => Arc::new(Self::doh(config)),
            ResolutionStrategy::Udp => {
                Arc::new(UdpHostResolver::from_config(config, Arc::clone(&server)))
            }
            ResolutionStrategy::Fallback => Arc::new(FallbackResolver::new(vec![
                Arc::new(Self::doh(config)),
                Arc::new(UdpHostResolver::from_config(config, Arc::clone(&server))),
            ])),
        };

        info!(
            strategy = strategy.name(),
            dns_server = %dns_server().unwrap_or(DEFAULT_DNS_SERVER),
            dns_port = config.dns_port,
            doh_url = %config.doh_url,
            cooldown_secs = config.cooldown_secs,
            "Resolvers initialized"
        );

        let resolve_endpoint =
            Arc::new(ResolveEndpointUseCase::new(strategy).with_cooldown(config.cooldown()));

        Self { resolve_endpoint }
    }

    fn doh(config: &ResolverConfig) -> DohHostResolver {
        DohHostResolver::new(DohJsonClient::new(config.doh_url.clone()))
    }
}
