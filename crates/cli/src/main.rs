use anyhow::Context;
use clap::Parser;
use peerdns_domain::{CliOverrides, Endpoint, ResolutionStrategy};
use std::net::IpAddr;
use std::time::Duration;
use tracing::info;

mod bootstrap;
mod di;
mod report;

#[derive(Parser)]
#[command(name = "peerdns")]
#[command(version)]
#[command(about = "Resolve VPN peer endpoints over DNS-over-HTTPS and plain UDP DNS")]
struct Cli {
    /// Endpoints to resolve, as host:port or [ipv6]:port
    #[arg(required = true, value_name = "ENDPOINT")]
    endpoints: Vec<String>,

    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Resolution strategy (doh, udp, fallback)
    #[arg(long)]
    strategy: Option<ResolutionStrategy>,

    /// UDP DNS server address
    #[arg(long, value_name = "IP")]
    dns_server: Option<IpAddr>,

    /// UDP DNS server port
    #[arg(long)]
    dns_port: Option<u16>,

    /// Per-attempt UDP timeout in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// UDP attempts per record type
    #[arg(long)]
    retries: Option<u32>,

    /// DoH JSON endpoint
    #[arg(long, value_name = "URL")]
    doh_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Re-resolve every SECONDS until interrupted
    #[arg(long, value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    watch: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        strategy: cli.strategy,
        dns_server: cli.dns_server,
        dns_port: cli.dns_port,
        timeout_secs: cli.timeout,
        retries: cli.retries,
        doh_url: cli.doh_url.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config.logging);

    info!("Starting peerdns v{}", env!("CARGO_PKG_VERSION"));

    let endpoints = cli
        .endpoints
        .iter()
        .map(|text| Endpoint::parse(text).with_context(|| format!("Invalid endpoint '{}'", text)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let resolvers = di::Resolvers::new(&config.resolver);

    match cli.watch {
        Some(secs) => {
            report::watch(
                &resolvers.resolve_endpoint,
                &endpoints,
                Duration::from_secs(secs),
            )
            .await?;
            info!("Watch stopped");
            Ok(())
        }
        None => {
            let unresolved = report::resolve_once(&resolvers.resolve_endpoint, &endpoints).await;
            if unresolved > 0 {
                anyhow::bail!(
                    "{} of {} endpoints could not be resolved",
                    unresolved,
                    endpoints.len()
                );
            }
            Ok(())
        }
    }
}
