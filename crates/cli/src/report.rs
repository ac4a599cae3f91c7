use futures::future::join_all;
use peerdns_application::use_cases::ResolveEndpointUseCase;
use peerdns_domain::Endpoint;
use std::time::Duration;
use tracing::info;

/// Prints one line per endpoint and returns how many stayed unresolved.
pub async fn resolve_once(use_case: &ResolveEndpointUseCase, endpoints: &[Endpoint]) -> usize {
    let outcomes = join_all(endpoints.iter().map(|endpoint| use_case.execute(endpoint))).await;

    let mut unresolved = 0;
    for (endpoint, resolved) in endpoints.iter().zip(&outcomes) {
        if resolved.is_none() {
            unresolved += 1;
        }
        println!("{}", format_outcome(endpoint, resolved.as_ref()));
    }
    unresolved
}

/// Re-resolves on every tick until Ctrl-C. Lookups inside the resolution
/// cooldown are served from each endpoint's cache.
pub async fn watch(
    use_case: &ResolveEndpointUseCase,
    endpoints: &[Endpoint],
    period: Duration,
) -> std::io::Result<()> {
    let mut ticker = tokio::time::interval(period);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                info!("Interrupted");
                return result;
            }
            _ = ticker.tick() => {
                let unresolved = resolve_once(use_case, endpoints).await;
                info!(total = endpoints.len(), unresolved = unresolved, "Watch round complete");
            }
        }
    }
}

pub fn format_outcome(original: &Endpoint, resolved: Option<&Endpoint>) -> String {
    match resolved {
        Some(resolved) => format!("{} -> {}", original, resolved),
        None => format!("{} -> unresolved", original),
    }
}
