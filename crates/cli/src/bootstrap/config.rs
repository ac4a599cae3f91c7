use anyhow::Context;
use peerdns_domain::{CliOverrides, Config};

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    Config::load(path, overrides).with_context(|| match path {
        Some(path) => format!("Failed to load configuration from {}", path),
        None => "Failed to load configuration".to_string(),
    })
}
