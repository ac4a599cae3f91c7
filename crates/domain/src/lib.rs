//! peerdns domain layer: the peer endpoint value and its resolution policy.
pub mod config;
pub mod endpoint;
pub mod errors;
pub mod nat64;
pub mod record_type;

pub use config::{CliOverrides, Config, ConfigError, ResolutionStrategy, ResolverConfig};
pub use endpoint::{Endpoint, RESOLUTION_COOLDOWN};
pub use errors::DomainError;
pub use record_type::RecordType;
