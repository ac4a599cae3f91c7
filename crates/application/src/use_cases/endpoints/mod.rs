mod resolve_endpoint;

pub use resolve_endpoint::ResolveEndpointUseCase;
