mod event_counter;
mod mock_resolvers;

#[allow(unused_imports)]
pub use event_counter::EventCounter;
pub use mock_resolvers::MockHostResolver;
