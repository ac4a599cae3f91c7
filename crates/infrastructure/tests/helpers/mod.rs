mod dns_server_mock;
mod doh_server_mock;

pub use dns_server_mock::MockDnsServer;
pub use doh_server_mock::MockDohServer;
