pub mod resolver;
pub mod transport;
pub mod wire;

pub use resolver::{DohHostResolver, UdpHostResolver};
pub use transport::{DnsServerSetting, DohJsonClient, UdpDnsResolver, UdpTransport};
