pub mod dns_server;
pub mod doh;
pub mod udp;

pub use dns_server::{DnsServerSetting, DEFAULT_DNS_SERVER};
pub use doh::{DohJsonClient, DEFAULT_DOH_URL};
pub use udp::{
    clear_dns_server, dns_server, set_dns_server, set_dns_server_str, UdpDnsResolver, UdpTransport,
};
