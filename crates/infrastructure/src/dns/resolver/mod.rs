pub mod doh;
pub mod udp;

pub use doh::DohHostResolver;
pub use udp::UdpHostResolver;
