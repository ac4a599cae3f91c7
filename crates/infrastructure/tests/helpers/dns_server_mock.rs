#![allow(dead_code)]
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

const TYPE_A: u16 = 1;
const TYPE_AAAA: u16 = 28;

/// Answers A/AAAA questions with fixed addresses on 127.0.0.1.
pub struct MockDnsServer {
    addr: SocketAddr,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

#[derive(Default, Clone)]
pub struct MockDnsServerBuilder {
    a: Vec<Ipv4Addr>,
    aaaa: Vec<Ipv6Addr>,
    drop_first: usize,
    mismatch_first: usize,
}

impl MockDnsServerBuilder {
    pub fn a(mut self, ip: &str) -> Self {
        self.a.push(ip.parse().unwrap());
        self
    }

    pub fn aaaa(mut self, ip: &str) -> Self {
        self.aaaa.push(ip.parse().unwrap());
        self
    }

    /// Swallow the first `n` queries without answering.
    pub fn drop_first(mut self, n: usize) -> Self {
        self.drop_first = n;
        self
    }

    /// Answer the first `n` queries with a wrong transaction ID.
    pub fn mismatch_first(mut self, n: usize) -> Self {
        self.mismatch_first = n;
        self
    }

    pub async fn start(self) -> Result<MockDnsServer, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let counter = queries.clone();

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let seen = counter.fetch_add(1, Ordering::SeqCst);
                            if seen < self.drop_first {
                                continue;
                            }
                            let mut response = self.build_response(&buf[..len]);
                            if seen < self.drop_first + self.mismatch_first && response.len() >= 2 {
                                response[0] ^= 0xff;
                            }
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(MockDnsServer {
            addr,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    fn build_response(&self, query: &[u8]) -> Vec<u8> {
        if query.len() < 16 {
            return vec![];
        }

        let qtype = u16::from_be_bytes([query[query.len() - 4], query[query.len() - 3]]);
        let rdatas: Vec<Vec<u8>> = match qtype {
            TYPE_A => self.a.iter().map(|ip| ip.octets().to_vec()).collect(),
            TYPE_AAAA => self.aaaa.iter().map(|ip| ip.octets().to_vec()).collect(),
            _ => Vec::new(),
        };

        let mut response = Vec::with_capacity(512);
        response.extend_from_slice(&query[0..2]);
        response.extend_from_slice(&[0x81, 0x80]);
        response.extend_from_slice(&query[4..6]);
        response.extend_from_slice(&(rdatas.len() as u16).to_be_bytes());
        response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        response.extend_from_slice(&query[12..]);

        for rdata in rdatas {
            response.extend_from_slice(&[0xc0, 0x0c]);
            response.extend_from_slice(&qtype.to_be_bytes());
            response.extend_from_slice(&[0x00, 0x01, 0x00, 0x00, 0x00, 0x3c]);
            response.extend_from_slice(&(rdata.len() as u16).to_be_bytes());
            response.extend_from_slice(&rdata);
        }

        response
    }
}

impl MockDnsServer {
    pub fn builder() -> MockDnsServerBuilder {
        MockDnsServerBuilder::default()
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
