#![allow(dead_code)]
use async_trait::async_trait;
use peerdns_application::ports::HostResolver;
use peerdns_domain::DomainError;
use std::collections::VecDeque;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Replays scripted results in order; repeats the last one once exhausted.
pub struct MockHostResolver {
    name: &'static str,
    script: Mutex<VecDeque<Result<Option<IpAddr>, DomainError>>>,
    last: Mutex<Result<Option<IpAddr>, DomainError>>,
    calls: AtomicUsize,
    delay: Option<Duration>,
}

impl MockHostResolver {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            script: Mutex::new(VecDeque::new()),
            last: Mutex::new(Ok(None)),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    pub fn answering(name: &'static str, ip: &str) -> Self {
        Self::new(name).then(Ok(Some(ip.parse().unwrap())))
    }

    pub fn empty(name: &'static str) -> Self {
        Self::new(name).then(Ok(None))
    }

    pub fn failing(name: &'static str) -> Self {
        Self::new(name).then(Err(DomainError::TransportTimeout {
            server: "223.5.5.5:53".to_string(),
        }))
    }

    pub fn then(self, result: Result<Option<IpAddr>, DomainError>) -> Self {
        self.script.lock().unwrap().push_back(result);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HostResolver for MockHostResolver {
    async fn resolve(&self, _hostname: &str) -> Result<Option<IpAddr>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => {
                *self.last.lock().unwrap() = result.clone();
                result
            }
            None => self.last.lock().unwrap().clone(),
        }
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
