use crate::upstream::Upstream;
use anyhow::anyhow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// In-memory upstream answering from a fixed path table. Unknown paths fail.
#[derive(Debug, Default)]
pub(crate) struct FakeUpstream {
    responses: HashMap<String, String>,
    calls: Mutex<Vec<String>>,
    delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeUpstream {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with(mut self, path: &str, body: &str) -> Self {
        self.responses.insert(path.to_owned(), body.to_owned());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Upstream for FakeUpstream {
    async fn fetch(&self, path: &str) -> Result<String, anyhow::Error> {
        self.calls.lock().unwrap().push(path.to_owned());
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.responses
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("500 Internal Server Error for {path}"))
    }
}
