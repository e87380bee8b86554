#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use enricher_engine::{FailureKind, FetchError, Transport, TransportResponse};

/// One scripted answer of the stub transport.
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond {
        status: u16,
        body: String,
        delay: Duration,
    },
    Fail(FailureKind),
}

impl Scripted {
    pub fn ok(body: &str) -> Self {
        Self::Respond {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn ok_after(body: &str, delay: Duration) -> Self {
        Self::Respond {
            status: 200,
            body: body.to_string(),
            delay,
        }
    }

    pub fn status(status: u16) -> Self {
        Self::Respond {
            status,
            body: String::new(),
            delay: Duration::ZERO,
        }
    }
}

/// In-memory transport: answers per URL from a script (the last entry
/// repeats), 404 for unknown URLs, and records calls and peak concurrency.
pub struct StubTransport {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    default_delay: Duration,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl StubTransport {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(HashMap::new()),
            default_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn with_default_delay(mut self, delay: Duration) -> Self {
        self.default_delay = delay;
        self
    }

    pub fn page(self, url: &str, body: &str) -> Self {
        self.script(url, vec![Scripted::ok(body)])
    }

    pub fn script(self, url: &str, answers: Vec<Scripted>) -> Self {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), answers.into());
        self
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.as_str() == url)
            .count()
    }

    pub fn calls_with_prefix(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|called| called.starts_with(prefix))
            .count()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    fn next_answer(&self, url: &str) -> Scripted {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap_or_else(|| Scripted::status(404)),
            None => Scripted::status(404),
        }
    }
}

#[async_trait::async_trait]
impl Transport for StubTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let answer = self.next_answer(url);
        let delay = match &answer {
            Scripted::Respond { delay, .. } if !delay.is_zero() => *delay,
            _ => self.default_delay,
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        match answer {
            Scripted::Respond { status, body, .. } => Ok(TransportResponse::new(status, body)),
            Scripted::Fail(kind) => Err(FetchError::new(kind, "scripted failure")),
        }
    }
}
