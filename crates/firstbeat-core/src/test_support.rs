//! Shared fakes for loader and catalog tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Notify;

use crate::clock::Clock;
use crate::error::{RemoteConfigError, Result};
use crate::remote::RemoteSource;

pub(crate) fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

pub(crate) struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub(crate) fn new(secs: i64) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(at(secs)),
        })
    }

    pub(crate) fn set(&self, secs: i64) {
        self.set_to(at(secs));
    }

    pub(crate) fn set_to(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Clone)]
pub(crate) enum StubResponse {
    Serve(Vec<u8>),
    /// Wait for the gate to open, then serve.
    Gated(Arc<Notify>, Vec<u8>),
    Fail,
    /// Never completes.
    Hang,
}

/// Scripted `RemoteSource`. Queued responses are used first, then the
/// fallback response for every further call.
pub(crate) struct StubSource {
    queue: Mutex<Vec<StubResponse>>,
    fallback: Mutex<StubResponse>,
    calls: AtomicUsize,
}

impl StubSource {
    pub(crate) fn new(fallback: StubResponse) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(Vec::new()),
            fallback: Mutex::new(fallback),
            calls: AtomicUsize::new(0),
        })
    }

    pub(crate) fn serving(body: &str) -> Arc<Self> {
        Self::new(StubResponse::Serve(body.as_bytes().to_vec()))
    }

    pub(crate) fn failing() -> Arc<Self> {
        Self::new(StubResponse::Fail)
    }

    pub(crate) fn set(&self, response: StubResponse) {
        *self.fallback.lock().unwrap() = response;
    }

    pub(crate) fn serve(&self, body: &str) {
        self.set(StubResponse::Serve(body.as_bytes().to_vec()));
    }

    pub(crate) fn push(&self, response: StubResponse) {
        self.queue.lock().unwrap().push(response);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_response(&self) -> StubResponse {
        let mut queue = self.queue.lock().unwrap();
        if queue.is_empty() {
            self.fallback.lock().unwrap().clone()
        } else {
            queue.remove(0)
        }
    }
}

#[async_trait]
impl RemoteSource for StubSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.next_response();
        self.calls.fetch_add(1, Ordering::SeqCst);
        match response {
            StubResponse::Serve(bytes) => Ok(bytes),
            StubResponse::Gated(gate, bytes) => {
                gate.notified().await;
                Ok(bytes)
            }
            StubResponse::Fail => Err(RemoteConfigError::BadStatus {
                url: url.to_string(),
                status: 503,
                body: "unavailable".to_string(),
            }),
            StubResponse::Hang => {
                std::future::pending::<()>().await;
                unreachable!()
            }
        }
    }
}

/// Poll `check` until it holds, yielding to background tasks in between.
pub(crate) async fn wait_until(mut check: impl FnMut() -> bool) {
    for _ in 0..500 {
        if check() {
            return;
        }
        tokio::time::sleep(StdDuration::from_millis(10)).await;
    }
    panic!("condition not met in time");
}
