//! `MockRequester` — a test double for `HttpRequester`.
//!
//! Records every request it receives and answers with a programmer-specified
//! response, so node tests never touch the network.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::http::HttpRequest;
use crate::{HttpError, HttpRequester};

/// Behaviour injected into `MockRequester` at construction time.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Answer every request with this JSON value.
    ReturnValue(Value),
    /// Fail every request with this error.
    Fail(HttpError),
    /// Answer requests in order; once exhausted, fail with a transport error.
    Sequence(Vec<Result<Value, HttpError>>),
}

pub struct MockRequester {
    behaviour: MockBehaviour,
    queue: Mutex<VecDeque<Result<Value, HttpError>>>,
    /// All requests seen (in call order).
    pub calls: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockRequester {
    pub fn new(behaviour: MockBehaviour) -> Self {
        let queue = match &behaviour {
            MockBehaviour::Sequence(responses) => responses.iter().cloned().collect(),
            _ => VecDeque::new(),
        };
        Self {
            behaviour,
            queue: Mutex::new(queue),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A mock that always succeeds with the given value.
    pub fn returning(value: Value) -> Self {
        Self::new(MockBehaviour::ReturnValue(value))
    }

    /// A mock that always fails with the given error.
    pub fn failing(error: HttpError) -> Self {
        Self::new(MockBehaviour::Fail(error))
    }

    /// A mock that replays `responses` one per call.
    pub fn sequence(responses: Vec<Result<Value, HttpError>>) -> Self {
        Self::new(MockBehaviour::Sequence(responses))
    }

    /// Number of requests received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Clone of the `n`th request received.
    pub fn call(&self, n: usize) -> Option<HttpRequest> {
        self.calls.lock().ok()?.get(n).cloned()
    }
}

#[async_trait]
impl HttpRequester for MockRequester {
    async fn request(&self, request: HttpRequest) -> Result<Value, HttpError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(request);
        }

        match &self.behaviour {
            MockBehaviour::ReturnValue(value) => Ok(value.clone()),
            MockBehaviour::Fail(error) => Err(error.clone()),
            MockBehaviour::Sequence(_) => self
                .queue
                .lock()
                .ok()
                .and_then(|mut q| q.pop_front())
                .unwrap_or_else(|| Err(HttpError::Transport("mock responses exhausted".into()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn sequence_replays_in_order_then_fails() {
        let mock = MockRequester::sequence(vec![
            Ok(json!({ "n": 1 })),
            Err(HttpError::Status { status: 500, body: "boom".into() }),
        ]);

        let first = mock.request(HttpRequest::get("http://x/1")).await;
        let second = mock.request(HttpRequest::get("http://x/2")).await;
        let third = mock.request(HttpRequest::get("http://x/3")).await;

        assert_eq!(first.unwrap(), json!({ "n": 1 }));
        assert!(matches!(second, Err(HttpError::Status { status: 500, .. })));
        assert!(matches!(third, Err(HttpError::Transport(_))));
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.call(1).unwrap().url, "http://x/2");
    }
}
