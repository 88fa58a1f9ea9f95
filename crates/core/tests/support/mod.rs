//! Shared test helpers for `tenantform-core` integration tests.
//!
//! [`ScriptedTransport`] stands in for the authenticated HTTP session: tests
//! script one or more replies per `(method, path)` and inspect the calls the
//! reconcilers made afterwards.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tenantform_core::{HttpMethod, PlatformTransport, Remote, TransportResponse};
use tenantform_domain::{ReconcileError, Result};

/// One call the transport received.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

#[derive(Debug, Clone)]
enum Reply {
    Body(u16, Vec<u8>),
    Status(u16),
}

/// In-memory transport with scripted replies.
///
/// Replies queued for the same `(method, path)` are served in order and the
/// last one repeats. Unscripted calls fail with status 404.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<(HttpMethod, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reply 200 with `json`.
    pub fn respond(&self, method: HttpMethod, path: &str, json: Value) -> &Self {
        let body = serde_json::to_vec(&json).unwrap();
        self.push(method, path, Reply::Body(200, body))
    }

    /// Reply 204 with no body.
    pub fn no_content(&self, method: HttpMethod, path: &str) -> &Self {
        self.push(method, path, Reply::Body(204, Vec::new()))
    }

    /// Fail with `status`.
    pub fn fail(&self, method: HttpMethod, path: &str, status: u16) -> &Self {
        self.push(method, path, Reply::Status(status))
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Calls to `path` with `method`, in order.
    pub fn calls_to(&self, method: HttpMethod, path: &str) -> Vec<RecordedCall> {
        self.calls()
            .into_iter()
            .filter(|call| call.method == method && call.path == path)
            .collect()
    }

    fn push(&self, method: HttpMethod, path: &str, reply: Reply) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .entry((method, path.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    fn next_reply(&self, method: HttpMethod, path: &str) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(&(method, path.to_string()))?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

#[async_trait]
impl PlatformTransport for ScriptedTransport {
    async fn execute(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<TransportResponse> {
        let body = body.map(|bytes| serde_json::from_slice(&bytes).unwrap());
        self.calls.lock().unwrap().push(RecordedCall { method, path: path.to_string(), body });

        match self.next_reply(method, path) {
            Some(Reply::Body(status, body)) => Ok(TransportResponse { status, body }),
            Some(Reply::Status(status)) => {
                Err(ReconcileError::Request { status, body: format!("scripted {status}") })
            }
            None => Err(ReconcileError::Request { status: 404, body: "unscripted".into() }),
        }
    }
}

/// `Remote` over `transport`.
pub fn remote(transport: &Arc<ScriptedTransport>) -> Remote {
    Remote::new(transport.clone())
}
