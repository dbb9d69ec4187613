//! In-memory transport for tests.

use crate::error::{BridgeError, BridgeResult};
use crate::transport::Transport;
use crate::types::CommandRequest;
use serde_json::Value;
use std::collections::VecDeque;
use tokio::sync::Mutex;

enum Scripted {
    Frame(Vec<u8>),
    Error(fn() -> BridgeError),
}

/// Answers each exchange with the next queued frame and records every
/// request it was given.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<CommandRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply (newline appended).
    pub async fn reply(&self, value: Value) -> &Self {
        let mut frame = value.to_string().into_bytes();
        frame.push(b'\n');
        self.replies.lock().await.push_back(Scripted::Frame(frame));
        self
    }

    /// Queue a raw frame, sent exactly as given.
    pub async fn reply_raw(&self, frame: &[u8]) -> &Self {
        self.replies
            .lock()
            .await
            .push_back(Scripted::Frame(frame.to_vec()));
        self
    }

    /// Queue a transport failure.
    pub async fn fail(&self, error: fn() -> BridgeError) -> &Self {
        self.replies.lock().await.push_back(Scripted::Error(error));
        self
    }

    /// Requests seen so far, in order.
    pub async fn requests(&self) -> Vec<CommandRequest> {
        self.requests.lock().await.clone()
    }

    pub async fn last_request(&self) -> Option<CommandRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, payload: &[u8]) -> BridgeResult<Vec<u8>> {
        let request: CommandRequest =
            serde_json::from_slice(payload).map_err(BridgeError::Encode)?;
        self.requests.lock().await.push(request);

        match self.replies.lock().await.pop_front() {
            Some(Scripted::Frame(frame)) => Ok(frame),
            Some(Scripted::Error(make)) => Err(make()),
            None => Err(BridgeError::EmptyResponse),
        }
    }

    fn endpoint(&self) -> String {
        "scripted".to_string()
    }
}
