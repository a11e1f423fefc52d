// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock generation backend for deterministic testing.
//!
//! `MockBackend` implements `GenerationBackend` with scripted replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use memoria_core::{GenerationBackend, MemoriaError};

/// One scripted reaction of a [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Return this text.
    Text(String),
    /// Fail with a provider error carrying this message.
    Fail(String),
    /// Never complete. Pair with a paused tokio clock to exercise timeouts.
    Hang,
}

/// A request observed by a [`MockBackend`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockRequest {
    pub system_instruction: String,
    pub user_input: String,
}

/// A generation backend that replays scripted replies.
///
/// Replies are popped from a FIFO queue. When the queue is empty the
/// fallback reply is used.
pub struct MockBackend {
    name: String,
    replies: Mutex<VecDeque<MockReply>>,
    fallback: MockReply,
    requests: Mutex<Vec<MockRequest>>,
    calls: AtomicUsize,
}

impl MockBackend {
    fn with_fallback(name: &str, fallback: MockReply) -> Self {
        Self {
            name: name.to_string(),
            replies: Mutex::new(VecDeque::new()),
            fallback,
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// A backend that always answers with `text`.
    pub fn replying(name: &str, text: &str) -> Self {
        Self::with_fallback(name, MockReply::Text(text.to_string()))
    }

    /// A backend that always fails.
    pub fn failing(name: &str) -> Self {
        Self::with_fallback(name, MockReply::Fail(format!("{name} is unavailable")))
    }

    /// A backend that never answers.
    pub fn hanging(name: &str) -> Self {
        Self::with_fallback(name, MockReply::Hang)
    }

    /// A backend that plays `replies` in order, then fails.
    pub fn scripted(name: &str, replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            ..Self::failing(name)
        }
    }

    /// Queue a reply ahead of the fallback.
    pub async fn push_reply(&self, reply: MockReply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Number of times `generate` has been invoked.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, oldest first.
    pub async fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<MockRequest> {
        self.requests.lock().await.last().cloned()
    }
}

#[async_trait]
impl GenerationBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        system_instruction: &str,
        user_input: &str,
    ) -> Result<String, MemoriaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(MockRequest {
            system_instruction: system_instruction.to_string(),
            user_input: user_input.to_string(),
        });

        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(MemoriaError::provider(message)),
            MockReply::Hang => std::future::pending().await,
        }
    }
}
