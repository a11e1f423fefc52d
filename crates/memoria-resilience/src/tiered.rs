// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered multi-tier generation client.

use std::sync::Arc;
use std::time::Duration;

use memoria_core::{GenerationBackend, GenerationOutcome, MemoriaError};
use tracing::{debug, warn};

/// Returned when every tier is unavailable.
pub const OFFLINE_SENTINEL: &str =
    "I am currently processing in offline mode and will archive this locally.";

/// Invokes backends in preference order until one produces text.
///
/// Each tier gets exactly one attempt per invocation, bounded by the
/// per-tier timeout. Tiers after the first success are never called.
#[derive(Clone)]
pub struct TieredGenerationClient {
    tiers: Vec<Arc<dyn GenerationBackend>>,
    timeout: Duration,
}

impl TieredGenerationClient {
    /// Creates a client over `tiers`, highest preference first.
    pub fn new(tiers: Vec<Arc<dyn GenerationBackend>>, timeout: Duration) -> Self {
        Self { tiers, timeout }
    }

    /// Names of the configured tiers in preference order.
    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs one attempt against a single tier and classifies the result.
    pub async fn attempt(
        &self,
        tier: &dyn GenerationBackend,
        system_instruction: &str,
        user_input: &str,
    ) -> GenerationOutcome {
        let result = match tokio::time::timeout(
            self.timeout,
            tier.generate(system_instruction, user_input),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(MemoriaError::Timeout {
                duration: self.timeout,
            }),
        };

        match result {
            Ok(text) if !text.trim().is_empty() => GenerationOutcome::Text(text),
            Ok(_) => {
                warn!(tier = tier.name(), "tier returned blank output, treating as unavailable");
                GenerationOutcome::Unavailable
            }
            Err(e) => {
                warn!(tier = tier.name(), error = %e, "tier failed, falling back");
                GenerationOutcome::Unavailable
            }
        }
    }

    /// Returns the first successful tier's text, or [`OFFLINE_SENTINEL`].
    ///
    /// Never fails: per-tier errors are logged and demoted to the next tier.
    pub async fn invoke(&self, system_instruction: &str, user_input: &str) -> String {
        for tier in &self.tiers {
            if let GenerationOutcome::Text(text) = self
                .attempt(tier.as_ref(), system_instruction, user_input)
                .await
            {
                debug!(tier = tier.name(), chars = text.len(), "generation succeeded");
                return text;
            }
        }

        warn!(
            tiers = self.tiers.len(),
            "all generation tiers unavailable, returning offline sentinel"
        );
        OFFLINE_SENTINEL.to_string()
    }
}

impl std::fmt::Debug for TieredGenerationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TieredGenerationClient")
            .field("tiers", &self.tier_names())
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memoria_test_utils::{MockBackend, MockReply};

    fn client(tiers: &[Arc<MockBackend>]) -> TieredGenerationClient {
        let tiers = tiers
            .iter()
            .map(|t| Arc::clone(t) as Arc<dyn GenerationBackend>)
            .collect();
        TieredGenerationClient::new(tiers, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn first_tier_wins_and_later_tiers_are_not_called() {
        let t1 = Arc::new(MockBackend::replying("t1", "from one"));
        let t2 = Arc::new(MockBackend::replying("t2", "from two"));
        let t3 = Arc::new(MockBackend::replying("t3", "from three"));

        let out = client(&[t1.clone(), t2.clone(), t3.clone()])
            .invoke("sys", "hi")
            .await;

        assert_eq!(out, "from one");
        assert_eq!(t1.call_count(), 1);
        assert_eq!(t2.call_count(), 0);
        assert_eq!(t3.call_count(), 0);
    }

    #[tokio::test]
    async fn falls_back_to_first_healthy_tier() {
        let t1 = Arc::new(MockBackend::failing("t1"));
        let t2 = Arc::new(MockBackend::failing("t2"));
        let t3 = Arc::new(MockBackend::replying("t3", "local answer"));

        let out = client(&[t1.clone(), t2.clone(), t3.clone()])
            .invoke("sys", "hi")
            .await;

        assert_eq!(out, "local answer");
        assert_eq!(t1.call_count(), 1);
        assert_eq!(t2.call_count(), 1);
        assert_eq!(t3.call_count(), 1);
    }

    #[tokio::test]
    async fn all_tiers_down_returns_sentinel() {
        let t1 = Arc::new(MockBackend::failing("t1"));
        let t2 = Arc::new(MockBackend::failing("t2"));

        let out = client(&[t1.clone(), t2.clone()]).invoke("sys", "hi").await;

        assert_eq!(out, OFFLINE_SENTINEL);
        assert_eq!(t1.call_count(), 1);
        assert_eq!(t2.call_count(), 1);
    }

    #[tokio::test]
    async fn no_tiers_returns_sentinel() {
        let out = client(&[]).invoke("sys", "hi").await;
        assert_eq!(out, OFFLINE_SENTINEL);
    }

    #[tokio::test]
    async fn blank_output_demotes_to_next_tier() {
        let t1 = Arc::new(MockBackend::replying("t1", "   \n"));
        let t2 = Arc::new(MockBackend::replying("t2", "real text"));

        let out = client(&[t1.clone(), t2.clone()]).invoke("sys", "hi").await;
        assert_eq!(out, "real text");
    }

    #[tokio::test(start_paused = true)]
    async fn hung_tier_times_out_and_falls_back() {
        let t1 = Arc::new(MockBackend::hanging("t1"));
        let t2 = Arc::new(MockBackend::replying("t2", "after timeout"));

        let tiers: Vec<Arc<dyn GenerationBackend>> = vec![t1.clone(), t2.clone()];
        let client = TieredGenerationClient::new(tiers, Duration::from_secs(5));

        assert_eq!(client.invoke("sys", "hi").await, "after timeout");
        assert_eq!(t1.call_count(), 1);
    }

    #[tokio::test]
    async fn each_invocation_starts_from_the_top() {
        let t1 = Arc::new(MockBackend::scripted(
            "t1",
            vec![MockReply::Fail("quota".into()), MockReply::Text("back".into())],
        ));
        let t2 = Arc::new(MockBackend::replying("t2", "second"));
        let client = client(&[t1.clone(), t2.clone()]);

        assert_eq!(client.invoke("sys", "a").await, "second");
        assert_eq!(client.invoke("sys", "b").await, "back");
        assert_eq!(t1.call_count(), 2);
        assert_eq!(t2.call_count(), 1);
    }

    #[tokio::test]
    async fn tier_receives_instruction_and_input_verbatim() {
        let t1 = Arc::new(MockBackend::replying("t1", "ok"));
        client(&[t1.clone()]).invoke("be brief", "what now?").await;

        let request = t1.last_request().await.unwrap();
        assert_eq!(request.system_instruction, "be brief");
        assert_eq!(request.user_input, "what now?");
    }

    #[tokio::test]
    async fn attempt_classifies_outcomes() {
        let ok = MockBackend::replying("ok", "text");
        let down = MockBackend::failing("down");
        let c = client(&[]);

        assert_eq!(
            c.attempt(&ok, "s", "u").await,
            GenerationOutcome::Text("text".into())
        );
        assert_eq!(c.attempt(&down, "s", "u").await, GenerationOutcome::Unavailable);
    }

    #[test]
    fn debug_lists_tier_names() {
        let t1 = Arc::new(MockBackend::failing("gemini"));
        let rendered = format!("{:?}", client(&[t1]));
        assert!(rendered.contains("gemini"));
    }
}
