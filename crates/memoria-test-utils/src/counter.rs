// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deterministic token counter for flush-threshold tests.

use memoria_agent::TokenCounter;

/// Counts whitespace-separated words as tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceCounter;

impl TokenCounter for WhitespaceCounter {
    fn count(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_words() {
        assert_eq!(WhitespaceCounter.count(""), 0);
        assert_eq!(WhitespaceCounter.count("user: hi there\nagent: hello"), 5);
    }
}
