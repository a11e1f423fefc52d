// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Token accounting for the flush threshold.

use memoria_core::MemoriaError;
use tiktoken_rs::CoreBPE;

/// Counts tokens in rendered conversation text.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> usize;
}

/// `cl100k_base` byte-pair encoding, special tokens included.
pub struct Cl100kCounter {
    bpe: CoreBPE,
}

impl Cl100kCounter {
    pub fn new() -> Result<Self, MemoriaError> {
        let bpe = tiktoken_rs::cl100k_base()
            .map_err(|e| MemoriaError::Internal(format!("failed to load cl100k_base: {e}")))?;
        Ok(Self { bpe })
    }
}

impl TokenCounter for Cl100kCounter {
    fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

impl std::fmt::Debug for Cl100kCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Cl100kCounter")
    }
}
