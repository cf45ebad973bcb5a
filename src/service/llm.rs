//! Shared LLM client and interaction utilities
//!
//! Provides a common interface for Gemini API interactions used across
//! services.

use rig::providers::gemini;

/// Environment variable for the generative service API key
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";

/// Shared LLM client wrapper
#[derive(Clone)]
pub struct LlmClient {
    client: gemini::Client,
}

impl LlmClient {
    /// Create a new LLM client with the provided API key
    pub fn new(api_key: &str) -> Result<Self, String> {
        let client = gemini::Client::new(api_key);

        Ok(Self { client })
    }

    /// Create a client from `GEMINI_API_KEY`, if set.
    ///
    /// Returns `None` when the key is absent so callers can degrade to
    /// fallback behavior instead of failing startup.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var(ENV_GEMINI_API_KEY)
            .ok()
            .filter(|k| !k.is_empty())?;

        match Self::new(&api_key) {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to initialize Gemini client");
                None
            }
        }
    }

    /// Get a reference to the underlying Gemini client
    /// Use this to create extractors with custom configuration
    pub fn gemini_client(&self) -> &gemini::Client {
        &self.client
    }
}
