//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, GenerationResult, Goal, ImageRequest};

/// AI generation client. Every failure is reported as `DomainError::Ai`.
#[async_trait::async_trait]
pub trait AiPort: Send + Sync {
    /// Draft two post variants plus an English image-prompt suggestion.
    ///
    /// - `style_sample`: writing sample to imitate; empty = default voice
    /// - `niche`: business field; empty = generic
    async fn generate_posts(
        &self,
        idea: &str,
        style_sample: &str,
        goal: Goal,
        niche: &str,
    ) -> Result<GenerationResult, DomainError>;

    /// Generate one image. Returns base64-encoded JPEG bytes.
    async fn generate_image(&self, request: &ImageRequest) -> Result<String, DomainError>;

    /// Rewrite `current` following `instruction`.
    async fn refine_post(&self, current: &str, instruction: &str) -> Result<String, DomainError>;

    /// Suggest post ideas for the given interests.
    async fn generate_post_ideas(&self, topics: &[String]) -> Result<Vec<String>, DomainError>;
}

/// Local key-value store. One string value per key.
#[async_trait::async_trait]
pub trait KeyValuePort: Send + Sync {
    /// Returns `None` if the key was never written.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;
}
