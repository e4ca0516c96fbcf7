//! Mock AI adapter for running without API calls.
//!
//! Returns canned responses for development and testing purposes.

use crate::domain::{DomainError, GenerationResult, Goal, ImageRequest};
use crate::ports::AiPort;
use std::time::Duration;
use tracing::info;

/// 1x1 white JPEG, base64.
const PLACEHOLDER_JPEG: &str = "/9j/4AAQSkZJRgABAQEASABIAAD/2wBDAP//////////////////////////////////////////////////////////////////////////////////////wgALCAABAAEBAREA/8QAFBABAAAAAAAAAAAAAAAAAAAAAP/aAAgBAQABPxA=";

/// Mock AI adapter.
///
/// Returns predetermined responses without making API calls.
/// Simulates network latency with configurable delay.
pub struct MockAiAdapter {
    /// Simulated network delay in milliseconds.
    delay_ms: u64,
}

impl MockAiAdapter {
    /// Create a new mock adapter with default delay (300ms).
    pub fn new() -> Self {
        Self { delay_ms: 300 }
    }

    /// Create a mock adapter with custom delay.
    pub fn with_delay(delay_ms: u64) -> Self {
        Self { delay_ms }
    }

    async fn latency(&self) {
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
    }
}

impl Default for MockAiAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AiPort for MockAiAdapter {
    async fn generate_posts(
        &self,
        idea: &str,
        style_sample: &str,
        goal: Goal,
        niche: &str,
    ) -> Result<GenerationResult, DomainError> {
        info!(idea_len = idea.len(), goal = %goal, "[MOCK] Simulating post generation");
        self.latency().await;

        let niche = if niche.is_empty() { "نشاطك" } else { niche };
        let voice = if style_sample.is_empty() {
            ""
        } else {
            " (بأسلوبك)"
        };
        Ok(GenerationResult {
            posts: [
                format!(
                    "[MOCK] {}{}\nبوست {} عن {} ✨\nكلمنا دلوقتي! #{}",
                    idea,
                    voice,
                    goal.label(),
                    niche,
                    goal.label()
                ),
                format!(
                    "[MOCK] متفوتش الفرصة: {}{}\nجرب {} النهارده 💡",
                    idea, voice, niche
                ),
            ],
            image_prompt: format!(
                "A bright, inviting promotional photo for a {} post, clean background, soft light",
                goal
            ),
        })
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<String, DomainError> {
        info!(
            model = %request.model,
            aspect_ratio = %request.aspect_ratio,
            logo = request.logo.is_some(),
            "[MOCK] Simulating image generation"
        );
        self.latency().await;
        Ok(PLACEHOLDER_JPEG.to_string())
    }

    async fn refine_post(&self, current: &str, instruction: &str) -> Result<String, DomainError> {
        info!(post_len = current.len(), "[MOCK] Simulating refinement");
        self.latency().await;
        Ok(format!("{}\n[MOCK] تعديل: {}", current, instruction))
    }

    async fn generate_post_ideas(&self, topics: &[String]) -> Result<Vec<String>, DomainError> {
        info!(topics = topics.len(), "[MOCK] Simulating idea generation");
        self.latency().await;
        Ok(topics
            .iter()
            .flat_map(|t| {
                [
                    format!("[MOCK] 3 أخطاء شائعة في {}", t),
                    format!("[MOCK] قصة نجاح صغيرة في {}", t),
                    format!("[MOCK] سؤال للمتابعين عن {}", t),
                ]
            })
            .collect())
    }
}
