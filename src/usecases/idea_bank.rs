//! Idea bank. Suggests post ideas for an interest picked from a curated list or typed in.

use crate::domain::{DomainError, Operation};
use crate::ports::AiPort;
use std::sync::Arc;
use tracing::{error, info};

/// Curated interests offered before the user types their own.
pub const INTERESTS: [&str; 18] = [
    "تسويق",
    "تكنولوجيا",
    "أكل و طبخ",
    "رياضة و لياقة",
    "موضة و جمال",
    "سفر و سياحة",
    "تنمية بشرية",
    "كوميديا",
    "فن و موسيقى",
    "صحة و طب",
    "عقارات",
    "سيارات",
    "تعليم",
    "ألعاب فيديو",
    "أفلام و مسلسلات",
    "استثمار و أعمال",
    "تصوير",
    "تصميم جرافيك",
];

const NO_INTEREST: &str = "لازم تختار مجال اهتمام أو تكتب تخصصك الأول.";

pub struct IdeaBankService {
    ai: Arc<dyn AiPort>,
}

impl IdeaBankService {
    pub fn new(ai: Arc<dyn AiPort>) -> Self {
        Self { ai }
    }

    /// A typed interest wins over the picked one.
    pub fn resolve_interest(selected: Option<&str>, custom: &str) -> Result<String, DomainError> {
        let custom = custom.trim();
        if !custom.is_empty() {
            return Ok(custom.to_string());
        }
        selected
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .ok_or_else(|| DomainError::Validation(NO_INTEREST.to_string()))
    }

    /// Ask the AI port for post ideas about `interest`.
    ///
    /// On failure the error is logged; `DomainError::user_message(Operation::Ideas)` gives the text to show.
    pub async fn suggest(&self, interest: &str) -> Result<Vec<String>, DomainError> {
        info!(interest, "generating post ideas");
        let ideas = self
            .ai
            .generate_post_ideas(&[interest.to_string()])
            .await
            .map_err(|e| {
                error!(error = %e, op = %Operation::Ideas, "idea generation failed");
                e
            })?;
        let ideas: Vec<String> = ideas
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();
        info!(count = ideas.len(), "post ideas ready");
        Ok(ideas)
    }
}
