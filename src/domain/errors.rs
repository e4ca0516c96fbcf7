//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these.

use std::fmt;
use thiserror::Error;

/// Kind of user-triggered request. Selects the user-facing failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Posts,
    Image,
    Refine,
    Ideas,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Posts => "posts",
            Operation::Image => "image",
            Operation::Refine => "refine",
            Operation::Ideas => "ideas",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum DomainError {
    /// Required input missing. Carries the localized message shown to the user.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The AI generation client failed (network, quota, model error).
    #[error("AI generation failed: {0}")]
    Ai(String),

    /// Local key-value store read/write failure. Logged, never shown.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// A refinement finished after a newer generation replaced its target post.
    #[error("Result superseded by a newer generation")]
    Superseded,

    #[error("Configuration error: {0}")]
    Config(String),

    /// Terminal prompt failure.
    #[error("UI error: {0}")]
    Ui(String),
}

impl DomainError {
    /// Message to display for a failure of `operation`.
    ///
    /// Returns `None` for errors that are logged only.
    pub fn user_message(&self, operation: Operation) -> Option<String> {
        match self {
            DomainError::Validation(msg) => Some(msg.clone()),
            DomainError::Ai(_) | DomainError::Config(_) => {
                Some(generation_failure_message(operation).to_string())
            }
            DomainError::Persistence(_) | DomainError::Superseded | DomainError::Ui(_) => None,
        }
    }
}

fn generation_failure_message(operation: Operation) -> &'static str {
    match operation {
        Operation::Posts => "حصل مشكلة واحنا بنعمل البوستات. ممكن تجرب تاني.",
        Operation::Image => "الصورة معرفتش تطلع. جرب تاني أو غير الستايل.",
        Operation::Refine => "مشكلة في تعديل البوست. حاول تاني.",
        Operation::Ideas => "حصلت مشكلة. حاول تاني.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_errors_map_to_operation_message() {
        let err = DomainError::Ai("quota exceeded".into());
        let posts = err.user_message(Operation::Posts).unwrap();
        let image = err.user_message(Operation::Image).unwrap();
        assert_ne!(posts, image);
        assert!(!posts.contains("quota"));
    }

    #[test]
    fn test_validation_message_passes_through() {
        let err = DomainError::Validation("empty".into());
        assert_eq!(err.user_message(Operation::Refine).as_deref(), Some("empty"));
    }

    #[test]
    fn test_persistence_is_silent() {
        assert!(DomainError::Persistence("disk full".into())
            .user_message(Operation::Image)
            .is_none());
        assert!(DomainError::Superseded.user_message(Operation::Refine).is_none());
    }
}
