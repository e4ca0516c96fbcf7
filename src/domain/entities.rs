//! Domain entities. Pure data structures for the core business.
//!
//! No HTTP/IO types here. Adapters map Gemini payloads into these.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target goal of a post. Labels are the Arabic values shown to users and sent to the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Goal {
    #[default]
    Engaging,
    Sales,
    Educational,
    Entertaining,
    Cultural,
}

impl Goal {
    pub const ALL: [Goal; 5] = [
        Goal::Engaging,
        Goal::Sales,
        Goal::Educational,
        Goal::Entertaining,
        Goal::Cultural,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Goal::Engaging => "تفاعلي",
            Goal::Sales => "بيعي",
            Goal::Educational => "تعليمي",
            Goal::Entertaining => "ترفيهي",
            Goal::Cultural => "ثقافي",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Goal {
    type Err = String;

    /// Accepts the Arabic label or the English variant name (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Goal::ALL
            .into_iter()
            .find(|g| g.label() == s || format!("{:?}", g).eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown goal: {}", s))
    }
}

/// The user's current, unsaved generation inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub prompt: String,
    /// Writing sample the model imitates ("train on my style").
    pub style_sample: String,
    pub goal: Goal,
    /// Business niche / field of activity. Optional.
    pub niche: String,
}

impl Session {
    pub fn is_trained(&self) -> bool {
        !self.style_sample.trim().is_empty()
    }
}

/// Most recent AI-produced post pair plus image-prompt suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub posts: [String; 2],
    pub image_prompt: String,
}

/// Persisted snapshot of posts + generated image from one completed image generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// RFC 3339 creation time, unique within the history.
    pub id: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: i64,
    pub posts: Vec<String>,
    pub image_prompt: String,
    /// `data:image/jpeg;base64,...` URL.
    pub generated_image: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageStyle {
    #[default]
    RealisticPhoto,
    VectorArt,
    Render3d,
    Watercolor,
    Minimalist,
}

impl ImageStyle {
    pub const ALL: [ImageStyle; 5] = [
        ImageStyle::RealisticPhoto,
        ImageStyle::VectorArt,
        ImageStyle::Render3d,
        ImageStyle::Watercolor,
        ImageStyle::Minimalist,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageStyle::RealisticPhoto => "Realistic Photo",
            ImageStyle::VectorArt => "Vector Art",
            ImageStyle::Render3d => "3D Render",
            ImageStyle::Watercolor => "Watercolor",
            ImageStyle::Minimalist => "Minimalist",
        }
    }
}

impl fmt::Display for ImageStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    #[default]
    Square,
    Landscape,
    Portrait,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Square,
        AspectRatio::Portrait,
        AspectRatio::Landscape,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageModel {
    /// Best quality; supports every aspect ratio.
    #[default]
    HighQuality,
    /// Faster, editing-capable; square output only, required for logo overlays.
    FastEditing,
}

impl ImageModel {
    pub const ALL: [ImageModel; 2] = [ImageModel::HighQuality, ImageModel::FastEditing];

    /// Model identifier on the hosted API.
    pub fn id(self) -> &'static str {
        match self {
            ImageModel::HighQuality => "imagen-4.0-generate-001",
            ImageModel::FastEditing => "gemini-2.5-flash-image",
        }
    }
}

impl fmt::Display for ImageModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogoPosition {
    #[default]
    OnProduct,
    Corner,
}

impl LogoPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            LogoPosition::OnProduct => "on_product",
            LogoPosition::Corner => "corner",
        }
    }
}

/// Uploaded logo to overlay on the generated image.
#[derive(Clone, PartialEq, Eq)]
pub struct Logo {
    pub bytes: Vec<u8>,
    pub mime_type: String,
    pub position: LogoPosition,
}

impl fmt::Debug for Logo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logo")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("position", &self.position)
            .finish()
    }
}

/// One-click refinement offered next to each post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefinementAction {
    /// Shown to the user.
    pub label: &'static str,
    /// Sent to the model.
    pub instruction: &'static str,
}

pub const REFINEMENT_ACTIONS: [RefinementAction; 3] = [
    RefinementAction {
        label: "خليه أبسط",
        instruction: "Make it simpler and easier to understand",
    },
    RefinementAction {
        label: "خليه جذاب أكتر",
        instruction: "Make it more engaging, exciting, and professional",
    },
    RefinementAction {
        label: "خليه أقصر",
        instruction: "Make it shorter and more concise",
    },
];

/// Fully resolved input for one image-generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub prompt: String,
    pub style: ImageStyle,
    pub aspect_ratio: AspectRatio,
    pub model: ImageModel,
    pub logo: Option<Logo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_parses_label_and_name() {
        assert_eq!("بيعي".parse::<Goal>().unwrap(), Goal::Sales);
        assert_eq!("educational".parse::<Goal>().unwrap(), Goal::Educational);
        assert!("viral".parse::<Goal>().is_err());
    }

    #[test]
    fn test_history_entry_uses_camel_case_keys() {
        let entry = HistoryEntry {
            id: "2024-01-01T00:00:00Z".into(),
            timestamp: 1704067200000,
            posts: vec!["a".into(), "b".into()],
            image_prompt: "p".into(),
            generated_image: "data:image/jpeg;base64,AAAA".into(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"imagePrompt\""));
        assert!(json.contains("\"generatedImage\""));
    }

    #[test]
    fn test_session_trained_ignores_whitespace() {
        let mut session = Session::default();
        session.style_sample = "  \n".into();
        assert!(!session.is_trained());
        session.style_sample = "أهلا".into();
        assert!(session.is_trained());
    }
}
