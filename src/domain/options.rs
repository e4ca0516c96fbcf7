//! Image-generation options with their cross-field rules.
//!
//! - A logo forces the editing-capable model.
//! - The editing-capable model (or a logo) forces square output.
//!
//! Fields are private so every change passes through `normalize`.

use super::entities::{AspectRatio, ImageModel, ImageRequest, ImageStyle, Logo};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageOptions {
    style: ImageStyle,
    aspect_ratio: AspectRatio,
    model: ImageModel,
    logo: Option<Logo>,
}

impl ImageOptions {
    pub fn style(&self) -> ImageStyle {
        self.style
    }

    pub fn aspect_ratio(&self) -> AspectRatio {
        self.aspect_ratio
    }

    pub fn model(&self) -> ImageModel {
        self.model
    }

    pub fn logo(&self) -> Option<&Logo> {
        self.logo.as_ref()
    }

    /// Model selector is non-interactive while a logo is attached.
    pub fn is_model_locked(&self) -> bool {
        self.logo.is_some()
    }

    /// Aspect-ratio selector is non-interactive for the editing model or with a logo.
    pub fn is_aspect_ratio_locked(&self) -> bool {
        self.model == ImageModel::FastEditing || self.logo.is_some()
    }

    pub fn set_style(&mut self, style: ImageStyle) {
        self.style = style;
    }

    pub fn set_model(&mut self, model: ImageModel) {
        if self.is_model_locked() && model != self.model {
            debug!(requested = %model, "model locked by logo, ignoring");
            return;
        }
        self.model = model;
        self.normalize();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: AspectRatio) {
        if self.is_aspect_ratio_locked() && aspect_ratio != self.aspect_ratio {
            debug!(requested = %aspect_ratio, "aspect ratio locked, ignoring");
            return;
        }
        self.aspect_ratio = aspect_ratio;
    }

    /// Attach a logo, replacing any existing one.
    pub fn attach_logo(&mut self, logo: Logo) {
        self.logo = Some(logo);
        self.normalize();
    }

    /// Detach the logo. Unlocks the selectors; neither prior model nor ratio is restored.
    pub fn remove_logo(&mut self) -> Option<Logo> {
        let logo = self.logo.take();
        self.normalize();
        logo
    }

    fn normalize(&mut self) {
        if self.logo.is_some() {
            self.model = ImageModel::FastEditing;
        }
        if self.is_aspect_ratio_locked() {
            self.aspect_ratio = AspectRatio::Square;
        }
    }

    /// Resolve into a request for the AI client.
    pub fn to_request(&self, prompt: impl Into<String>) -> ImageRequest {
        ImageRequest {
            prompt: prompt.into(),
            style: self.style,
            aspect_ratio: self.aspect_ratio,
            model: self.model,
            logo: self.logo.clone(),
        }
    }
}
