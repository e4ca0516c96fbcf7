//! Core domain layer. No external I/O dependencies.
//!
//! Entities, option rules and errors live here. Dependencies flow inward.

pub mod entities;
pub mod errors;
pub mod options;

pub use entities::{
    AspectRatio, GenerationResult, Goal, HistoryEntry, ImageModel, ImageRequest, ImageStyle,
    Logo, LogoPosition, REFINEMENT_ACTIONS, RefinementAction, Session,
};
pub use errors::{DomainError, Operation};
pub use options::ImageOptions;
