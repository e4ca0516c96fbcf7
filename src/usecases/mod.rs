//! Application use cases. Orchestrate domain logic via ports.

pub mod coordinator;
pub mod history_store;
pub mod idea_bank;

pub use coordinator::{AppState, GenerationCoordinator};
pub use history_store::HistoryStore;
pub use idea_bank::IdeaBankService;
