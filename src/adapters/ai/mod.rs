//! AI adapter module. Implements AiPort for Gemini.
//!
//! Provides the Gemini/Imagen HTTP adapter and a mock adapter for offline use.

pub mod gemini_adapter;
pub mod mock_adapter;

pub use gemini_adapter::GeminiAdapter;
pub use mock_adapter::MockAiAdapter;
