//! Infrastructure adapters. Implement outbound ports.
//!
//! Gemini HTTP, local JSON store, terminal UI. Map errors to DomainError.

pub mod ai;
pub mod persistence;
pub mod ui;
