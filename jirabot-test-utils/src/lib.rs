//! Test utilities shared across the jirabot workspace
//!
//! This crate provides test doubles for each remote seam plus Jira fixtures:
//! - [`RecordingTracker`] for `TrackerGateway`
//! - [`ScriptedCompletion`] for `CompletionApi`
//! - [`RecordingChat`] for `ChatPoster`
//!
//! The clippy dead_code lint is disabled for this crate because test utilities
//! may not be used by all tests, and the compiler cannot detect usage across
//! crate boundaries in development dependencies.

#![allow(dead_code)]

pub mod chat;
pub mod completion;
pub mod fixtures;
pub mod tracker;

// Re-export commonly used items
pub use chat::RecordingChat;
pub use completion::ScriptedCompletion;
pub use tracker::RecordingTracker;
