//! # jirabot
//!
//! A Slack bot that answers questions about Jira projects. A question is
//! routed to the tracker queries it needs, the results are trimmed by the
//! data filter, and a completion model writes the summary that is posted back
//! to the thread.

pub mod app;
pub mod bundle;
pub mod cli;
pub mod config;
pub mod filter;
pub mod gather;
pub mod generator;
pub mod output;
pub mod router;

pub use bundle::{QueryResultBundle, Slot};
pub use config::BotConfig;
pub use filter::{FilteredBundle, filter};
pub use gather::{Gathered, SlotError, gather};
pub use generator::{GenerationError, GeneratorSettings, ResponseGenerator};
pub use router::{Router, RouterError};
