//! Zournel core: local-first task list and journal with an asynchronous
//! AI-enrichment pipeline.
//!
//! The entity store is the single source of truth; enrichment results are
//! merged back by captured id and never block interaction.

pub mod ai;
pub mod classify;
pub mod cli;
pub mod enrich;
pub mod error;
pub mod format;
pub mod logging;
pub mod paths;
pub mod persist;
pub mod store;
pub mod subscriptions;
pub mod types;
