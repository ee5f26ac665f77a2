//! # Matchstats
//!
//! Football league statistics and match outcome prediction over a local
//! match history.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (matches, stats, tables, predictions)
//! - **calculate**: Pure statistics and Poisson prediction engines
//! - **storage**: JSONL match store and the repository query surface
//! - **service**: Request-level operations wiring storage to the engines
//! - **ingest**: CSV results import
//! - **names**: Display names for team spelling variants
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod names;
pub mod service;
pub mod storage;

pub use models::*;
