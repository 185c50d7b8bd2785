//! # Grid Picks
//!
//! A prediction league for a racing series: members pick the top five of
//! each session, an administrator enters the official results, and the
//! league scores and ranks everyone.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (events, sessions, predictions, users)
//! - **calculate**: Scoring, ranking and community consensus
//! - **league**: Store-backed operations, including the scoring pass
//! - **storage**: JSONL document store
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod league;
pub mod models;
pub mod storage;

pub use models::*;
