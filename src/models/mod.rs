//! Core data models for the prediction league.

mod event;
mod ids;
mod prediction;
mod session;
mod stats;
mod user;

pub use event::*;
pub use ids::*;
pub use prediction::*;
pub use session::*;
pub use stats::*;
pub use user::*;
