//! Router module - orchestration and history management
//!
//! Contains the routing loop that coordinates the decision engine and the
//! A2A transport, and the append-only request history it runs on.

pub mod history;
pub mod orchestrator;

pub use history::History;
pub use orchestrator::Router;
