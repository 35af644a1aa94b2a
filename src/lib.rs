//! Switchboard - Multi-Agent Customer Service Router
//!
//! A router that answers customer queries by coordinating specialist
//! agents over the A2A protocol. A Gemini-backed decision engine reasons
//! about each query, delegates sub-tasks to remote agents, and converges
//! on a final answer within a bounded number of turns.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **A2A**: Agent card resolution, caching, and task dispatch over HTTP
//! - **Decision**: Decision engine abstraction with Gemini implementation
//! - **Router**: The orchestration loop and per-request history
//!
//! # Usage
//!
//! ```rust,no_run
//! use switchboard::{Config, Router};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = Router::new(Config::load());
//!
//!     let reply = router
//!         .submit("Get the name of customer 5", CancellationToken::new())
//!         .await
//!         .unwrap();
//!     println!("[{}] {}", reply.outcome, reply.answer);
//! }
//! ```

pub mod a2a;
pub mod core;
pub mod decision;
pub mod router;

// Re-export commonly used items
pub use crate::core::{Config, Outcome, Result, RouterReply, SwitchboardError};
pub use crate::router::Router;
