//! Fault, latency and span-tree generation.
//!
//! # Data Flow
//! ```text
//! inbound request + parent Context
//!     → handler.rs opens the root span
//!     → dependency.rs (checkout only) child span, random 20-70ms
//!     → work.rs child span, fixed configured latency
//!     → fault.rs decides 200 vs 500
//!     → RequestMetrics records count + duration
//!     → root span closes
//! ```
//!
//! # Design Decisions
//! - Trace context, random source and metrics are injected, never global
//! - Checkout nests work under the dependency span, not under the root
//! - Dependency calls are never failed by the fault injector

pub mod dependency;
pub mod fault;
pub mod handler;
pub mod random;
pub mod work;

pub use dependency::DependencySimulator;
pub use fault::FaultInjector;
pub use handler::{Outcome, RequestHandler, Route};
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use work::WorkSimulator;
