//! Synthetic load-and-fault generator for exercising metrics and tracing
//! pipelines.

pub mod chaos;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use chaos::{RequestHandler, Route};
pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
