//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → security layer (origin check, rate limit)
//!     → handlers.rs (listings, form submission, health)
//!     → JSON response, or static asset via the fallback service
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
