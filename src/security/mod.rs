//! Request admission subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → client_addr.rs (resolve client identity, proxy-aware)
//!     → origin.rs (allow-list check for cross-origin requests)
//!     → rate_limit.rs (per-client fixed-window budget)
//!     → Pass to handlers
//! ```
//!
//! # Design Decisions
//! - Rejections happen before any handler or store access
//! - Policy rejections (403, 429) are distinct from application errors
//! - Forwarding headers are only believed behind a configured trusted proxy

pub mod client_addr;
pub mod origin;
pub mod rate_limit;

pub use client_addr::resolve_client_addr;
pub use origin::{origin_middleware, AllowedOrigins};
pub use rate_limit::{rate_limit_middleware, FixedWindowLimiter, RateLimitGate};
