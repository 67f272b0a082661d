//! Backend service for a small site: listing endpoints, a contact form
//! with an acknowledgment email, static frontend hosting, and a
//! request-admission layer in front of everything.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                SITE BACKEND                   │
//!                    │                                               │
//!   Client Request   │  ┌──────────┐   ┌───────────┐   ┌──────────┐ │
//!   ─────────────────┼─▶│ security │──▶│   http    │──▶│    db    │─┼──▶ PostgreSQL
//!                    │  │ admission│   │  handlers │   │  queries │ │
//!                    │  └──────────┘   └─────┬─────┘   └──────────┘ │
//!                    │   addr resolve        │                       │
//!                    │   origin check        ▼ (fire-and-forget)     │
//!                    │   rate limit    ┌──────────┐                  │
//!                    │                 │   mail   │──────────────────┼──▶ SMTP relay
//!                    │                 └──────────┘                  │
//!                    │                                               │
//!                    │  ┌────────────────────────────────────────┐  │
//!                    │  │         Cross-Cutting Concerns         │  │
//!                    │  │  ┌────────┐ ┌─────────────┐ ┌────────┐ │  │
//!                    │  │  │ config │ │observability│ │lifecycle│ │  │
//!                    │  │  └────────┘ └─────────────┘ └────────┘ │  │
//!                    │  └────────────────────────────────────────┘  │
//!                    └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod db;
pub mod http;
pub mod mail;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
