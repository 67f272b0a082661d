//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the backend service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server settings (bind address, proxy trust, static assets).
    pub server: ServerConfig,

    /// Data store connection settings.
    pub database: DatabaseConfig,

    /// Cross-origin allow-list.
    pub cors: CorsConfig,

    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,

    /// Outbound mail relay settings.
    pub mail: MailConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Trust forwarding headers from a reverse proxy in front of this
    /// service. Only enable when such a proxy is guaranteed to exist;
    /// the headers are client-forgeable otherwise.
    pub trust_proxy: bool,

    /// Directory with the pre-built frontend. When set, unmatched routes
    /// serve files from here with an index.html fallback.
    pub static_dir: Option<String>,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            trust_proxy: false,
            static_dir: None,
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Data store connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL. Usually provided via DATABASE_URL.
    pub url: String,

    /// Maximum pool connections.
    pub max_connections: u32,

    /// Timeout for acquiring a pooled connection, in seconds.
    pub acquire_timeout_secs: u64,

    /// Timeout applied to each store query, in seconds.
    pub query_timeout_secs: u64,

    /// Skip TLS certificate verification for the store connection.
    /// Some managed providers require TLS but present certificates that
    /// fail verification; leave this off unless the provider forces it.
    pub tls_insecure: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 10,
            acquire_timeout_secs: 5,
            query_timeout_secs: 10,
            tls_insecure: false,
        }
    }
}

/// Cross-origin resource sharing configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Origins allowed to make credentialed cross-origin requests.
    /// Matched by exact string comparison, never by pattern.
    pub origins: Vec<String>,
}

/// Rate limiting configuration.
///
/// Two independent budgets: listing traffic is high-volume and low-risk,
/// submissions are the abuse target and get a much stricter budget.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Budget for the read (listing) endpoints.
    pub reads: RateLimitTier,

    /// Budget for the form submission endpoint.
    pub submissions: RateLimitTier,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            reads: RateLimitTier {
                enabled: true,
                max_requests: 300,
                window_secs: 60,
            },
            submissions: RateLimitTier {
                enabled: true,
                max_requests: 10,
                window_secs: 60,
            },
        }
    }
}

/// A single fixed-window rate limit budget.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitTier {
    /// Enable this limiter.
    pub enabled: bool,

    /// Maximum admitted requests per client within one window.
    pub max_requests: u32,

    /// Window duration in seconds.
    pub window_secs: u64,
}

impl Default for RateLimitTier {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 300,
            window_secs: 60,
        }
    }
}

/// Outbound mail relay configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MailConfig {
    /// Enable acknowledgment emails.
    pub enabled: bool,

    /// SMTP relay hostname.
    pub smtp_host: String,

    /// SMTP relay port (STARTTLS).
    pub smtp_port: u16,

    /// Relay username. Usually provided via SMTP_USERNAME.
    pub username: String,

    /// Relay password. Usually provided via SMTP_PASSWORD.
    pub password: String,

    /// Sender mailbox, e.g. "Site <no-reply@example.com>".
    pub from_address: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
