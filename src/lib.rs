//! Console Config - multi-tenant console resolution
//!
//! Resolves which **domain**, **application** and **realm** a console
//! client should load, by walking an interactive, API-driven decision
//! graph against a partially-failing backend:
//! - Trait-based remote config clients (HTTP, mock)
//! - A forward-only resolution state machine with multi-level fallback
//! - Compatibility filtering of candidate apps with a two-level cache
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             ConfigManager               │
//! │  (set_domain → set_app → set_realm)     │
//! └────────────────┬────────────────────────┘
//!                  │
//!      ┌───────────┴───────────┐
//!      ▼                       ▼
//! ┌─────────────┐       ┌─────────────┐
//! │ ConfigApi   │       │ app-info    │
//! │ (Http/Mock) │       │ caches      │
//! └─────────────┘       └─────────────┘
//! ```

pub mod api;
pub mod domain;
pub mod resolver;
pub mod types;

// Re-export main types for convenience
pub use api::{ApiError, ConfigApi, ConfigApiFactory, HttpConfigApi, MockConfigApi};
pub use domain::{build_base_url, DEFAULT_DOMAIN_SUFFIX};
pub use resolver::{ConfigError, ConfigManager, ResolutionState, DEFAULT_APP};
pub use types::{AppInfo, ConsoleConfig, ProjectConfig};
