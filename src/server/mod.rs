//! Local development server
//!
//! # Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /api/config` - Resolved pipeline configuration
//! - `GET /api/networks` - Network profiles

pub mod dev;

pub use dev::{DevServer, ServerError, ServerHandle, DEFAULT_KEEP_ALIVE};
