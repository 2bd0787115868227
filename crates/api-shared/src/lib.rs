//! # API Shared
//!
//! Shared utilities for the stub's API surfaces.
//!
//! Contains:
//! - Bearer-token validation (`auth`), independent of any HTTP framework
//! - The health check service and its response type (`health`)
//!
//! Used by `api-rest`.

pub mod auth;
pub mod health;

pub use auth::{validate_bearer, AuthError, BEARER_SCHEME};
pub use health::{HealthRes, HealthService};
