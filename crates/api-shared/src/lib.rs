//! # API Shared
//!
//! Wire types shared by the Patientor front ends.
//!
//! Contains:
//! - `HealthService` and its `HealthRes` response
//! - `ErrorBody`, the JSON shape of every error response
//!
//! Used by `api-rest` and the workspace's `patientor-run` binary.

pub mod error;
pub mod health;

pub use error::ErrorBody;
pub use health::{HealthRes, HealthService};
