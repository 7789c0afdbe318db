//! # API Client
//!
//! HTTP client for the Khel backend.
//!
//! This module provides the [`KhelClient`] used by the credential submitter
//! to log in and out.

mod client;
mod error;
mod types;

pub use client::KhelClient;
pub use error::{ApiError, ApiResult};
pub use types::{ApiEnvelope, LoginRequest};
