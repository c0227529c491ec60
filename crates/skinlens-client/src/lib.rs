//! SkinLens API Client
//!
//! This crate talks to the SkinLens backend and the skin-analysis inference
//! service:
//! - `ApiClient`: bearer-token wrapper with a single refresh-and-retry on 401
//! - Typed endpoint groups (auth, users, products, images, consultations)
//! - `AnalysisPipeline`: upload, inference with bounded retries, result storage
//! - `AdminAuth`: local admin session marker

pub mod admin;
pub mod analysis;
pub mod api;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod inference;
pub mod request;
pub mod retry;

pub use admin::{AdminAuth, AdminCredentials};
pub use analysis::AnalysisPipeline;
pub use api::{ApiClient, ApiClientConfig};
pub use client::HttpClientConfig;
pub use error::{ClientError, ErrorKind, Result};
pub use inference::{InferenceClient, InferenceConfig};
pub use request::{PendingRequest, RequestBody};
pub use retry::RetryPolicy;
