//! SkinLens Core Types and Traits
//!
//! This crate provides the fundamental types and traits used throughout SkinLens:
//! - Backend and inference data types (products, users, analysis results)
//! - The session store abstraction and its typed facade
//! - Navigation targets shared by the HTTP client and the route guard
//! - Client-side form validation
//! - Core error types

pub mod analysis;
pub mod error;
pub mod navigation;
pub mod session_store;
pub mod types;
pub mod validation;

pub use analysis::{AnalysisOutcome, AnalysisResult, ConfidenceDisplay, Indicator};
pub use error::{Error, Result};
pub use navigation::{Navigator, NoopNavigator, Redirect};
pub use session_store::{Session, SessionSnapshot, SessionStore};
