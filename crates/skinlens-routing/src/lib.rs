//! SkinLens Route Guard
//!
//! This crate decides whether a view may be shown for the current session:
//! - Access levels and the table of guarded views
//! - The guard predicate producing allow/redirect decisions

pub mod guard;
pub mod route_table;

// Re-export commonly used types
pub use guard::{GuardDecision, RouteGuard};
pub use route_table::{Access, RouteRule, RouteTable};
