//! Typed backend endpoint groups
//!
//! Each group borrows the [`ApiClient`](crate::ApiClient) and maps one method
//! to one backend route.

mod auth;
mod consultations;
mod images;
mod products;
mod users;

pub use auth::AuthApi;
pub use consultations::ConsultationApi;
pub use images::ImageApi;
pub use products::ProductApi;
pub use users::UserApi;
