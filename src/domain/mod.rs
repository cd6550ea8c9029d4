//! Domain types and DTOs
//!
//! Entities owned by the backend API, exchanged as camelCase JSON.

pub mod projects;
pub mod reports;
pub mod users;

pub use projects::*;
pub use reports::*;
pub use users::*;
