//! Service layer modules for external integrations.
//!
//! Contains the backend API client and the calculator hand-off store.

pub mod backend_client;
pub mod handoff;

pub use backend_client::BackendClient;
pub use handoff::HandoffStore;
