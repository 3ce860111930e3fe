//! Client library for the electronics-repair service REST API.
//!
//! - [`client`]: one async method per backend operation, bearer auth, uniform errors.
//! - [`session`]: the signed-in user's token, persisted behind [`session::SessionStore`].
//! - [`forms`]: client-side validation run before any submit request.
//! - [`dashboard`]: the concurrent repairs/appointments/payments overview.
//! - [`docs`]: the endpoint documentation catalog and its text renderer.

pub mod client;
pub mod config;
pub mod dashboard;
pub mod docs;
pub mod error;
pub mod forms;
pub mod session;
pub mod types;

#[cfg(test)]
mod test_support;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use session::{AuthState, FileSessionStore, MemorySessionStore, SessionStore};
