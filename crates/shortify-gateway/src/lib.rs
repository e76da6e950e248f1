//! HTTP gateway for the Shortify URL shortener.
//!
//! Exposes the shortening and resolution engines over a small JSON API
//! built on axum. The `gateway` binary wires it to the configured store and
//! cache backends.

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::AppError;
pub use state::AppState;
