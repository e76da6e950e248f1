//! URL shortening engine.
//!
//! This crate provides [`ShortenerService`], the [`Shortener`] implementation
//! behind the write path, and the [`SuffixGenerator`] it uses for the random
//! tail of every code. Core types are re-exported from `shortify_core`.

pub mod service;
pub mod suffix;

pub use service::ShortenerService;
pub use shortify_core::{ServiceError, ShortCode, Shortener};
pub use suffix::{RandomSuffix, SuffixGenerator};
