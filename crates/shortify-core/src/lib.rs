//! Core types and traits for the Shortify URL shortener.
//!
//! This crate provides the base62 codec, the [`ShortCode`] type, the
//! collaborator traits for stores and caches, and the engine traits shared
//! by the shortener, the redirector and the gateway.

pub mod base62;
pub mod cache;
pub mod error;
pub mod redirector;
pub mod repository;
pub mod shortcode;
pub mod shortener;

pub use cache::UrlCache;
pub use error::{CacheError, ServiceError, ShortCodeError, StorageError};
pub use redirector::Redirector;
pub use repository::{NewUrlMapping, ReadRepository, Repository, UrlMapping};
pub use shortcode::ShortCode;
pub use shortener::Shortener;
