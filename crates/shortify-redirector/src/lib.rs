//! Short code resolution engine.
//!
//! This crate provides a [`RedirectorService`] that resolves short codes to
//! their long URLs. Reads go through a [`UrlCache`] in front of a read-only
//! repository (cache-aside); any cache from `shortify_cache` fits.
//!
//! # Example
//!
//! ```rust
//! use shortify_cache::MokaUrlCache;
//! use shortify_core::{Redirector, ShortCode};
//! use shortify_redirector::RedirectorService;
//! use shortify_storage::InMemoryRepository;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let service = RedirectorService::new(InMemoryRepository::new(), MokaUrlCache::new());
//!
//! let code = ShortCode::new("1aB9z")?;
//! match service.resolve(&code).await {
//!     Ok(long_url) => println!("Redirect to: {long_url}"),
//!     Err(e) => println!("No redirect: {e}"),
//! }
//! # Ok(())
//! # }
//! ```

pub mod service;

pub use service::RedirectorService;
pub use shortify_core::{Redirector, ServiceError, ShortCode, UrlCache};
