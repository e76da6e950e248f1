//! Cache implementations shared across Shortify services.

pub mod layered;
pub mod moka;
pub mod redis;

pub use self::moka::{CacheConfig, MokaUrlCache};
pub use self::redis::RedisUrlCache;
pub use layered::LayeredCache;
pub use shortify_core::cache::{Result, UrlCache};
pub use shortify_core::CacheError;
