use crate::error::Result;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns the short code for `long_url`, minting one on first sight.
    ///
    /// Calling this twice for the same URL returns the same code.
    async fn shorten(&self, long_url: &str) -> Result<ShortCode>;
}
