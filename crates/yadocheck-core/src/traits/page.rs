// # Page Automation Traits
//
// Defines the injected page-automation capability that scrapers drive.
//
// The core never implements browser automation itself; it only consumes
// this interface. The shipped implementation lives in
// `yadocheck-browser-chrome` (headless Chrome); tests use in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

/// Factory for page-automation sessions
///
/// One driver is shared by all scrapers; each scraper invocation opens its
/// own session so per-property checks stay sequential while properties run
/// concurrently.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Open a fresh page session
    async fn open(&self) -> Result<Box<dyn PageSession>>;
}

/// One live page-automation session (a tab, typically)
///
/// Every blocking call takes an explicit timeout; an expired call returns
/// `Error::Page` and leaves the session usable for `close`. Implementations
/// must also release their underlying resources when dropped, because a
/// caller racing a deadline may abandon the session without calling
/// [`PageSession::close`].
#[async_trait]
pub trait PageSession: Send {
    /// Navigate to a URL and wait for the page to settle
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()>;

    /// Fill a text input identified by CSS selector
    async fn fill(&mut self, selector: &str, value: &str, timeout: Duration) -> Result<()>;

    /// Choose an option value in a `<select>` identified by CSS selector
    async fn select(&mut self, selector: &str, value: &str, timeout: Duration) -> Result<()>;

    /// Click the element identified by CSS selector
    async fn click(&mut self, selector: &str, timeout: Duration) -> Result<()>;

    /// Extract the current page content as HTML
    async fn content(&mut self, timeout: Duration) -> Result<String>;

    /// Release the session explicitly
    async fn close(self: Box<Self>) -> Result<()>;
}
