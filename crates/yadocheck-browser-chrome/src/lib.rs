// # yadocheck-browser-chrome
//
// `PageDriver` implementation backed by headless Chrome.
//
// Both booking backends render their availability client-side, so a real
// browser is required. The `headless_chrome` crate is synchronous; every
// CDP interaction runs on the blocking thread pool and is raced against
// the caller's timeout, which maps to `Error::Page` on expiry.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use tokio::task;
use tracing::{debug, info, warn};

use yadocheck_core::error::{Error, Result};
use yadocheck_core::traits::{PageDriver, PageSession};

/// Settle time after navigation for client-side rendering
const RENDER_WAIT: Duration = Duration::from_secs(3);

/// Page driver launching one shared Chrome process
///
/// The browser is launched once; each [`PageDriver::open`] call creates a
/// fresh tab, so concurrent property checks never share page state.
pub struct ChromeDriver {
    browser: Browser,
}

impl ChromeDriver {
    /// Launch Chrome and build a driver over it
    pub async fn new(headless: bool) -> Result<Self> {
        info!(headless, "launching Chrome");
        let browser = task::spawn_blocking(move || {
            let options = LaunchOptions::default_builder()
                .headless(headless)
                .build()
                .map_err(|e| Error::page(format!("failed to build launch options: {e}")))?;
            Browser::new(options).map_err(|e| Error::page(format!("failed to launch Chrome: {e}")))
        })
        .await
        .map_err(|e| Error::page(format!("browser launch task failed: {e}")))??;

        Ok(Self { browser })
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn open(&self) -> Result<Box<dyn PageSession>> {
        let browser = self.browser.clone();
        let tab = task::spawn_blocking(move || {
            browser
                .new_tab()
                .map_err(|e| Error::page(format!("failed to open tab: {e}")))
        })
        .await
        .map_err(|e| Error::page(format!("tab open task failed: {e}")))??;

        debug!("opened new tab");
        Ok(Box::new(ChromeSession { tab, closed: false }))
    }
}

/// One Chrome tab
struct ChromeSession {
    tab: Arc<Tab>,
    closed: bool,
}

impl ChromeSession {
    /// Run a blocking tab operation under the caller's deadline
    ///
    /// Chrome keeps executing an abandoned operation; the tab is only
    /// reclaimed when the session closes or drops.
    async fn blocking<T, F>(&self, timeout: Duration, what: &str, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Tab>) -> Result<T> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        let handle = task::spawn_blocking(move || op(tab));
        match tokio::time::timeout(timeout, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(Error::page(format!("{what} task failed: {e}"))),
            Err(_) => Err(Error::page(format!("{what} timed out after {timeout:?}"))),
        }
    }

    /// Evaluate a JS snippet and require a non-`__missing__` result
    async fn eval_on_element(&self, js: String, what: &str, timeout: Duration) -> Result<()> {
        let result = self
            .blocking(timeout, what, move |tab| {
                let value = tab
                    .evaluate(&js, false)
                    .map_err(|e| Error::page(format!("evaluate failed: {e}")))?;
                Ok(value.value.and_then(|v| v.as_str().map(str::to_string)))
            })
            .await?;

        match result.as_deref() {
            Some("ok") => Ok(()),
            Some("__missing__") => Err(Error::page(format!("{what}: no element matched"))),
            other => Err(Error::page(format!("{what}: unexpected result {other:?}"))),
        }
    }
}

/// JS that assigns a value to the first matching form element
///
/// Fires `input` and `change` so framework-bound forms notice the update.
fn js_set_value(selector: &str, value: &str) -> String {
    // serde_json string encoding doubles as JS string escaping
    let selector = serde_json::Value::from(selector);
    let value = serde_json::Value::from(value);
    format!(
        r#"(() => {{
            const el = document.querySelector({selector});
            if (!el) return "__missing__";
            el.value = {value};
            el.dispatchEvent(new Event('input', {{ bubbles: true }}));
            el.dispatchEvent(new Event('change', {{ bubbles: true }}));
            return "ok";
        }})()"#
    )
}

/// JS that clicks the first matching element
fn js_click(selector: &str) -> String {
    let selector = serde_json::Value::from(selector);
    format!(
        r#"(() => {{
            const el = document.querySelector({selector});
            if (!el) return "__missing__";
            el.click();
            return "ok";
        }})()"#
    )
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn goto(&mut self, url: &str, timeout: Duration) -> Result<()> {
        let url = url.to_string();
        debug!(url = %url, "navigating");
        self.blocking(timeout, "navigation", move |tab| {
            tab.navigate_to(&url)
                .map_err(|e| Error::page(format!("navigate failed: {e}")))?;
            tab.wait_until_navigated()
                .map_err(|e| Error::page(format!("navigation wait failed: {e}")))?;
            // Both backends keep rendering after the load event
            std::thread::sleep(RENDER_WAIT);
            Ok(())
        })
        .await
    }

    async fn fill(&mut self, selector: &str, value: &str, timeout: Duration) -> Result<()> {
        self.eval_on_element(js_set_value(selector, value), "fill", timeout)
            .await
    }

    async fn select(&mut self, selector: &str, value: &str, timeout: Duration) -> Result<()> {
        self.eval_on_element(js_set_value(selector, value), "select", timeout)
            .await
    }

    async fn click(&mut self, selector: &str, timeout: Duration) -> Result<()> {
        self.eval_on_element(js_click(selector), "click", timeout)
            .await?;
        // Give any triggered navigation a chance to land
        self.blocking(timeout, "post-click wait", |tab| {
            let _ = tab.wait_until_navigated();
            std::thread::sleep(RENDER_WAIT);
            Ok(())
        })
        .await
    }

    async fn content(&mut self, timeout: Duration) -> Result<String> {
        self.blocking(timeout, "content extraction", |tab| {
            let value = tab
                .evaluate("document.documentElement.outerHTML", false)
                .map_err(|e| Error::page(format!("evaluate failed: {e}")))?;
            value
                .value
                .and_then(|v| v.as_str().map(str::to_string))
                .ok_or_else(|| Error::page("page returned no HTML"))
        })
        .await
    }

    async fn close(mut self: Box<Self>) -> Result<()> {
        self.closed = true;
        let tab = Arc::clone(&self.tab);
        task::spawn_blocking(move || {
            tab.close(true)
                .map(|_| ())
                .map_err(|e| Error::page(format!("tab close failed: {e}")))
        })
        .await
        .map_err(|e| Error::page(format!("tab close task failed: {e}")))?
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        // Deadline-abandoned sessions land here without close() being
        // called; reclaim the tab so Chrome does not accumulate them
        if !self.closed {
            if let Err(e) = self.tab.close(true) {
                warn!(error = %e, "failed to close abandoned tab");
            }
        }
    }
}
