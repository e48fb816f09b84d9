//! Browsing host: where ephemeral chat pages are opened.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use searchlens_protocols::error::AnswerError;
use searchlens_protocols::provider::OriginalPageOpener;

use crate::cdp::PageSession;
use crate::error::ScrapeError;
use crate::locator::Locator;
use crate::manager::BrowserManager;

/// Prefix of the attribute placed on a located control so later steps can
/// find it again. Each tag gets its own attribute, so one element can carry
/// several tags.
pub const MARKER_PREFIX: &str = "data-searchlens-";

/// Attribute that marks the element tagged `tag`.
pub fn marker_attribute(tag: &str) -> String {
    format!("{}{}", MARKER_PREFIX, tag)
}

/// One page opened for a single scrape run.
#[async_trait]
pub trait EphemeralPage: Send + Sync {
    /// Identifier of the underlying browser target.
    fn target_id(&self) -> &str;

    /// Resolve once the page reports load complete.
    async fn wait_for_load(&self) -> Result<(), ScrapeError>;

    /// Find the first element matching `locator` and tag it as `tag`.
    /// Returns false if nothing matched.
    async fn mark(&self, locator: &Locator, tag: &str) -> Result<bool, ScrapeError>;

    async fn click(&self, tag: &str) -> Result<(), ScrapeError>;

    /// Write `text` into the tagged input and fire input and change events.
    async fn fill(&self, tag: &str, text: &str) -> Result<(), ScrapeError>;

    /// Send an Enter keypress to the tagged element.
    async fn press_enter(&self, tag: &str) -> Result<(), ScrapeError>;

    /// Trimmed text of the last element matching `locator` that has any.
    async fn text(&self, locator: &Locator) -> Result<Option<String>, ScrapeError>;

    /// Full visible text of the page body.
    async fn body_text(&self) -> Result<String, ScrapeError>;

    async fn close(&self) -> Result<(), ScrapeError>;
}

/// Opens pages for the scrape strategy.
#[async_trait]
pub trait BrowsingHost: Send + Sync {
    /// Open `url` in a page the user does not see and that does not take focus.
    async fn open_hidden(&self, url: &str) -> Result<Box<dyn EphemeralPage>, ScrapeError>;

    /// Open `url` in a page brought to the foreground. The page stays open.
    async fn open_visible(&self, url: &str) -> Result<(), ScrapeError>;
}

/// [`BrowsingHost`] backed by a Chrome instance over CDP.
pub struct CdpHost {
    manager: Arc<BrowserManager>,
    chat_url: String,
}

impl CdpHost {
    pub fn new(manager: Arc<BrowserManager>, chat_url: impl Into<String>) -> Self {
        Self {
            manager,
            chat_url: chat_url.into(),
        }
    }

    pub fn manager(&self) -> &Arc<BrowserManager> {
        &self.manager
    }
}

#[async_trait]
impl BrowsingHost for CdpHost {
    async fn open_hidden(&self, url: &str) -> Result<Box<dyn EphemeralPage>, ScrapeError> {
        let session = self.manager.open_page(url, true).await?;
        debug!("Opened hidden page {}", session.target_id());
        Ok(Box::new(CdpPage {
            session,
            manager: self.manager.clone(),
        }))
    }

    async fn open_visible(&self, url: &str) -> Result<(), ScrapeError> {
        let session = self.manager.open_page(url, false).await?;
        self.manager.activate_page(session.target_id()).await?;
        info!("Opened visible page {} at {}", session.target_id(), url);
        Ok(())
    }
}

#[async_trait]
impl OriginalPageOpener for CdpHost {
    async fn open_original_page(&self) -> Result<(), AnswerError> {
        self.open_visible(&self.chat_url).await.map_err(|e| {
            AnswerError::Unknown(format!("Failed to open {}: {}", self.chat_url, e))
        })
    }
}

/// A CDP page session driven through script evaluation.
pub struct CdpPage {
    session: PageSession,
    manager: Arc<BrowserManager>,
}

impl CdpPage {
    async fn eval(&self, script: &str) -> Result<Value, ScrapeError> {
        Ok(self.session.evaluate(script).await?)
    }

    async fn eval_on_tagged(&self, tag: &str, body: &str) -> Result<(), ScrapeError> {
        let found = self.eval(&scripts::on_tagged(tag, body)).await?;
        if found.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(ScrapeError::ElementNotFound(tag.to_string()))
        }
    }
}

#[async_trait]
impl EphemeralPage for CdpPage {
    fn target_id(&self) -> &str {
        self.session.target_id()
    }

    async fn wait_for_load(&self) -> Result<(), ScrapeError> {
        Ok(self.session.wait_for_load().await?)
    }

    async fn mark(&self, locator: &Locator, tag: &str) -> Result<bool, ScrapeError> {
        let found = self.eval(&scripts::mark(locator, tag)).await?;
        Ok(found.as_bool() == Some(true))
    }

    async fn click(&self, tag: &str) -> Result<(), ScrapeError> {
        self.eval_on_tagged(tag, "el.click();").await
    }

    async fn fill(&self, tag: &str, text: &str) -> Result<(), ScrapeError> {
        self.eval_on_tagged(tag, &scripts::fill_body(text)).await
    }

    async fn press_enter(&self, tag: &str) -> Result<(), ScrapeError> {
        self.eval_on_tagged(tag, "el.focus();").await?;
        Ok(self.session.press_enter().await?)
    }

    async fn text(&self, locator: &Locator) -> Result<Option<String>, ScrapeError> {
        let value = self.eval(&scripts::last_text(locator)).await?;
        Ok(value.as_str().map(str::to_string))
    }

    async fn body_text(&self) -> Result<String, ScrapeError> {
        let value = self
            .eval("document.body ? document.body.innerText : ''")
            .await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn close(&self) -> Result<(), ScrapeError> {
        Ok(self.manager.close_page(self.session.target_id()).await?)
    }
}

/// Scripts evaluated in the chat page.
pub(crate) mod scripts {
    use serde_json::Value;

    use super::marker_attribute;
    use crate::locator::Locator;

    fn tagged_selector(tag: &str) -> String {
        Value::from(format!("[{}]", marker_attribute(tag))).to_string()
    }

    /// Tag the element `locator` finds, clearing the same tag elsewhere first.
    /// Tags other than `tag` are left in place.
    pub fn mark(locator: &Locator, tag: &str) -> String {
        format!(
            r#"(() => {{
  document.querySelectorAll({sel}).forEach(e => e.removeAttribute("{attr}"));
  const el = {find};
  if (!el) return false;
  el.setAttribute("{attr}", "");
  return true;
}})()"#,
            sel = tagged_selector(tag),
            attr = marker_attribute(tag),
            find = locator.find_expression(),
        )
    }

    /// Run `body` with `el` bound to the tagged element. Evaluates to whether it
    /// was found.
    pub fn on_tagged(tag: &str, body: &str) -> String {
        format!(
            r#"(() => {{
  const el = document.querySelector({sel});
  if (!el) return false;
  {body}
  return true;
}})()"#,
            sel = tagged_selector(tag),
            body = body,
        )
    }

    /// Set the value and fire the events reactive frameworks listen for,
    /// including a change event whose `target` is pinned to the element.
    pub fn fill_body(text: &str) -> String {
        format!(
            r#"el.value = {text};
  el.dispatchEvent(new Event("input", {{ bubbles: true }}));
  el.dispatchEvent(new Event("change", {{ bubbles: true }}));
  try {{
    const ev = new Event("change", {{ bubbles: true }});
    Object.defineProperty(ev, "target", {{ writable: false, value: el }});
    el.dispatchEvent(ev);
  }} catch (e) {{}}"#,
            text = Value::from(text).to_string(),
        )
    }

    /// Trimmed text of the last match with non-empty text, or null.
    pub fn last_text(locator: &Locator) -> String {
        format!(
            r#"(() => {{
  const texts = {all}.map(e => (e.innerText || e.textContent || "").trim()).filter(t => t.length > 0);
  return texts.length ? texts[texts.length - 1] : null;
}})()"#,
            all = locator.find_all_expression(),
        )
    }
}
