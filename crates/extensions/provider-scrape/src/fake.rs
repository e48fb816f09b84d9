//! In-memory browsing host for unit tests.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ScrapeError;
use crate::host::{BrowsingHost, EphemeralPage};
use crate::locator::Locator;
use crate::manager::BrowserError;

/// Description of what a fake chat page contains.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    /// CSS selectors that match an element.
    pub present: Vec<&'static str>,
    /// Visible labels of the page's buttons. Each label is its own element.
    pub buttons: Vec<&'static str>,
    /// Selectors that resolve to an element named elsewhere, such as a
    /// generic `button` selector landing on the labelled send button.
    /// Unlisted selectors are elements of their own.
    pub aliases: HashMap<&'static str, &'static str>,
    /// Text held by answer containers, by selector.
    pub answers: HashMap<&'static str, String>,
    /// Number of `text` calls that return nothing before answers appear.
    pub answer_delay: usize,
    pub body: String,
    pub fail_load: bool,
    pub fail_close: bool,
}

impl FakePage {
    /// A page where every primary control is found by its structural marker.
    pub fn chat() -> Self {
        Self {
            present: vec![".websearch_button", "#chat-input", "#send-message-button"],
            ..Default::default()
        }
    }

    pub fn with_answer(mut self, selector: &'static str, text: &str) -> Self {
        self.answers.insert(selector, text.to_string());
        self
    }

    pub fn with_alias(mut self, selector: &'static str, element: &'static str) -> Self {
        self.aliases.insert(selector, element);
        self
    }

    /// Element the locator finds, if any.
    fn resolve(&self, locator: &Locator) -> Option<&'static str> {
        match locator {
            Locator::Css(selector) => self
                .present
                .contains(selector)
                .then(|| self.aliases.get(selector).copied().unwrap_or(*selector)),
            Locator::ButtonText(labels) => self
                .buttons
                .iter()
                .find(|b| labels.iter().any(|l| b.contains(l)))
                .copied(),
        }
    }
}

#[derive(Default)]
struct SharedState {
    opened: Mutex<Vec<String>>,
    visible: Mutex<Vec<String>>,
    actions: Mutex<Vec<String>>,
    text_calls: AtomicUsize,
    closed: AtomicUsize,
}

pub struct FakeHost {
    page: FakePage,
    fail_open: bool,
    state: Arc<SharedState>,
}

impl FakeHost {
    pub fn new(page: FakePage) -> Self {
        Self {
            page,
            fail_open: false,
            state: Arc::new(SharedState::default()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_open: true,
            ..Self::new(FakePage::default())
        }
    }

    pub fn opened(&self) -> Vec<String> {
        self.state.opened.lock().clone()
    }

    pub fn visible(&self) -> Vec<String> {
        self.state.visible.lock().clone()
    }

    /// Every page action in order, e.g. `click:send` or `fill:input:query`.
    pub fn actions(&self) -> Vec<String> {
        self.state.actions.lock().clone()
    }

    pub fn closed(&self) -> usize {
        self.state.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BrowsingHost for FakeHost {
    async fn open_hidden(&self, url: &str) -> Result<Box<dyn EphemeralPage>, ScrapeError> {
        if self.fail_open {
            return Err(BrowserError::ConnectionFailed("no browser".to_string()).into());
        }
        let index = {
            let mut opened = self.state.opened.lock();
            opened.push(url.to_string());
            opened.len()
        };
        Ok(Box::new(FakePageHandle {
            target_id: format!("T{}", index),
            page: self.page.clone(),
            marks: Mutex::new(HashMap::new()),
            state: self.state.clone(),
        }))
    }

    async fn open_visible(&self, url: &str) -> Result<(), ScrapeError> {
        if self.fail_open {
            return Err(BrowserError::ConnectionFailed("no browser".to_string()).into());
        }
        self.state.visible.lock().push(url.to_string());
        Ok(())
    }
}

struct FakePageHandle {
    target_id: String,
    page: FakePage,
    /// Tags carried by each element, like per-tag DOM attributes.
    marks: Mutex<HashMap<&'static str, BTreeSet<String>>>,
    state: Arc<SharedState>,
}

impl FakePageHandle {
    fn record(&self, action: String) {
        self.state.actions.lock().push(action);
    }

    fn require_tag(&self, tag: &str) -> Result<(), ScrapeError> {
        if self.marks.lock().values().any(|tags| tags.contains(tag)) {
            Ok(())
        } else {
            Err(ScrapeError::ElementNotFound(tag.to_string()))
        }
    }
}

#[async_trait]
impl EphemeralPage for FakePageHandle {
    fn target_id(&self) -> &str {
        &self.target_id
    }

    async fn wait_for_load(&self) -> Result<(), ScrapeError> {
        if self.page.fail_load {
            return Err(BrowserError::LoadTimeout("never loaded".to_string()).into());
        }
        Ok(())
    }

    async fn mark(&self, locator: &Locator, tag: &str) -> Result<bool, ScrapeError> {
        let mut marks = self.marks.lock();
        for tags in marks.values_mut() {
            tags.remove(tag);
        }
        let Some(element) = self.page.resolve(locator) else {
            return Ok(false);
        };
        marks.entry(element).or_default().insert(tag.to_string());
        Ok(true)
    }

    async fn click(&self, tag: &str) -> Result<(), ScrapeError> {
        self.require_tag(tag)?;
        self.record(format!("click:{}", tag));
        Ok(())
    }

    async fn fill(&self, tag: &str, text: &str) -> Result<(), ScrapeError> {
        self.require_tag(tag)?;
        self.record(format!("fill:{}:{}", tag, text));
        Ok(())
    }

    async fn press_enter(&self, tag: &str) -> Result<(), ScrapeError> {
        self.require_tag(tag)?;
        self.record(format!("enter:{}", tag));
        Ok(())
    }

    async fn text(&self, locator: &Locator) -> Result<Option<String>, ScrapeError> {
        let calls = self.state.text_calls.fetch_add(1, Ordering::SeqCst);
        if calls < self.page.answer_delay {
            return Ok(None);
        }
        let Locator::Css(selector) = locator else {
            return Ok(None);
        };
        Ok(self
            .page
            .answers
            .get(selector)
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    async fn body_text(&self) -> Result<String, ScrapeError> {
        Ok(self.page.body.clone())
    }

    async fn close(&self) -> Result<(), ScrapeError> {
        self.state.closed.fetch_add(1, Ordering::SeqCst);
        if self.page.fail_close {
            return Err(ScrapeError::ContextClosed);
        }
        Ok(())
    }
}
