//! Typed locators and the fallback chains for each chat-page control.
//!
//! Each control is found by trying its chain in order: structural ids and
//! classes first, then test-id attributes, then visible button labels, then
//! generic element heuristics. The first locator that matches wins.

use serde_json::Value;

/// One way of finding an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Locator {
    /// First element matching a CSS selector.
    Css(&'static str),
    /// First `<button>` whose text contains any of the labels.
    ButtonText(&'static [&'static str]),
}

impl Locator {
    /// JavaScript expression evaluating to the matched element, or null.
    pub fn find_expression(&self) -> String {
        match self {
            Locator::Css(selector) => {
                format!("document.querySelector({})", js_string(selector))
            }
            Locator::ButtonText(labels) => {
                let labels = Value::from(labels.to_vec()).to_string();
                format!(
                    "(Array.from(document.querySelectorAll('button')).find(b => \
                     b.textContent && {}.some(l => b.textContent.includes(l))) || null)",
                    labels
                )
            }
        }
    }

    /// JavaScript expression evaluating to every matched element, as an array.
    pub fn find_all_expression(&self) -> String {
        match self {
            Locator::Css(selector) => {
                format!("Array.from(document.querySelectorAll({}))", js_string(selector))
            }
            Locator::ButtonText(_) => {
                format!("[{}].filter(e => e)", self.find_expression())
            }
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css({})", selector),
            Locator::ButtonText(labels) => write!(f, "button-text({})", labels.join("|")),
        }
    }
}

/// Controls the automation needs on the chat page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Switches the chat into web-search mode.
    SearchMode,
    /// The prompt text area.
    Input,
    /// Submits the prompt.
    Send,
}

const SEARCH_MODE_CHAIN: &[Locator] = &[
    Locator::Css(".websearch_button"),
    Locator::Css("[data-testid=\"websearch_button\"]"),
    Locator::Css("button[data-testid*=\"search\"]"),
    Locator::ButtonText(&["搜索", "Search"]),
    Locator::Css("button"),
];

const INPUT_CHAIN: &[Locator] = &[
    Locator::Css("#chat-input"),
    Locator::Css("[data-testid=\"chat-input\"]"),
    Locator::Css("textarea[data-testid*=\"input\"]"),
    Locator::Css("textarea[class*=\"input\"]"),
    Locator::Css(".chat-input"),
    Locator::Css("textarea"),
];

const SEND_CHAIN: &[Locator] = &[
    Locator::Css("#send-message-button"),
    Locator::Css("[data-testid=\"send-message-button\"]"),
    Locator::Css("button[type=\"submit\"]"),
    Locator::Css(".send-button"),
    Locator::ButtonText(&["发送", "Send"]),
    Locator::Css("button:last-child"),
];

/// Elements holding the rendered reply, most specific first.
pub const ANSWER_CONTAINERS: &[Locator] = &[
    Locator::Css("[data-testid=\"chat-response\"]"),
    Locator::Css(".response-message-content"),
    Locator::Css(".chat-response-message .markdown-content-container"),
    Locator::Css(".chat-response-message"),
    Locator::Css(".markdown-body"),
];

impl Capability {
    pub const ALL: [Capability; 3] = [Capability::SearchMode, Capability::Input, Capability::Send];

    /// Locators in priority order.
    pub fn chain(&self) -> &'static [Locator] {
        match self {
            Capability::SearchMode => SEARCH_MODE_CHAIN,
            Capability::Input => INPUT_CHAIN,
            Capability::Send => SEND_CHAIN,
        }
    }

    /// Value of the marker attribute placed on the matched element.
    pub fn tag(&self) -> &'static str {
        match self {
            Capability::SearchMode => "search-mode",
            Capability::Input => "input",
            Capability::Send => "send",
        }
    }
}

fn js_string(s: &str) -> String {
    Value::from(s).to_string()
}
