use std::time::Duration;

use super::*;
use crate::fake::{FakeHost, FakePage};
use crate::host::BrowsingHost;

fn poller(max_attempts: u32) -> Poller {
    Poller::new(max_attempts, Duration::from_millis(1))
}

async fn open(host: &FakeHost) -> Box<dyn EphemeralPage> {
    host.open_hidden("https://chat.example/").await.unwrap()
}

#[tokio::test]
async fn test_structural_markers_win() {
    let host = FakeHost::new(FakePage {
        present: vec!["#chat-input", "textarea", "#send-message-button", "button"],
        ..Default::default()
    });
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(1), poller(1));

    let controls = driver.locate().await;

    assert_eq!(controls.input, Some(Locator::Css("#chat-input")));
    assert_eq!(controls.send, Some(Locator::Css("#send-message-button")));
    // generic `button` still satisfies search mode
    assert_eq!(controls.search_mode, Some(Locator::Css("button")));
}

#[tokio::test]
async fn test_label_match_used_when_no_markers() {
    let host = FakeHost::new(FakePage {
        present: vec!["textarea"],
        buttons: vec!["发送消息"],
        ..Default::default()
    });
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(1), poller(1));

    let controls = driver.locate().await;

    assert_eq!(controls.input, Some(Locator::Css("textarea")));
    assert_eq!(controls.send, Some(Locator::ButtonText(&["发送", "Send"])));
    assert_eq!(controls.search_mode, None);
    assert!(controls.is_usable());
}

#[tokio::test]
async fn test_discovery_needs_input() {
    let host = FakeHost::new(FakePage {
        present: vec![".websearch_button", "#send-message-button"],
        ..Default::default()
    });
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(3), poller(1));

    let result = driver.discover(&CancellationToken::new()).await;

    match result {
        Err(ScrapeError::Timeout(msg)) => assert!(msg.contains("3 attempts")),
        other => panic!("unexpected: {:?}", other),
    }
}

#[tokio::test]
async fn test_discovery_cancelled() {
    let host = FakeHost::new(FakePage::default());
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(10), poller(1));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = driver.discover(&cancel).await;
    assert!(matches!(result, Err(ScrapeError::Cancelled)));
}

#[tokio::test]
async fn test_submit_clicks_send() {
    let host = FakeHost::new(FakePage::chat());
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(1), poller(1));

    let controls = driver.discover(&CancellationToken::new()).await.unwrap();
    driver.fill("rust").await.unwrap();
    driver.submit(&controls).await.unwrap();

    assert_eq!(host.actions(), vec!["fill:input:rust", "click:send"]);
}

/// A page whose only button is "Send": the generic `button` fallback gives
/// search mode the same element the send chain finds by label.
fn single_button_page() -> FakePage {
    FakePage {
        present: vec!["textarea", "button", "button:last-child"],
        buttons: vec!["Send"],
        ..Default::default()
    }
    .with_alias("button", "Send")
    .with_alias("button:last-child", "Send")
}

#[tokio::test]
async fn test_one_element_keeps_search_mode_and_send_tags() {
    let host = FakeHost::new(single_button_page());
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(1), poller(1));

    let controls = driver.discover(&CancellationToken::new()).await.unwrap();
    assert_eq!(controls.search_mode, Some(Locator::Css("button")));
    assert_eq!(controls.send, Some(Locator::ButtonText(&["发送", "Send"])));

    driver.activate_search_mode().await.unwrap();
    driver.fill("rust").await.unwrap();
    driver.submit(&controls).await.unwrap();

    assert_eq!(
        host.actions(),
        vec!["click:search-mode", "fill:input:rust", "click:send"]
    );
}

#[tokio::test]
async fn test_relocating_moves_only_that_tag() {
    let host = FakeHost::new(FakePage::chat());
    let page = open(&host).await;

    assert!(page.mark(&Locator::Css("#chat-input"), "input").await.unwrap());
    assert!(page.mark(&Locator::Css("#send-message-button"), "send").await.unwrap());
    // a failed lookup clears the stale tag but not the others
    assert!(!page.mark(&Locator::Css("#missing"), "input").await.unwrap());

    assert!(matches!(
        page.fill("input", "q").await,
        Err(ScrapeError::ElementNotFound(_))
    ));
    page.click("send").await.unwrap();
    assert_eq!(host.actions(), vec!["click:send"]);
}

#[tokio::test]
async fn test_submit_falls_back_to_enter() {
    let host = FakeHost::new(FakePage {
        present: vec![".websearch_button", "#chat-input"],
        ..Default::default()
    });
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(1), poller(1));

    let controls = driver.discover(&CancellationToken::new()).await.unwrap();
    assert!(controls.send.is_none());
    driver.submit(&controls).await.unwrap();

    assert_eq!(host.actions(), vec!["enter:input"]);
}

#[tokio::test]
async fn test_answer_from_container_after_delay() {
    let host = FakeHost::new(FakePage {
        answer_delay: 7,
        ..FakePage::chat().with_answer(".markdown-body", "  Rust is fast.  ")
    });
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(1), poller(5));

    let (text, source) = driver.await_answer(&CancellationToken::new()).await.unwrap();

    assert_eq!(text, "Rust is fast.");
    assert_eq!(source, AnswerSource::Container(Locator::Css(".markdown-body")));
}

#[tokio::test]
async fn test_answer_prefers_earlier_container() {
    let host = FakeHost::new(
        FakePage::chat()
            .with_answer(".markdown-body", "generic")
            .with_answer("[data-testid=\"chat-response\"]", "specific"),
    );
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(1), poller(1));

    let (text, _) = driver.await_answer(&CancellationToken::new()).await.unwrap();
    assert_eq!(text, "specific");
}

#[tokio::test]
async fn test_answer_falls_back_to_body() {
    let host = FakeHost::new(FakePage {
        body: "\n Whole page text \n".to_string(),
        ..FakePage::chat()
    });
    let page = open(&host).await;
    let driver = AutomationDriver::new(page.as_ref(), poller(1), poller(2));

    let (text, source) = driver.await_answer(&CancellationToken::new()).await.unwrap();

    assert_eq!(text, "Whole page text");
    assert_eq!(source, AnswerSource::PageBody);
}
