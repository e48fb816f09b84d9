use super::*;
use crate::test_support::{FailingStore, RecordingBus, StaticProvider, values};
use searchlens_config::MemoryStore;
use searchlens_protocols::bus::BusMessage;
use searchlens_protocols::types::ProviderKind;
use serde_json::json;
use std::time::Duration;

struct Harness {
    bus: Arc<RecordingBus>,
    direct: Arc<StaticProvider>,
    scrape: Arc<StaticProvider>,
    dispatcher: Arc<Dispatcher>,
}

fn harness(store: Arc<dyn ConfigStore>) -> Harness {
    let bus = Arc::new(RecordingBus::with_contexts(&["tab-1", "tab-2"]));
    let direct = Arc::new(StaticProvider::answering(ProviderKind::Direct, "Sunny"));
    let scrape = Arc::new(StaticProvider::answering(ProviderKind::Scrape, "Scraped"));

    let providers = Arc::new(ProviderRegistry::new());
    providers.register(direct.clone()).unwrap();
    providers.register(scrape.clone()).unwrap();

    let dispatcher = Arc::new(Dispatcher::new(
        store,
        providers,
        ResponseRelay::new(bus.clone()),
    ));

    Harness {
        bus,
        direct,
        scrape,
        dispatcher,
    }
}

fn display(text: &str) -> BusMessage {
    BusMessage::DisplayAnswer {
        response: text.to_string(),
    }
}

#[tokio::test]
async fn test_disabled_runs_nothing_and_sends_nothing() {
    let store = Arc::new(MemoryStore::with_values(values(json!({"extensionEnabled": false}))));
    let h = harness(store);

    for query in ["weather", "rust async", ""] {
        let outcome = h.dispatcher.process(query, ContextId::from("tab-1")).await;
        assert_eq!(outcome, DispatchOutcome::Disabled);
    }

    assert_eq!(h.direct.calls(), 0);
    assert_eq!(h.scrape.calls(), 0);
    assert_eq!(h.bus.attempts(), 0);
}

#[tokio::test]
async fn test_absent_keys_default_to_enabled_direct() {
    let h = harness(Arc::new(MemoryStore::new()));

    let outcome = h.dispatcher.process("weather", ContextId::from("tab-1")).await;

    assert_eq!(outcome, DispatchOutcome::Relayed(PayloadKind::Answer));
    assert_eq!(h.direct.calls(), 1);
    assert_eq!(h.direct.queries(), vec!["weather".to_string()]);
    assert_eq!(h.bus.sent_to("tab-1", "display-answer"), vec![display("Sunny")]);
}

#[tokio::test]
async fn test_non_boolean_enabled_counts_as_enabled() {
    let store = Arc::new(MemoryStore::with_values(values(json!({"extensionEnabled": "no"}))));
    let h = harness(store);

    let outcome = h.dispatcher.process("weather", ContextId::from("tab-1")).await;
    assert_eq!(outcome, DispatchOutcome::Relayed(PayloadKind::Answer));
}

#[tokio::test]
async fn test_provider_selected_from_store() {
    let store = Arc::new(MemoryStore::with_values(values(json!({"answerProvider": "scrape"}))));
    let h = harness(store);

    h.dispatcher.process("weather", ContextId::from("tab-2")).await;

    assert_eq!(h.direct.calls(), 0);
    assert_eq!(h.scrape.calls(), 1);
    assert_eq!(h.bus.sent_to("tab-2", "display-answer"), vec![display("Scraped")]);
}

#[tokio::test]
async fn test_config_read_fresh_per_request() {
    let store = Arc::new(MemoryStore::new());
    let h = harness(store.clone());

    h.dispatcher.process("first", ContextId::from("tab-1")).await;
    store
        .set(values(json!({"answerProvider": "scrape"})))
        .await
        .unwrap();
    h.dispatcher.process("second", ContextId::from("tab-1")).await;

    assert_eq!(h.direct.queries(), vec!["first".to_string()]);
    assert_eq!(h.scrape.queries(), vec!["second".to_string()]);
}

#[tokio::test]
async fn test_store_failure_relays_one_error() {
    let h = harness(Arc::new(FailingStore));

    let outcome = h.dispatcher.process("weather", ContextId::from("tab-1")).await;

    assert_eq!(outcome, DispatchOutcome::Relayed(PayloadKind::Error));
    assert_eq!(h.direct.calls(), 0);
    let sent = h.bus.sent_to("tab-1", "display-answer");
    assert_eq!(sent.len(), 1);
    match &sent[0] {
        BusMessage::DisplayAnswer { response } => assert!(response.contains("store offline")),
        other => panic!("unexpected message: {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_provider_relays_error() {
    let bus = Arc::new(RecordingBus::with_contexts(&["tab-1"]));
    let store = Arc::new(MemoryStore::with_values(values(json!({"answerProvider": "scrape"}))));
    let dispatcher = Dispatcher::new(
        store,
        Arc::new(ProviderRegistry::new()),
        ResponseRelay::new(bus.clone()),
    );

    let outcome = dispatcher.process("weather", ContextId::from("tab-1")).await;

    assert_eq!(outcome, DispatchOutcome::Relayed(PayloadKind::Error));
    assert_eq!(bus.sent_to("tab-1", "display-answer").len(), 1);
}

#[tokio::test]
async fn test_blank_query_is_discarded() {
    let h = harness(Arc::new(MemoryStore::new()));

    let outcome = h.dispatcher.process("   ", ContextId::from("tab-1")).await;

    assert_eq!(outcome, DispatchOutcome::EmptyQuery);
    assert_eq!(h.direct.calls(), 0);
    assert_eq!(h.bus.attempts(), 0);
}

#[tokio::test]
async fn test_vanished_origin_does_not_surface() {
    let h = harness(Arc::new(MemoryStore::new()));

    let outcome = h.dispatcher.process("weather", ContextId::from("gone")).await;

    assert_eq!(outcome, DispatchOutcome::Relayed(PayloadKind::Answer));
    assert_eq!(h.bus.attempts(), 1);
    assert!(h.bus.sent().is_empty());
}

#[tokio::test]
async fn test_concurrent_requests_each_get_one_answer() {
    let bus = Arc::new(RecordingBus::with_contexts(&["tab-1", "tab-2"]));
    let providers = Arc::new(ProviderRegistry::new());
    let slow = Arc::new(
        StaticProvider::answering(ProviderKind::Direct, "done").with_delay(Duration::from_millis(20)),
    );
    providers.register(slow.clone()).unwrap();
    let dispatcher = Arc::new(Dispatcher::new(
        Arc::new(MemoryStore::new()),
        providers,
        ResponseRelay::new(bus.clone()),
    ));

    let handles = vec![
        dispatcher.handle("a".to_string(), ContextId::from("tab-1")),
        dispatcher.handle("b".to_string(), ContextId::from("tab-2")),
        dispatcher.handle("c".to_string(), ContextId::from("tab-1")),
    ];
    for handle in handles {
        assert_eq!(handle.await.unwrap(), DispatchOutcome::Relayed(PayloadKind::Answer));
    }

    assert_eq!(slow.calls(), 3);
    assert_eq!(bus.sent_to("tab-1", "display-answer").len(), 2);
    assert_eq!(bus.sent_to("tab-2", "display-answer").len(), 1);
}

#[tokio::test]
async fn test_failing_provider_relays_its_error_text() {
    let bus = Arc::new(RecordingBus::with_contexts(&["tab-1"]));
    let providers = Arc::new(ProviderRegistry::new());
    providers
        .register(Arc::new(StaticProvider::failing(ProviderKind::Direct, "Request timed out")))
        .unwrap();
    let dispatcher = Dispatcher::new(
        Arc::new(MemoryStore::new()),
        providers,
        ResponseRelay::new(bus.clone()),
    );

    let outcome = dispatcher.process("weather", ContextId::from("tab-1")).await;

    assert_eq!(outcome, DispatchOutcome::Relayed(PayloadKind::Error));
    assert_eq!(bus.sent_to("tab-1", "display-answer"), vec![display("Request timed out")]);
}

#[test]
fn test_shutdown_flag() {
    let dispatcher = Dispatcher::new(
        Arc::new(MemoryStore::new()),
        Arc::new(ProviderRegistry::new()),
        ResponseRelay::new(Arc::new(RecordingBus::with_contexts(&[]))),
    );
    assert!(!dispatcher.is_shut_down());
    dispatcher.shutdown();
    assert!(dispatcher.is_shut_down());
}
