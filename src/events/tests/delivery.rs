//! Subscription and delivery behaviour

use crate::events::api::*;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

fn counting_handler(counter: &Arc<AtomicUsize>) -> EventHandler {
    let counter = Arc::clone(counter);
    handler(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    })
}

#[test]
fn test_failing_handler_does_not_stop_later_handlers() {
    let mut bus = EventBus::new();
    let second_calls = Arc::new(AtomicUsize::new(0));

    bus.subscribe("e", handler(|_| Err("first handler broke".into())));
    bus.subscribe("e", counting_handler(&second_calls));

    let report = bus.publish("e", Payload::new());
    assert_eq!(second_calls.load(Ordering::SeqCst), 1);
    assert_eq!(report, DeliveryReport { delivered: 1, failed: 1 });

    bus.publish("e", Payload::new());
    assert_eq!(second_calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_panicking_handler_is_contained() {
    let mut bus = EventBus::new();
    let calls = Arc::new(AtomicUsize::new(0));

    bus.subscribe("e", handler(|_| panic!("handler exploded")));
    bus.subscribe("e", counting_handler(&calls));

    let report = bus.publish("e", Payload::new());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(report.failed, 1);
    assert!(!report.is_clean());
    assert_eq!(bus.statistics().failed, 1);
}

#[test]
fn test_duplicate_subscription_is_ignored() {
    let mut bus = EventBus::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let h = counting_handler(&calls);

    assert!(bus.subscribe("e", Arc::clone(&h)));
    assert!(!bus.subscribe("e", Arc::clone(&h)));
    assert_eq!(bus.subscriber_count("e"), 1);

    bus.publish("e", Payload::new());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unsubscribe_by_identity() {
    let mut bus = EventBus::new();
    let calls = Arc::new(AtomicUsize::new(0));
    let kept = counting_handler(&calls);
    let removed = counting_handler(&calls);

    bus.subscribe("e", Arc::clone(&kept));
    bus.subscribe("e", Arc::clone(&removed));
    assert!(bus.unsubscribe("e", &removed));
    assert!(!bus.unsubscribe("e", &removed));
    assert!(!bus.unsubscribe("other", &kept));

    bus.publish("e", Payload::new());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_handlers_run_in_subscription_order_then_observers() {
    let mut bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let seen = Arc::clone(&seen);
        bus.subscribe(
            "e",
            handler(move |_| {
                seen.lock().unwrap().push(label.to_string());
                Ok(())
            }),
        );
    }
    let observed = Arc::clone(&seen);
    bus.subscribe_all(any_handler(move |name, _| {
        observed.lock().unwrap().push(format!("any:{}", name));
        Ok(())
    }));

    bus.publish("e", Payload::new());
    assert_eq!(
        *seen.lock().unwrap(),
        vec!["first", "second", "third", "any:e"]
    );
}

#[test]
fn test_observer_sees_events_without_direct_subscribers() {
    let mut bus = EventBus::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let observer = any_handler(move |name, payload| {
        sink.lock().unwrap().push((name.to_string(), payload.clone()));
        Ok(())
    });

    assert!(bus.subscribe_all(Arc::clone(&observer)));
    assert!(!bus.subscribe_all(Arc::clone(&observer)));
    bus.publish("saved", payload([("path", json!("a.txt"))]));

    {
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "saved");
        assert_eq!(seen[0].1["path"], json!("a.txt"));
    }

    assert!(bus.unsubscribe_all(&observer));
    bus.publish("saved", Payload::new());
    assert_eq!(seen.lock().unwrap().len(), 1);
}

#[test]
fn test_handler_receives_record() {
    let mut bus = EventBus::new();
    let received = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&received);
    bus.subscribe(
        "user.login",
        handler(move |record| {
            *sink.lock().unwrap() = record.str_field("user").map(str::to_string);
            Ok(())
        }),
    );

    bus.publish("user.login", payload([("user", json!("sam"))]));
    assert_eq!(received.lock().unwrap().as_deref(), Some("sam"));
}

#[test]
fn test_cleanup_drops_subscribers_but_keeps_history() {
    use crate::core::cleanup::Cleanup;

    let mut bus = EventBus::new();
    let calls = Arc::new(AtomicUsize::new(0));
    bus.subscribe("e", counting_handler(&calls));
    bus.subscribe_all(any_handler(|_, _| Ok(())));
    bus.publish("e", Payload::new());

    bus.cleanup();
    bus.cleanup();
    assert_eq!(bus.subscriber_count("e"), 0);
    assert_eq!(bus.any_subscriber_count(), 0);
    assert_eq!(bus.history_len(), 1);

    bus.publish("e", Payload::new());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
