//! Integration tests for the dispatch queue and worker pool

mod common;

use common::{dispatcher, message, RecordingRelay};
use mailer_rs::error::MailError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const STOP_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_message_delivered_exactly_once() {
    let relay = Arc::new(RecordingRelay::new().with_delay(Duration::from_millis(5)));
    let dispatcher = dispatcher(100, relay.clone());
    dispatcher.start(3);

    let mut ids = HashSet::new();
    for i in 0..10 {
        let msg = message(&format!("m{}", i));
        ids.insert(msg.id());
        dispatcher.enqueue(msg).unwrap();
    }

    timeout(STOP_TIMEOUT, dispatcher.stop()).await.unwrap();

    let sent = relay.sent();
    assert_eq!(sent.len(), 10);
    let delivered: HashSet<_> = sent.iter().map(|m| m.id()).collect();
    assert_eq!(delivered, ids);
}

#[tokio::test]
async fn test_stop_drains_buffered_messages() {
    let relay = Arc::new(RecordingRelay::new().with_delay(Duration::from_millis(20)));
    let dispatcher = dispatcher(10, relay.clone());
    dispatcher.start(1);

    for i in 0..5 {
        dispatcher.enqueue(message(&format!("m{}", i))).unwrap();
    }

    timeout(STOP_TIMEOUT, dispatcher.stop()).await.unwrap();

    assert_eq!(relay.sent().len(), 5);
    assert_eq!(dispatcher.running_workers(), 0);
    assert!(dispatcher.queue().is_empty());
}

#[tokio::test]
async fn test_single_worker_keeps_fifo_order() {
    let relay = Arc::new(RecordingRelay::new());
    let dispatcher = dispatcher(10, relay.clone());

    for subject in ["A", "B", "C", "D"] {
        dispatcher.enqueue(message(subject)).unwrap();
    }
    dispatcher.start(1);
    timeout(STOP_TIMEOUT, dispatcher.stop()).await.unwrap();

    assert_eq!(relay.subjects(), vec!["A", "B", "C", "D"]);
}

#[tokio::test]
async fn test_full_queue_rejects_without_blocking() {
    let relay = Arc::new(RecordingRelay::new());
    let dispatcher = dispatcher(2, relay.clone());

    dispatcher.enqueue(message("A")).unwrap();
    dispatcher.enqueue(message("B")).unwrap();
    assert!(matches!(
        dispatcher.enqueue(message("C")),
        Err(MailError::QueueFull)
    ));

    dispatcher.start(1);
    timeout(STOP_TIMEOUT, dispatcher.stop()).await.unwrap();

    assert_eq!(relay.subjects(), vec!["A", "B"]);
}

#[tokio::test]
async fn test_delivery_failure_does_not_stop_worker() {
    let relay = Arc::new(RecordingRelay::new().failing_on("bounce"));
    let dispatcher = dispatcher(10, relay.clone());
    dispatcher.start(1);

    dispatcher.enqueue(message("first")).unwrap();
    dispatcher.enqueue(message("bounce")).unwrap();
    dispatcher.enqueue(message("last")).unwrap();

    timeout(STOP_TIMEOUT, dispatcher.stop()).await.unwrap();

    assert_eq!(relay.subjects(), vec!["first", "last"]);
}

#[tokio::test]
async fn test_idle_workers_stop_promptly() {
    let relay = Arc::new(RecordingRelay::new());
    let dispatcher = dispatcher(10, relay.clone());
    dispatcher.start(4);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(dispatcher.running_workers(), 4);

    timeout(Duration::from_secs(1), dispatcher.stop())
        .await
        .unwrap();
    assert_eq!(dispatcher.running_workers(), 0);
    assert!(relay.sent().is_empty());
}

#[tokio::test]
async fn test_enqueue_after_stop_is_refused() {
    let relay = Arc::new(RecordingRelay::new());
    let dispatcher = dispatcher(10, relay.clone());
    dispatcher.start(2);
    timeout(STOP_TIMEOUT, dispatcher.stop()).await.unwrap();

    assert!(matches!(
        dispatcher.enqueue(message("late")),
        Err(MailError::QueueClosed)
    ));
    assert!(relay.sent().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers_and_workers() {
    let relay = Arc::new(RecordingRelay::new());
    let dispatcher = dispatcher(100, relay.clone());
    dispatcher.start(4);

    let mut producers = Vec::new();
    for p in 0..4 {
        let dispatcher = Arc::clone(&dispatcher);
        producers.push(tokio::spawn(async move {
            for i in 0..25 {
                dispatcher
                    .enqueue(message(&format!("p{}-{}", p, i)))
                    .unwrap();
            }
        }));
    }
    for producer in producers {
        producer.await.unwrap();
    }

    timeout(STOP_TIMEOUT, dispatcher.stop()).await.unwrap();

    let subjects: HashSet<_> = relay.subjects().into_iter().collect();
    assert_eq!(subjects.len(), 100);
    assert_eq!(relay.sent().len(), 100);
}

#[tokio::test]
async fn test_stop_waits_for_in_flight_send() {
    let relay = Arc::new(RecordingRelay::new().with_delay(Duration::from_millis(200)));
    let dispatcher = dispatcher(10, relay.clone());
    dispatcher.start(1);

    dispatcher.enqueue(message("slow")).unwrap();
    // Let the worker pick it up and enter the relay
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(dispatcher.queue().is_empty());

    timeout(STOP_TIMEOUT, dispatcher.stop()).await.unwrap();

    assert_eq!(relay.subjects(), vec!["slow"]);
}
