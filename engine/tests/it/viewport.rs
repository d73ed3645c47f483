use std::time::Duration;

use engine::{VIEWPORT_DEBOUNCE, ViewportTracker};
use vessel_core::ViewportBounds;

fn bounds(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> ViewportBounds {
    ViewportBounds::new(min_lat, min_lon, max_lat, max_lon).unwrap()
}

#[test]
fn test_first_bounds_always_count_as_significant() {
    let tracker = ViewportTracker::new();
    assert!(tracker.significant_change(&bounds(40.0, 27.0, 42.0, 30.0)));
}

#[test]
fn test_small_movements_are_suppressed() {
    let mut tracker = ViewportTracker::new();
    tracker.apply(bounds(40.0, 27.0, 42.0, 30.0));

    // A 10% pan of the lat span.
    assert!(!tracker.significant_change(&bounds(40.2, 27.0, 42.2, 30.0)));
    // A 50% pan.
    assert!(tracker.significant_change(&bounds(41.0, 27.0, 43.0, 30.0)));
}

#[tokio::test(start_paused = true)]
async fn test_rescheduling_cancels_the_previous_debounce_timer() {
    let mut tracker = ViewportTracker::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    let first = tx.clone();
    tracker.schedule(async move {
        let _ = first.send(1);
    });
    let second = tx.clone();
    tracker.schedule(async move {
        let _ = second.send(2);
    });

    tokio::time::sleep(VIEWPORT_DEBOUNCE * 3).await;

    // Only the latest scheduled delivery fires.
    assert_eq!(Some(2), rx.recv().await);
    assert!(rx.try_recv().is_err());
}

#[tokio::test(start_paused = true)]
async fn test_delivery_waits_for_the_debounce_window() {
    let mut tracker = ViewportTracker::new();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    tracker.schedule(async move {
        let _ = tx.send(());
    });

    tokio::time::sleep(VIEWPORT_DEBOUNCE - Duration::from_millis(50)).await;
    assert!(rx.try_recv().is_err());

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(Some(()), rx.recv().await);
}
