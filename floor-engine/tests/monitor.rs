use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use floor_engine::{FloorEngine, FloorMonitor};
use parking_lot::Mutex;
use shared::{Acceptance, Reservation, ReservationCategory, ReservationStatus, ReservationType};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
}

fn at(hour: u32, minute: u32) -> NaiveDateTime {
    day().and_hms_opt(hour, minute, 0).unwrap()
}

fn dinner(start: &str, end: &str) -> Reservation {
    Reservation {
        id: Uuid::new_v4(),
        name: "Colombo".to_string(),
        number_of_persons: 2,
        date_string: "2025-03-14".to_string(),
        category: ReservationCategory::Dinner,
        start_time: start.to_string(),
        end_time: end.to_string(),
        acceptance: Acceptance::Confirmed,
        status: ReservationStatus::Pending,
        reservation_type: ReservationType::InAdvance,
        tables: vec![1],
    }
}

fn shared_engine(reservations: &[Reservation]) -> Arc<Mutex<FloorEngine>> {
    let mut engine = FloorEngine::default();
    engine.preload(day(), reservations);
    Arc::new(Mutex::new(engine))
}

#[tokio::test]
async fn test_monitor_publishes_alerts() {
    let late = dinner("19:00", "22:00");
    let engine = shared_engine(std::slice::from_ref(&late));
    let shutdown = CancellationToken::new();

    let monitor = FloorMonitor::new(engine, shutdown.clone(), Duration::from_millis(10))
        .with_clock(Arc::new(|| at(19, 30)));
    let mut alerts = monitor.subscribe();
    let handle = tokio::spawn(monitor.run());

    tokio::time::timeout(Duration::from_secs(2), alerts.changed())
        .await
        .expect("monitor did not publish")
        .unwrap();
    assert_eq!(alerts.borrow_and_update().late, vec![late.id]);

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();
}

#[tokio::test]
async fn test_monitor_sees_engine_changes() {
    let engine = shared_engine(&[]);
    let shutdown = CancellationToken::new();

    let monitor = FloorMonitor::new(engine.clone(), shutdown.clone(), Duration::from_millis(10))
        .with_clock(Arc::new(|| at(20, 45)));
    let mut alerts = monitor.subscribe();
    let handle = tokio::spawn(monitor.run());

    let ending = dinner("19:00", "21:00");
    assert!(engine.lock().upsert(ending.clone()));

    tokio::time::timeout(Duration::from_secs(2), alerts.changed())
        .await
        .expect("monitor did not publish")
        .unwrap();
    assert_eq!(alerts.borrow_and_update().ending_soon, vec![ending.id]);

    shutdown.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn test_monitor_stops_on_cancellation() {
    let shutdown = CancellationToken::new();
    let monitor = FloorMonitor::new(shared_engine(&[]), shutdown.clone(), Duration::from_secs(3600));
    let handle = tokio::spawn(monitor.run());

    shutdown.cancel();
    tokio::time::timeout(Duration::from_secs(2), handle)
        .await
        .expect("monitor did not stop")
        .unwrap();
}
