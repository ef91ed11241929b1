use parking_lot::Mutex;
use pmoarchive::ConnectivityMonitor;
use pmoconfig::Config;
use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
    time::Duration,
};

fn switchable(initial: bool) -> (Arc<AtomicBool>, ConnectivityMonitor) {
    let online = Arc::new(AtomicBool::new(initial));
    let probe = online.clone();
    let monitor = ConnectivityMonitor::new(move || probe.load(Ordering::SeqCst));
    (online, monitor)
}

#[test]
fn test_transitions_are_notified() {
    let (online, monitor) = switchable(true);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let _sub = monitor.subscribe(move |available| sink.lock().push(available));

    online.store(false, Ordering::SeqCst);
    assert!(monitor.on_platform_change());
    // repeated events without a state change are ignored
    assert!(!monitor.on_platform_change());
    online.store(true, Ordering::SeqCst);
    assert!(monitor.on_platform_change());

    assert_eq!(*seen.lock(), vec![false, true]);
    assert!(monitor.is_available());
}

#[test]
fn test_dropping_subscription_unsubscribes() {
    let (online, monitor) = switchable(true);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let first = {
        let sink = seen.clone();
        monitor.subscribe(move |available| sink.lock().push(("first", available)))
    };
    let _second = {
        let sink = seen.clone();
        monitor.subscribe(move |available| sink.lock().push(("second", available)))
    };
    assert_eq!(monitor.subscriber_count(), 2);

    drop(first);
    assert_eq!(monitor.subscriber_count(), 1);

    online.store(false, Ordering::SeqCst);
    monitor.on_platform_change();
    assert_eq!(*seen.lock(), vec![("second", false)]);
}

#[test]
fn test_subscription_outlives_monitor() {
    let (_online, monitor) = switchable(true);
    let sub = monitor.subscribe(|_| {});
    drop(monitor);
    drop(sub);
}

#[tokio::test(start_paused = true)]
async fn test_watch_polls_probe() {
    let (online, monitor) = switchable(true);
    let monitor = Arc::new(monitor);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let sub = monitor.subscribe(move |available| sink.lock().push(available));

    let handle = monitor.spawn_watch(Duration::from_secs(30));
    online.store(false, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(*seen.lock(), vec![false]);

    drop(sub);
    drop(monitor);
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert!(handle.is_finished());
}

#[test]
fn test_overlapping_events_are_delivered_in_order() {
    let (online, monitor) = switchable(false);
    let monitor = Arc::new(monitor);
    let delivered = Arc::new(Mutex::new(Vec::new()));
    let sink = delivered.clone();
    let _sub = monitor.subscribe(move |available| {
        if available {
            thread::sleep(Duration::from_millis(300));
        }
        sink.lock().push(available);
    });

    let going_online = {
        let monitor = monitor.clone();
        let online = online.clone();
        thread::spawn(move || {
            online.store(true, Ordering::SeqCst);
            monitor.on_platform_change()
        })
    };
    thread::sleep(Duration::from_millis(100));
    online.store(false, Ordering::SeqCst);
    assert!(monitor.on_platform_change());
    assert!(going_online.join().unwrap());

    assert_eq!(*delivered.lock(), vec![true, false]);
    assert!(!monitor.is_available());
}

#[tokio::test(start_paused = true)]
async fn test_watch_period_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::load_config(dir.path().to_str().unwrap()).unwrap();
    config.set_connectivity_poll_secs(5).unwrap();

    let (online, monitor) = switchable(true);
    let monitor = Arc::new(monitor);
    let handle = monitor.watch_from_config(&config);

    tokio::time::sleep(Duration::from_secs(1)).await;
    online.store(false, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(monitor.is_available());

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(!monitor.is_available());
    handle.abort();
}
