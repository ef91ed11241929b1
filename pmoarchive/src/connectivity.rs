//! Network reachability tracking
//!
//! [`ConnectivityMonitor`] keeps the last known availability and notifies
//! subscribers when it changes. Subscribing returns a [`Subscription`]; the
//! callback stays registered until that handle is dropped. The registry only
//! holds weak references, so it never keeps a subscriber alive. Dropping a
//! subscription removes its entry at once; pruning dead entries during
//! notification is only a fallback.
//!
//! Transitions are delivered one at a time, in the order the probe observed
//! them. A callback may subscribe or query the state, but must not trigger
//! [`ConnectivityMonitor::on_platform_change`] itself.

use parking_lot::Mutex;
use pmoconfig::Config;
use std::{
    sync::{Arc, Weak},
    time::Duration,
};
use tokio::task::JoinHandle;

/// Callback invoked with the new availability on each transition
pub type ConnectivityCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Platform reachability query
pub trait ReachabilityProbe: Send + Sync {
    fn is_network_available(&self) -> bool;
}

impl<F> ReachabilityProbe for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn is_network_available(&self) -> bool {
        self()
    }
}

/// Reachability derived from the local network interfaces and routing table
#[derive(Debug, Clone, Copy, Default)]
pub struct InterfaceProbe;

impl ReachabilityProbe for InterfaceProbe {
    fn is_network_available(&self) -> bool {
        pmoutils::has_network_interface() && pmoutils::guess_local_ip().is_some()
    }
}

struct Registry {
    available: bool,
    next_id: u64,
    observers: Vec<(u64, Weak<dyn Fn(bool) + Send + Sync>)>,
}

const DEFAULT_POLL_SECS: u64 = 30;

pub struct ConnectivityMonitor {
    probe: Box<dyn ReachabilityProbe>,
    // state and observers share one lock: add and notify never interleave
    registry: Arc<Mutex<Registry>>,
    // held from probe query to the last callback of a transition
    notify: Mutex<()>,
}

impl ConnectivityMonitor {
    /// Creates a monitor initialised from the current state of `probe`.
    pub fn new(probe: impl ReachabilityProbe + 'static) -> Self {
        let available = probe.is_network_available();
        tracing::debug!(available, "Connectivity monitor started");
        Self {
            probe: Box::new(probe),
            registry: Arc::new(Mutex::new(Registry {
                available,
                next_id: 0,
                observers: Vec::new(),
            })),
            notify: Mutex::new(()),
        }
    }

    pub fn is_available(&self) -> bool {
        self.registry.lock().available
    }

    /// Registers `callback` until the returned handle is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        let callback: ConnectivityCallback = Arc::new(callback);
        let mut registry = self.registry.lock();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.observers.push((id, Arc::downgrade(&callback)));
        Subscription {
            id,
            _callback: callback,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.registry
            .lock()
            .observers
            .iter()
            .filter(|(_, observer)| observer.strong_count() > 0)
            .count()
    }

    /// Handles a platform reachability event: re-queries the probe and
    /// notifies subscribers if the availability changed.
    ///
    /// Returns `true` when a transition happened.
    pub fn on_platform_change(&self) -> bool {
        let _delivering = self.notify.lock();
        let available = self.probe.is_network_available();
        self.deliver(available)
    }

    #[cfg(test)]
    fn update(&self, available: bool) -> bool {
        let _delivering = self.notify.lock();
        self.deliver(available)
    }

    // caller holds `notify`
    fn deliver(&self, available: bool) -> bool {
        let callbacks = {
            let mut registry = self.registry.lock();
            if registry.available == available {
                return false;
            }
            registry.available = available;

            let mut live = Vec::with_capacity(registry.observers.len());
            registry.observers.retain(|(_, observer)| match observer.upgrade() {
                Some(callback) => {
                    live.push(callback);
                    true
                }
                None => false,
            });
            live
        };

        tracing::info!(available, subscribers = callbacks.len(), "Connectivity changed");
        // called outside the registry lock so callbacks may subscribe or query state
        for callback in callbacks {
            callback(available);
        }
        true
    }

    /// Polls the probe every `period` until the monitor is dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_watch(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let monitor = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let Some(monitor) = monitor.upgrade() else {
                    break;
                };
                monitor.on_platform_change();
            }
            tracing::debug!("Connectivity watch stopped");
        })
    }

    /// Starts [`Self::spawn_watch`] with the `archive.connectivity.poll_secs`
    /// period.
    pub fn watch_from_config(self: &Arc<Self>, config: &Config) -> JoinHandle<()> {
        let secs = match config.get_connectivity_poll_secs() {
            Ok(0) => {
                tracing::warn!("Connectivity poll period of 0s, using 1s");
                1
            }
            Ok(secs) => secs as u64,
            Err(e) => {
                tracing::warn!(
                    "Failed to read connectivity poll period: {}, using {}s",
                    e,
                    DEFAULT_POLL_SECS
                );
                DEFAULT_POLL_SECS
            }
        };
        tracing::debug!(poll_secs = secs, "Watching connectivity");
        self.spawn_watch(Duration::from_secs(secs))
    }
}

impl Default for ConnectivityMonitor {
    fn default() -> Self {
        Self::new(InterfaceProbe)
    }
}

impl std::fmt::Debug for ConnectivityMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock();
        f.debug_struct("ConnectivityMonitor")
            .field("available", &registry.available)
            .field("observers", &registry.observers.len())
            .finish()
    }
}

/// Keeps a connectivity callback registered; dropping it unsubscribes.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    _callback: ConnectivityCallback,
    registry: Weak<Mutex<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.lock().observers.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    #[test]
    fn test_callback_may_resubscribe() {
        let monitor = Arc::new(ConnectivityMonitor::new(|| false));
        let nested = Arc::new(Mutex::new(Vec::new()));
        let weak = Arc::downgrade(&monitor);
        let sink = nested.clone();
        let _sub = monitor.subscribe(move |_| {
            if let Some(m) = weak.upgrade() {
                sink.lock().push(m.subscribe(|_| {}));
            }
        });
        assert!(monitor.update(true));
        assert_eq!(monitor.subscriber_count(), 2);
    }

    #[test]
    fn test_dead_entries_are_pruned() {
        let monitor = ConnectivityMonitor::new(|| false);
        let _live = monitor.subscribe(|_| {});
        {
            let dead: ConnectivityCallback = Arc::new(|_: bool| {});
            monitor
                .registry
                .lock()
                .observers
                .push((u64::MAX, Arc::downgrade(&dead)));
        }
        assert_eq!(monitor.registry.lock().observers.len(), 2);
        assert_eq!(monitor.subscriber_count(), 1);

        assert!(monitor.update(true));
        assert_eq!(monitor.registry.lock().observers.len(), 1);
    }

    #[test]
    fn test_no_op_transition_is_silent() {
        let monitor = ConnectivityMonitor::new(|| true);
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let _sub = monitor.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert!(!monitor.on_platform_change());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_closure_probe() {
        let flag = Arc::new(AtomicBool::new(false));
        let probe_flag = flag.clone();
        let monitor = ConnectivityMonitor::new(move || probe_flag.load(Ordering::SeqCst));
        assert!(!monitor.is_available());
        flag.store(true, Ordering::SeqCst);
        assert!(monitor.on_platform_change());
        assert!(monitor.is_available());
    }
}
