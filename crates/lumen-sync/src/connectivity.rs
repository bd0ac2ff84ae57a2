//! # Connectivity Monitor
//!
//! Tracks the terminal's single online/offline flag.
//!
//! ## Behavior
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Connectivity Monitor                            │
//! │                                                                     │
//! │  Host platform signal ──► set_online(bool)  (no debouncing)         │
//! │                                │                                    │
//! │                                ▼                                    │
//! │                        watch channel (bool)                         │
//! │                        ├── is_online() — finalize branch            │
//! │                        └── subscribe() — host status banner         │
//! │                                                                     │
//! │  A transition to online only surfaces the pending-queue size to     │
//! │  the operator. It NEVER auto-triggers the reconciler: draining is   │
//! │  an explicit operator action, so a reconnect can't fire duplicate   │
//! │  submissions into the middle of an edit.                            │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use tokio::sync::watch;
use tracing::info;

/// Holds the online flag and broadcasts changes to subscribers.
#[derive(Debug)]
pub struct ConnectivityMonitor {
    state: watch::Sender<bool>,
}

impl ConnectivityMonitor {
    /// Creates a monitor initialized from the host platform's current
    /// signal.
    pub fn new(initially_online: bool) -> Self {
        let (state, _) = watch::channel(initially_online);
        ConnectivityMonitor { state }
    }

    /// Current flag value.
    pub fn is_online(&self) -> bool {
        *self.state.borrow()
    }

    /// Applies a connectivity-change event from the host platform.
    ///
    /// Transitions are logged; repeated same-value events are absorbed
    /// silently (the platform may re-emit its current state).
    pub fn set_online(&self, online: bool) {
        let previous = *self.state.borrow();
        if previous != online {
            if online {
                info!("Connectivity restored; terminal is online");
            } else {
                info!("Connectivity lost; terminal is offline");
            }
        }
        self.state.send_replace(online);
    }

    /// Subscribes to flag changes, for the host's status banner.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.state.subscribe()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert!(ConnectivityMonitor::new(true).is_online());
        assert!(!ConnectivityMonitor::new(false).is_online());
    }

    #[test]
    fn test_flips_follow_platform_events() {
        let monitor = ConnectivityMonitor::new(true);

        monitor.set_online(false);
        assert!(!monitor.is_online());

        monitor.set_online(true);
        assert!(monitor.is_online());
    }

    #[tokio::test]
    async fn test_subscribers_observe_changes() {
        let monitor = ConnectivityMonitor::new(true);
        let mut rx = monitor.subscribe();

        monitor.set_online(false);
        rx.changed().await.unwrap();
        assert!(!*rx.borrow());
    }

    #[test]
    fn test_same_value_events_are_absorbed() {
        let monitor = ConnectivityMonitor::new(false);
        monitor.set_online(false);
        assert!(!monitor.is_online());
    }
}
