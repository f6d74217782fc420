// File: src/layout.rs
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutState {
    pub sidebar_collapsed: bool,
    pub mobile_menu_open: bool,
}

/// Owner of the shared layout state. Screens subscribe to it instead of
/// reading a global; dropping the subscription unsubscribes.
#[derive(Debug, Clone)]
pub struct LayoutHandle {
    tx: watch::Sender<LayoutState>,
}

#[derive(Debug)]
pub struct LayoutSubscription {
    rx: watch::Receiver<LayoutState>,
}

impl LayoutHandle {
    pub fn new(initial: LayoutState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> LayoutSubscription {
        LayoutSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn current(&self) -> LayoutState {
        *self.tx.borrow()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.tx.send_if_modified(|s| {
            let changed = s.sidebar_collapsed != collapsed;
            s.sidebar_collapsed = collapsed;
            changed
        });
    }

    pub fn toggle_sidebar(&self) {
        self.tx.send_modify(|s| s.sidebar_collapsed = !s.sidebar_collapsed);
    }

    pub fn toggle_mobile_menu(&self) {
        self.tx.send_modify(|s| s.mobile_menu_open = !s.mobile_menu_open);
    }
}

impl LayoutSubscription {
    pub fn current(&self) -> LayoutState {
        *self.rx.borrow()
    }

    /// True once per change since the last call.
    pub fn take_changed(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(true) => {
                self.rx.borrow_and_update();
                true
            }
            _ => false,
        }
    }

    /// Width of the sidebar column for the current state.
    pub fn sidebar_width(&self) -> u16 {
        let state = self.current();
        if state.sidebar_collapsed && !state.mobile_menu_open {
            4
        } else {
            24
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribers_see_toggles() {
        let handle = LayoutHandle::new(LayoutState::default());
        let mut sub = handle.subscribe();
        assert!(!sub.take_changed());
        assert_eq!(sub.sidebar_width(), 24);

        handle.toggle_sidebar();
        assert!(sub.take_changed());
        assert!(!sub.take_changed());
        assert!(sub.current().sidebar_collapsed);
        assert_eq!(sub.sidebar_width(), 4);

        handle.toggle_mobile_menu();
        assert_eq!(sub.sidebar_width(), 24);
    }

    #[test]
    fn test_drop_unsubscribes() {
        let handle = LayoutHandle::new(LayoutState::default());
        let sub = handle.subscribe();
        assert_eq!(handle.subscriber_count(), 1);
        drop(sub);
        assert_eq!(handle.subscriber_count(), 0);
    }

    #[test]
    fn test_set_without_change_does_not_notify() {
        let handle = LayoutHandle::new(LayoutState::default());
        let mut sub = handle.subscribe();
        handle.set_sidebar_collapsed(false);
        assert!(!sub.take_changed());
        handle.set_sidebar_collapsed(true);
        assert!(sub.take_changed());
        assert!(handle.current().sidebar_collapsed);
    }
}
