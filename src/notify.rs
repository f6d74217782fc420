// File: src/notify.rs
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const TOAST_TTL: Duration = Duration::from_secs(4);
const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    pub expires: Instant,
}

/// Transient success/failure messages shown over the screen.
#[derive(Debug, Clone, Default)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, text: impl Into<String>) {
        self.push_at(kind, text, Instant::now());
    }

    pub fn push_at(&mut self, kind: ToastKind, text: impl Into<String>, now: Instant) {
        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            kind,
            text: text.into(),
            expires: now + TOAST_TTL,
        });
    }

    pub fn success(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Success, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Error, text);
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(ToastKind::Info, text);
    }

    pub fn prune(&mut self, now: Instant) {
        self.toasts.retain(|t| t.expires > now);
    }

    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toasts_expire() {
        let mut n = Notifications::new();
        let start = Instant::now();
        n.push_at(ToastKind::Success, "Saved", start);
        n.push_at(ToastKind::Error, "Nope", start + Duration::from_secs(2));

        n.prune(start + Duration::from_secs(3));
        assert_eq!(n.latest().map(|t| t.text.as_str()), Some("Nope"));
        assert_eq!(n.iter().count(), 2);

        n.prune(start + TOAST_TTL + Duration::from_millis(1));
        assert_eq!(n.iter().count(), 1);

        n.prune(start + TOAST_TTL * 2);
        assert!(n.is_empty());
    }

    #[test]
    fn test_queue_is_bounded() {
        let mut n = Notifications::new();
        for i in 0..8 {
            n.info(format!("msg {}", i));
        }
        assert_eq!(n.iter().count(), MAX_TOASTS);
        assert_eq!(n.iter().next().unwrap().text, "msg 3");
        assert_eq!(n.latest().unwrap().text, "msg 7");
    }
}
