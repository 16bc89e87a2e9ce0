//! Toast Module
//!
//! One transient message at a time, auto-dismissed after five seconds.
//! Replacing or dismissing a toast cancels its timer, so a stale timer can
//! never clear a newer toast or fire an old close callback.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

/// How long a toast stays visible unless dismissed
pub const TOAST_DURATION: Duration = Duration::from_secs(5);

/// Visual category of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Info,
}

impl std::fmt::Display for ToastKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToastKind::Success => write!(f, "success"),
            ToastKind::Error => write!(f, "error"),
            ToastKind::Info => write!(f, "info"),
        }
    }
}

/// A message currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

type CloseCallback = Box<dyn FnOnce() + Send + 'static>;

struct Inner {
    toast: Option<Toast>,
    on_close: Option<CloseCallback>,
    // Bumped on every show/dismiss; an expired timer that lost the race
    // compares generations and does nothing.
    generation: u64,
}

impl Inner {
    fn close(&mut self) {
        self.toast = None;
        if let Some(callback) = self.on_close.take() {
            callback();
        }
    }
}

/// Owns the visible toast and its dismissal timer
pub struct ToastController {
    inner: Arc<Mutex<Inner>>,
    timer: Option<JoinHandle<()>>,
}

impl ToastController {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                toast: None,
                on_close: None,
                generation: 0,
            })),
            timer: None,
        }
    }

    /// Show a toast, replacing any visible one. The previous toast's timer
    /// is cancelled and its callback is dropped unfired. `on_close` runs
    /// exactly once: when the timer elapses or on explicit dismissal.
    pub fn show(
        &mut self,
        message: impl Into<String>,
        kind: ToastKind,
        on_close: impl FnOnce() + Send + 'static,
    ) {
        let toast = Toast {
            message: message.into(),
            kind,
        };
        debug!("Showing {} toast: {}", toast.kind, toast.message);

        let generation = {
            let Ok(mut inner) = self.inner.lock() else {
                return;
            };
            inner.generation += 1;
            inner.toast = Some(toast);
            inner.on_close = Some(Box::new(on_close));
            inner.generation
        };

        if let Some(timer) = self.timer.take() {
            timer.abort();
        }

        let inner = Arc::clone(&self.inner);
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(TOAST_DURATION).await;
            if let Ok(mut inner) = inner.lock() {
                if inner.generation == generation {
                    inner.close();
                }
            }
        }));
    }

    /// Dismiss the visible toast early, firing its close callback
    pub fn dismiss(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        if let Ok(mut inner) = self.inner.lock() {
            inner.generation += 1;
            inner.close();
        }
    }

    /// The toast currently on screen, if any
    pub fn current(&self) -> Option<Toast> {
        self.inner.lock().ok().and_then(|inner| inner.toast.clone())
    }
}

impl Default for ToastController {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ToastController {
    fn drop(&mut self) {
        // A timer outliving the controller must not fire the callback
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_callback(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + 'static {
        let counter = Arc::clone(counter);
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_auto_dismisses_after_five_seconds() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut toasts = ToastController::new();
        toasts.show("Saved.", ToastKind::Success, counter_callback(&fired));
        assert!(toasts.current().is_some());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(toasts.current().is_some());
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(toasts.current().is_none());
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacing_a_toast_restarts_the_timer() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut toasts = ToastController::new();

        toasts.show("first", ToastKind::Info, counter_callback(&first));
        tokio::time::sleep(Duration::from_secs(3)).await;
        toasts.show("second", ToastKind::Error, counter_callback(&second));

        // Three more seconds: past the first deadline, short of the second
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 0);
        assert_eq!(toasts.current().unwrap().message, "second");

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
        assert!(toasts.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_early_dismissal_fires_callback_once() {
        let fired = Arc::new(AtomicUsize::new(0));
        let mut toasts = ToastController::new();

        toasts.show("bye", ToastKind::Info, counter_callback(&fired));
        toasts.dismiss();
        assert!(toasts.current().is_none());
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // The aborted timer must not fire it again
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dismiss_without_toast_is_a_no_op() {
        let mut toasts = ToastController::new();
        toasts.dismiss();
        assert!(toasts.current().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_cancels_pending_callback() {
        let fired = Arc::new(AtomicUsize::new(0));
        {
            let mut toasts = ToastController::new();
            toasts.show("gone", ToastKind::Info, counter_callback(&fired));
        }
        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
