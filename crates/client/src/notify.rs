//! User-visible notifications ("toasts").
//!
//! The gateway reports outcomes through the [`Notifier`] trait rather than a global. The
//! application opens a [`ToastChannel`] at startup, hands the sending side to the gateway and
//! drains the receiving side wherever it renders messages. Closing the channel is the teardown:
//! notifications sent afterwards are dropped.

use std::sync::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub const SUCCESS_TITLE: &str = "Success";
pub const ERROR_TITLE: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastVariant {
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: SUCCESS_TITLE.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            title: ERROR_TITLE.into(),
            description: description.into(),
            variant: ToastVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == ToastVariant::Destructive
    }
}

/// Sink for user-visible notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, toast: Toast);
}

/// Channel-backed [`Notifier`] with explicit setup and teardown.
#[derive(Debug)]
pub struct ToastChannel {
    sender: Mutex<Option<UnboundedSender<Toast>>>,
}

impl ToastChannel {
    /// Opens the channel, returning the notifier and the receiver to drain.
    pub fn open() -> (Self, UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                sender: Mutex::new(Some(tx)),
            },
            rx,
        )
    }

    /// Closes the channel. The receiver sees end-of-stream once queued toasts are drained.
    pub fn close(&self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
    }

    pub fn is_open(&self) -> bool {
        self.sender
            .lock()
            .map(|sender| sender.as_ref().is_some_and(|tx| !tx.is_closed()))
            .unwrap_or(false)
    }
}

impl Notifier for ToastChannel {
    fn notify(&self, toast: Toast) {
        let Ok(sender) = self.sender.lock() else {
            return;
        };
        match sender.as_ref() {
            Some(tx) => {
                if tx.send(toast).is_err() {
                    tracing::debug!("toast receiver dropped; notification discarded");
                }
            }
            None => tracing::debug!("toast channel closed; notification discarded"),
        }
    }
}
