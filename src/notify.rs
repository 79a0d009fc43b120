//! One-shot user-visible error notifications.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

pub const LOOKUP_ERROR_MESSAGE: &str =
    "Oh no! An error occurred. Please check your inputs and try again.";

/// Surface that shows a transient message to the user.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}

/// Fires the notifier when the error flag turns on, and only then.
///
/// The last signaled value is kept so re-renders with an unchanged flag stay quiet.
#[derive(Debug, Default)]
pub struct ErrorSignal {
    last: Option<bool>,
}

impl ErrorSignal {
    /// Returns `true` if a notification was emitted.
    pub fn observe(&mut self, error: bool, notifier: &dyn Notifier) -> bool {
        if self.last == Some(error) {
            return false;
        }
        self.last = Some(error);

        if error {
            debug!("error flag raised, notifying");
            notifier.error(LOOKUP_ERROR_MESSAGE);
        }
        error
    }
}

/// Collects messages so the server can render them into the page's toast region.
#[derive(Debug, Clone, Default)]
pub struct ToastQueue {
    messages: Arc<Mutex<Vec<String>>>,
}

impl ToastQueue {
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(
            &mut *self
                .messages
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        )
    }
}

impl Notifier for ToastQueue {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
