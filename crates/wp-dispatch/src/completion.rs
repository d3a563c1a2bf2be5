use std::fmt;

use crate::Outcome;

/// One-shot completion callback.
///
/// `fire` consumes `self`, so a callback can run at most once by
/// construction.  Dropping a `Completion` without firing it is allowed (the
/// process is shutting down) but is logged.
pub struct Completion {
    callback: Option<Box<dyn FnOnce(Outcome) + Send>>,
}

impl Completion {
    pub fn new<F>(callback: F) -> Self
    where
        F: FnOnce(Outcome) + Send + 'static,
    {
        Self { callback: Some(Box::new(callback)) }
    }

    pub fn fire(mut self, outcome: Outcome) {
        if let Some(callback) = self.callback.take() {
            callback(outcome);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.callback.is_some() {
            tracing::debug!("completion dropped without firing");
        }
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion").field("pending", &self.callback.is_some()).finish()
    }
}
