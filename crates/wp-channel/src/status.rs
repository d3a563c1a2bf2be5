//! The status-display collaborator for `update_state`.

/// Receives status deltas (`update_state` commands).
///
/// Called on the network thread, hence `Send + Sync`.
pub trait StatusDisplay: Send + Sync {
    fn pop_status(&self, key: &str, delta: i32);
}

/// Writes status deltas to the log.  Used when no display is attached.
#[derive(Copy, Clone, Debug, Default)]
pub struct LogStatus;

impl StatusDisplay for LogStatus {
    fn pop_status(&self, key: &str, delta: i32) {
        tracing::info!(key, delta, "status update");
    }
}
