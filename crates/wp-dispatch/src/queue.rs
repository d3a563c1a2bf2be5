//! The inbound action queue.
//!
//! Unbounded MPSC FIFO of boxed closures.  Producers never block or fail;
//! the consumer bounds per-tick work with [`ActionReceiver::drain_up_to`].

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::Navigator;

/// A queued unit of network-side work, run on the tick thread.
pub type Action = Box<dyn FnOnce(&mut dyn Navigator) + Send>;

/// Create a connected sender/receiver pair.
pub fn action_queue() -> (ActionSender, ActionReceiver) {
    let (tx, rx) = unbounded();
    (ActionSender { tx }, ActionReceiver { rx })
}

/// Producer half.  Cheap to clone; each clone keeps its own FIFO order.
#[derive(Clone, Debug)]
pub struct ActionSender {
    tx: Sender<Action>,
}

impl ActionSender {
    /// Append `action`.  Never blocks.
    ///
    /// If the receiver is gone the action is dropped; there is no tick left
    /// to run it.
    pub fn enqueue<F>(&self, action: F)
    where
        F: FnOnce(&mut dyn Navigator) + Send + 'static,
    {
        if self.tx.send(Box::new(action)).is_err() {
            tracing::trace!("action dropped: receiver closed");
        }
    }
}

/// Consumer half, owned by the tick.
#[derive(Debug)]
pub struct ActionReceiver {
    rx: Receiver<Action>,
}

impl ActionReceiver {
    /// Run at most `n` queued actions against `nav`, oldest first.
    ///
    /// Returns how many ran.
    pub fn drain_up_to(&self, n: usize, nav: &mut dyn Navigator) -> usize {
        let mut ran = 0;
        while ran < n {
            match self.rx.try_recv() {
                Ok(action) => {
                    action(nav);
                    ran += 1;
                }
                Err(_) => break,
            }
        }
        if ran > 0 {
            tracing::debug!(ran, pending = self.rx.len(), "drained action queue");
        }
        ran
    }

    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
