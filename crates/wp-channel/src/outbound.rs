//! The shared outbound reporter and the connection lifecycle flag.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::Sender;

use wp_core::{ActionId, AgentId, CommandKind};

use crate::protocol::{encode_line, OutboundMessage, Status};

// ── ConnectionState ───────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectionState {
    Disconnected = 0,
    Connecting   = 1,
    Open         = 2,
    Closing      = 3,
}

impl ConnectionState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Open,
            3 => ConnectionState::Closing,
            _ => ConnectionState::Disconnected,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
        })
    }
}

// ── Outbound ──────────────────────────────────────────────────────────────────

struct Inner {
    state:    AtomicU8,
    writer:   Mutex<Option<Sender<String>>>,
    agent_id: Mutex<AgentId>,
    /// Set after the first dropped send is logged at `warn`.
    warned:   AtomicBool,
}

/// Fire-and-forget sender shared by the reader thread, completion callbacks,
/// and the channel itself.
///
/// Every send checks the connection state first; frames sent while not
/// `Open` are discarded, never buffered.
#[derive(Clone)]
pub struct Outbound {
    inner: Arc<Inner>,
}

impl Outbound {
    /// A reporter with no connection attached.
    pub fn new(agent_id: AgentId) -> Self {
        Self {
            inner: Arc::new(Inner {
                state:    AtomicU8::new(ConnectionState::Disconnected as u8),
                writer:   Mutex::new(None),
                agent_id: Mutex::new(agent_id),
                warned:   AtomicBool::new(false),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.state.load(Ordering::Acquire))
    }

    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    pub fn agent_id(&self) -> AgentId {
        lock(&self.inner.agent_id).clone()
    }

    pub(crate) fn set_agent_id(&self, agent_id: AgentId) {
        *lock(&self.inner.agent_id) = agent_id;
    }

    pub(crate) fn set_state(&self, state: ConnectionState) {
        self.inner.state.store(state as u8, Ordering::Release);
    }

    /// Route sends to `writer` and mark the connection open.
    pub(crate) fn attach(&self, writer: Sender<String>) {
        *lock(&self.inner.writer) = Some(writer);
        self.inner.warned.store(false, Ordering::Relaxed);
        self.set_state(ConnectionState::Open);
    }

    /// Drop the writer handle.  The writer thread exits once it has flushed
    /// what was already queued.
    pub(crate) fn detach(&self) {
        lock(&self.inner.writer).take();
    }

    /// Reader or writer hit end-of-stream or an error.  A deliberate close in
    /// progress keeps its `Closing` state.
    pub(crate) fn connection_lost(&self) {
        let _ = self.inner.state.compare_exchange(
            ConnectionState::Open as u8,
            ConnectionState::Disconnected as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
        if self.state() != ConnectionState::Closing {
            self.detach();
        }
    }

    /// Queue `msg` for the writer.  Returns `false` if it was dropped.
    pub fn send(&self, msg: &OutboundMessage<'_>) -> bool {
        if !self.is_open() {
            if !self.inner.warned.swap(true, Ordering::Relaxed) {
                tracing::warn!(kind = msg.kind(), state = %self.state(), "connection not open; dropping outbound frames");
            } else {
                tracing::trace!(kind = msg.kind(), "dropped outbound frame");
            }
            return false;
        }
        let line = match encode_line(msg) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(kind = msg.kind(), error = %e, "failed to encode outbound frame");
                return false;
            }
        };
        match lock(&self.inner.writer).as_ref() {
            Some(tx) => {
                let sent = tx.send(line).is_ok();
                tracing::trace!(kind = msg.kind(), sent, "outbound frame");
                sent
            }
            None => false,
        }
    }

    // ── Convenience senders ───────────────────────────────────────────────

    pub fn hello(&self, capabilities: &[String]) -> bool {
        let agent_id = self.agent_id();
        self.send(&OutboundMessage::Hello { agent_id: agent_id.as_str(), cap: capabilities })
    }

    pub fn pong(&self) -> bool {
        self.send(&OutboundMessage::Pong)
    }

    pub fn ack(&self, action_id: &ActionId) -> bool {
        let agent_id = self.agent_id();
        self.send(&OutboundMessage::Ack { agent_id: agent_id.as_str(), action_id: action_id.as_str() })
    }

    /// `complete` with `status = ok` when `error` is `None`, else `error`.
    pub fn complete(&self, cmd: &CommandKind, action_id: &ActionId, error: Option<&str>) -> bool {
        let agent_id = self.agent_id();
        self.send(&OutboundMessage::Complete {
            cmd:       cmd.as_str(),
            agent_id:  agent_id.as_str(),
            action_id: action_id.as_str(),
            status:    if error.is_some() { Status::Error } else { Status::Ok },
            error,
        })
    }
}

impl fmt::Debug for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Outbound")
            .field("state", &self.state())
            .field("agent_id", &self.agent_id())
            .finish()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
