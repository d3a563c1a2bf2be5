//! `RemoteChannel`: connection lifecycle and the reader/writer threads.

use std::io::{BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver};

use wp_core::{AgentId, SimRng};
use wp_dispatch::ActionSender;
use wp_locations::RouteResolver;

use crate::protocol::decode_line;
use crate::{ChannelError, ChannelResult, CommandHandler, ConnectionState, Outbound, StatusDisplay};

// ── Config ────────────────────────────────────────────────────────────────────

/// Settings fixed for the channel's lifetime.
#[derive(Clone, Debug)]
pub struct ChannelConfig {
    /// Sent in `hello`.
    pub capabilities:  Vec<String>,
    /// Bound on flushing queued frames during [`RemoteChannel::shutdown`].
    pub close_timeout: Duration,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capabilities:  vec!["waiting".to_owned()],
            close_timeout: Duration::from_millis(100),
        }
    }
}

/// Normalise `tcp://host:port` or `host:port` to `host:port`.
pub fn parse_endpoint(url: &str) -> ChannelResult<String> {
    let invalid = |reason| ChannelError::InvalidUrl { url: url.to_owned(), reason };
    let rest = match url.trim().split_once("://") {
        Some(("tcp", rest)) => rest,
        Some(_) => return Err(invalid("unsupported scheme (expected tcp://)")),
        None => url.trim(),
    };
    let endpoint = rest.trim_end_matches('/');
    let Some((host, port)) = endpoint.rsplit_once(':') else {
        return Err(invalid("missing port"));
    };
    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    if port.parse::<u16>().is_err() {
        return Err(invalid("port is not a number in 0..=65535"));
    }
    Ok(endpoint.to_owned())
}

// ── RemoteChannel ─────────────────────────────────────────────────────────────

struct Connection {
    stream: TcpStream,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

/// Persistent connection to the controller.
///
/// Construction does no I/O.  [`connect`](Self::connect) opens the socket,
/// sends `hello`, and starts the receive loop; a failure there is logged and
/// returned, and [`retry`](Self::retry) can be called later.  There is no
/// automatic reconnection.
pub struct RemoteChannel {
    config:   ChannelConfig,
    url:      Option<String>,
    outbound: Outbound,
    handler:  Arc<Mutex<CommandHandler>>,
    conn:     Option<Connection>,
}

impl RemoteChannel {
    pub fn new(
        config:   ChannelConfig,
        resolver: Arc<RouteResolver>,
        actions:  ActionSender,
        status:   Arc<dyn StatusDisplay>,
        rng:      SimRng,
    ) -> Self {
        let outbound = Outbound::new(AgentId::default());
        let handler = CommandHandler::new(resolver, actions, status, outbound.clone(), rng);
        Self {
            config,
            url: None,
            outbound,
            handler: Arc::new(Mutex::new(handler)),
            conn: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.outbound.state()
    }

    /// The reporter completion callbacks send through.
    pub fn outbound(&self) -> &Outbound {
        &self.outbound
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Connect to `url` as `agent_id` and start receiving.
    ///
    /// A no-op while a connection is open: the current URL and agent id are
    /// kept until [`shutdown`](Self::shutdown).
    ///
    /// # Errors
    ///
    /// [`ChannelError::InvalidUrl`] or [`ChannelError::Connect`].  The
    /// channel stays `Disconnected`; call [`retry`](Self::retry) later.
    pub fn connect(&mut self, url: &str, agent_id: AgentId) -> ChannelResult<()> {
        if self.outbound.is_open() {
            tracing::debug!(url, "already connected; connect ignored");
            return Ok(());
        }
        self.url = Some(url.to_owned());
        self.outbound.set_agent_id(agent_id);
        self.open()
    }

    /// Reconnect to the last URL if the connection is not open.  A no-op
    /// while open.
    pub fn retry(&mut self) -> ChannelResult<()> {
        if self.outbound.is_open() {
            return Ok(());
        }
        tracing::info!(url = ?self.url, "retrying connection");
        self.open()
    }

    fn open(&mut self) -> ChannelResult<()> {
        if self.outbound.is_open() {
            return Ok(());
        }
        // Reap threads of a connection that died on its own.
        self.shutdown();

        let url = self.url.clone().ok_or(ChannelError::NoUrl)?;
        let endpoint = parse_endpoint(&url)?;
        self.outbound.set_state(ConnectionState::Connecting);

        match self.start(&endpoint) {
            Ok(conn) => {
                self.conn = Some(conn);
                tracing::info!(url = %url, agent_id = %self.outbound.agent_id(), "connected");
                Ok(())
            }
            Err(source) => {
                self.outbound.detach();
                self.outbound.set_state(ConnectionState::Disconnected);
                tracing::warn!(url = %url, error = %source, "connect failed");
                Err(ChannelError::Connect { url, source })
            }
        }
    }

    fn start(&mut self, endpoint: &str) -> std::io::Result<Connection> {
        let stream = TcpStream::connect(endpoint)?;
        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!(error = %e, "failed to set TCP_NODELAY");
        }
        let read_half = stream.try_clone()?;
        let write_half = stream.try_clone()?;

        let (tx, rx) = unbounded::<String>();
        let writer_outbound = self.outbound.clone();
        let writer = thread::Builder::new()
            .name("wp-channel-writer".into())
            .spawn(move || write_loop(write_half, rx, writer_outbound))?;

        // Hello must be the first frame, so attach and send before reading.
        self.outbound.attach(tx);
        self.outbound.hello(&self.config.capabilities);

        let handler = Arc::clone(&self.handler);
        let reader_outbound = self.outbound.clone();
        let reader = match thread::Builder::new()
            .name("wp-channel-reader".into())
            .spawn(move || read_loop(read_half, handler, reader_outbound))
        {
            Ok(handle) => handle,
            Err(e) => {
                self.outbound.detach();
                let _ = stream.shutdown(Shutdown::Both);
                let _ = writer.join();
                return Err(e);
            }
        };

        Ok(Connection { stream, reader, writer })
    }

    /// Close the connection: stop sends, flush queued frames (bounded by
    /// `close_timeout`), shut the socket down, join both threads.
    ///
    /// Safe to call repeatedly and on a channel that never connected.
    pub fn shutdown(&mut self) {
        let Some(conn) = self.conn.take() else { return };
        let was_open = self.outbound.is_open();
        self.outbound.set_state(ConnectionState::Closing);
        self.outbound.detach();

        if let Err(e) = conn.stream.set_write_timeout(Some(self.config.close_timeout)) {
            tracing::debug!(error = %e, "could not set close timeout");
        }
        if conn.writer.join().is_err() {
            tracing::warn!("writer thread panicked");
        }
        // Unblocks the reader's pending read.
        let _ = conn.stream.shutdown(Shutdown::Both);
        if conn.reader.join().is_err() {
            tracing::warn!("reader thread panicked");
        }

        self.outbound.set_state(ConnectionState::Disconnected);
        if was_open {
            tracing::info!(url = ?self.url, "connection closed");
        }
    }
}

impl Drop for RemoteChannel {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── Threads ───────────────────────────────────────────────────────────────────

fn read_loop(stream: TcpStream, handler: Arc<Mutex<CommandHandler>>, outbound: Outbound) {
    let mut reader = BufReader::new(stream);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => {
                if outbound.state() != ConnectionState::Closing {
                    tracing::info!("server closed the connection");
                }
                break;
            }
            Ok(_) => {
                let line = match std::str::from_utf8(&buf) {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!(error = %e, bytes = buf.len(), "dropping frame that is not UTF-8");
                        continue;
                    }
                };
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match decode_line(trimmed) {
                    Ok(msg) => lock(&handler).handle(msg),
                    Err(e) => tracing::warn!(error = %e, frame = trimmed, "dropping malformed frame"),
                }
            }
            Err(e) => {
                if outbound.state() != ConnectionState::Closing {
                    let err = ChannelError::Stream(e);
                    tracing::warn!(error = %err, "receive loop stopped");
                }
                break;
            }
        }
    }
    outbound.connection_lost();
}

fn write_loop(mut stream: TcpStream, rx: Receiver<String>, outbound: Outbound) {
    for line in rx {
        if let Err(e) = stream.write_all(line.as_bytes()).and_then(|()| stream.flush()) {
            if outbound.state() != ConnectionState::Closing {
                tracing::warn!(error = %e, "send failed");
            }
            outbound.connection_lost();
            return;
        }
    }
}

fn lock(handler: &Mutex<CommandHandler>) -> MutexGuard<'_, CommandHandler> {
    handler.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
