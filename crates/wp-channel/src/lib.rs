//! `wp-channel`: the remote command channel.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                     |
//! |----------------|--------------------------------------------------------------|
//! | [`protocol`]   | `InboundMessage`, `CommandFrame`, `OutboundMessage`, codecs   |
//! | [`outbound`]   | `Outbound` - shared, state-checked sender; `ConnectionState` |
//! | [`handler`]    | `CommandHandler` - per-message dispatch                      |
//! | [`status`]     | `StatusDisplay` collaborator, `LogStatus`                    |
//! | [`channel`]    | `RemoteChannel` - connect, receive loop, retry, shutdown     |
//! | [`error`]      | `ChannelError`, `ChannelResult<T>`                           |
//!
//! # Threads
//!
//! ```text
//!           ┌──────────── reader thread ────────────┐
//! socket ──►│ read_line → decode → CommandHandler    │──► ActionSender (queue)
//!           └────────────────────┬───────────────────┘
//!                                │ ack / pong / complete
//!                                ▼
//!           ┌──────────── writer thread ────────────┐
//! socket ◄──│ recv line → write_all                  │◄── Outbound (any thread)
//!           └────────────────────────────────────────┘
//! ```
//!
//! Completion callbacks run on the tick thread and report through the same
//! `Outbound`, which is shared across reconnects.  A send while the
//! connection is not `Open` is dropped.
//!
//! # Wire format
//!
//! One JSON object per line, `type` field as the discriminator.  Endpoints
//! are `tcp://host:port` or bare `host:port`.

pub mod channel;
pub mod error;
pub mod handler;
pub mod outbound;
pub mod protocol;
pub mod status;

#[cfg(test)]
mod tests;

pub use channel::{parse_endpoint, ChannelConfig, RemoteChannel};
pub use error::{ChannelError, ChannelResult};
pub use handler::{CommandHandler, TARGET_NOT_FOUND};
pub use outbound::{ConnectionState, Outbound};
pub use protocol::{CommandFrame, InboundMessage, OutboundMessage, Status};
pub use status::{LogStatus, StatusDisplay};
