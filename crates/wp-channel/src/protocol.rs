//! Wire messages and their line codec.

use serde::{Deserialize, Deserializer, Serialize};

use crate::ChannelResult;

// ── Inbound ───────────────────────────────────────────────────────────────────

/// Server → agent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Handshake reply.  Informational only.
    HelloAck {
        #[serde(default)]
        server_time: Option<serde_json::Value>,
    },
    /// Keepalive; answered with `pong`.
    Ping,
    Command(CommandFrame),
    /// Any `type` this build does not know.
    #[serde(other)]
    Unknown,
}

/// Body of a `command` frame.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CommandFrame {
    pub cmd: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub action_id: Option<String>,
    #[serde(default)]
    pub cur_location: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
    /// Duration, delta, or unused.  Servers send numbers or numeric strings.
    #[serde(default, deserialize_with = "lenient_number")]
    pub value: f32,
}

/// Accept `3`, `3.5`, `"3.5"`, `null`, or garbage (→ 0).  Non-finite
/// values (`"NaN"`, `"inf"`, or a number overflowing `f32`) also become 0.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let value = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64().map(|v| v as f32),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f32>().ok(),
        _ => None,
    };
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

/// Decode one line (without its terminator).
pub fn decode_line(line: &str) -> ChannelResult<InboundMessage> {
    Ok(serde_json::from_str(line)?)
}

// ── Outbound ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Error,
}

/// Agent → server.  Built per send from borrowed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage<'a> {
    Hello {
        agent_id: &'a str,
        cap:      &'a [String],
    },
    Pong,
    Ack {
        agent_id:  &'a str,
        action_id: &'a str,
    },
    Complete {
        cmd:       &'a str,
        agent_id:  &'a str,
        action_id: &'a str,
        status:    Status,
        #[serde(skip_serializing_if = "Option::is_none")]
        error:     Option<&'a str>,
    },
}

impl OutboundMessage<'_> {
    /// Wire label, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundMessage::Hello { .. } => "hello",
            OutboundMessage::Pong => "pong",
            OutboundMessage::Ack { .. } => "ack",
            OutboundMessage::Complete { .. } => "complete",
        }
    }
}

/// Encode as one line including the trailing `\n`.
pub fn encode_line(msg: &OutboundMessage<'_>) -> ChannelResult<String> {
    let mut line = serde_json::to_string(msg)?;
    line.push('\n');
    Ok(line)
}
