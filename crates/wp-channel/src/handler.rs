//! Per-message dispatch.  Runs on the reader thread.

use std::sync::Arc;

use wp_core::{ActionId, CommandKind, SimRng};
use wp_dispatch::{ActionSender, Completion, Navigator};
use wp_locations::RouteResolver;

use crate::protocol::{CommandFrame, InboundMessage};
use crate::{Outbound, StatusDisplay};

/// Error text reported when a `go_to` target cannot be resolved.
pub const TARGET_NOT_FOUND: &str = "target not found";

/// Turns decoded frames into replies and queued actions.
///
/// Never blocks: replies go through [`Outbound`], physical work through the
/// [`ActionSender`].
pub struct CommandHandler {
    resolver: Arc<RouteResolver>,
    actions:  ActionSender,
    status:   Arc<dyn StatusDisplay>,
    outbound: Outbound,
    rng:      SimRng,
}

impl CommandHandler {
    pub fn new(
        resolver: Arc<RouteResolver>,
        actions:  ActionSender,
        status:   Arc<dyn StatusDisplay>,
        outbound: Outbound,
        rng:      SimRng,
    ) -> Self {
        Self { resolver, actions, status, outbound, rng }
    }

    pub fn handle(&mut self, msg: InboundMessage) {
        match msg {
            InboundMessage::HelloAck { server_time } => {
                tracing::debug!(?server_time, "hello acknowledged");
            }
            InboundMessage::Ping => {
                self.outbound.pong();
            }
            InboundMessage::Command(frame) => self.handle_command(frame),
            InboundMessage::Unknown => tracing::debug!("ignoring frame of unknown type"),
        }
    }

    fn handle_command(&mut self, frame: CommandFrame) {
        let kind = CommandKind::parse(&frame.cmd);
        let action_id = ActionId::from(frame.action_id.clone().unwrap_or_default());
        tracing::info!(cmd = %kind, action_id = %action_id, target = ?frame.target, "command received");

        match kind {
            CommandKind::GoTo => self.go_to(action_id, &frame),
            CommandKind::Waiting => {
                let done = self.reporter(CommandKind::Waiting, action_id);
                let secs = frame.value;
                self.actions.enqueue(move |nav: &mut dyn Navigator| {
                    nav.add_command(CommandKind::Waiting, secs, Vec::new(), Some(done));
                });
            }
            CommandKind::UpdateState => {
                let key = frame.target.as_deref().unwrap_or_default();
                self.status.pop_status(key, frame.value as i32);
                if !action_id.is_empty() {
                    self.outbound.complete(&kind, &action_id, None);
                }
            }
            CommandKind::Other(_) => {
                self.outbound.complete(&kind, &action_id, None);
            }
        }
    }

    fn go_to(&mut self, action_id: ActionId, frame: &CommandFrame) {
        self.outbound.ack(&action_id);

        let origin = frame.cur_location.as_deref().unwrap_or_default();
        let target = frame.target.as_deref().unwrap_or_default();
        match self.resolver.resolve(origin, target, &mut self.rng) {
            Ok(route) => {
                tracing::debug!(action_id = %action_id, route = ?route.names, "go_to resolved");
                let done = self.reporter(CommandKind::GoTo, action_id);
                let cost = frame.value;
                let points = route.points;
                self.actions.enqueue(move |nav: &mut dyn Navigator| {
                    nav.add_command(CommandKind::GoTo, cost, points, Some(done));
                });
            }
            Err(e) => {
                tracing::info!(action_id = %action_id, origin, target, error = %e, "go_to target unresolvable");
                let outbound = self.outbound.clone();
                self.actions.enqueue(move |_: &mut dyn Navigator| {
                    outbound.complete(&CommandKind::GoTo, &action_id, Some(TARGET_NOT_FOUND));
                });
            }
        }
    }

    /// Completion that reports `complete(status=ok)` for `action_id`.
    fn reporter(&self, kind: CommandKind, action_id: ActionId) -> Completion {
        let outbound = self.outbound.clone();
        Completion::new(move |outcome| {
            tracing::debug!(cmd = %kind, action_id = %action_id, %outcome, "reporting completion");
            outbound.complete(&kind, &action_id, None);
        })
    }
}
