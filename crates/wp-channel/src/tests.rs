//! Unit tests for wp-channel.
//!
//! Handler tests capture frames straight from the writer queue; channel tests
//! run a scripted server on a loopback `TcpListener`.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossbeam_channel::{unbounded, Receiver};
use serde_json::Value;

use wp_core::{AgentId, CommandKind, SimRng, WorldPoint};
use wp_dispatch::{action_queue, ActionReceiver, ActionSender, Completion, Navigator};
use wp_locations::{LocationEntry, LocationGraph, LocationTable, RouteResolver};

use crate::{CommandHandler, Outbound, StatusDisplay};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// home → street → shop, with `street` topological.
fn resolver() -> Arc<RouteResolver> {
    let graph = LocationGraph::from_adjacency([
        ("home", vec!["street"]),
        ("street", vec!["home", "shop"]),
        ("shop", vec!["street"]),
    ])
    .unwrap();
    let table = LocationTable::from_entries([
        ("home", LocationEntry::Waypoint(vec![WorldPoint::new(1.0, 1.0)])),
        ("street", LocationEntry::Topological),
        ("shop", LocationEntry::Waypoint(vec![WorldPoint::new(9.0, 1.0)])),
    ])
    .unwrap();
    Arc::new(RouteResolver::new(graph, table).unwrap())
}

#[derive(Default)]
struct RecordingStatus {
    pops: Mutex<Vec<(String, i32)>>,
}

impl StatusDisplay for RecordingStatus {
    fn pop_status(&self, key: &str, delta: i32) {
        self.pops.lock().unwrap().push((key.to_owned(), delta));
    }
}

/// One `add_command` call as seen by the navigator.
struct Added {
    kind:    CommandKind,
    cost:    f32,
    targets: Vec<WorldPoint>,
    on_done: Option<Completion>,
}

#[derive(Default)]
struct RecordingNavigator {
    added: Vec<Added>,
}

impl Navigator for RecordingNavigator {
    fn add_command(&mut self, kind: CommandKind, cost: f32, targets: Vec<WorldPoint>, on_done: Option<Completion>) {
        self.added.push(Added { kind, cost, targets, on_done });
    }
}

/// Outbound wired to an in-memory writer queue, marked open.
fn open_outbound(agent: &str) -> (Outbound, Receiver<String>) {
    let outbound = Outbound::new(AgentId::from(agent));
    let (tx, rx) = unbounded();
    outbound.attach(tx);
    (outbound, rx)
}

fn frames(rx: &Receiver<String>) -> Vec<Value> {
    rx.try_iter().map(|line| serde_json::from_str(line.trim_end()).unwrap()).collect()
}

struct Harness {
    handler: CommandHandler,
    status:  Arc<RecordingStatus>,
    frames:  Receiver<String>,
    actions: ActionReceiver,
}

fn harness() -> Harness {
    let (outbound, frames) = open_outbound("agent-1");
    let (tx, actions): (ActionSender, ActionReceiver) = action_queue();
    let status = Arc::new(RecordingStatus::default());
    let handler = CommandHandler::new(resolver(), tx, status.clone(), outbound, SimRng::new(3));
    Harness { handler, status, frames, actions }
}

fn command(v: Value) -> crate::InboundMessage {
    crate::protocol::decode_line(&v.to_string()).unwrap()
}

// ── Protocol ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod protocol {
    use serde_json::{json, Value};

    use crate::protocol::{decode_line, encode_line};
    use crate::{ChannelError, CommandFrame, InboundMessage, OutboundMessage, Status};

    #[test]
    fn decodes_command_with_numeric_or_string_value() {
        let numeric = decode_line(r#"{"type":"command","cmd":"waiting","action_id":"a1","value":2.5}"#).unwrap();
        let InboundMessage::Command(frame) = numeric else { panic!("expected command") };
        assert_eq!(frame.cmd, "waiting");
        assert_eq!(frame.action_id.as_deref(), Some("a1"));
        assert_eq!(frame.value, 2.5);

        let text = decode_line(r#"{"type":"command","cmd":"update_state","target":"item","value":"10"}"#).unwrap();
        let InboundMessage::Command(frame) = text else { panic!("expected command") };
        assert_eq!(frame.value, 10.0);
        assert_eq!(frame.target.as_deref(), Some("item"));
    }

    #[test]
    fn missing_or_garbage_value_is_zero() {
        for raw in [
            r#"{"type":"command","cmd":"go_to"}"#,
            r#"{"type":"command","cmd":"go_to","value":null}"#,
            r#"{"type":"command","cmd":"go_to","value":"soon"}"#,
            r#"{"type":"command","cmd":"waiting","value":"NaN"}"#,
            r#"{"type":"command","cmd":"waiting","value":"inf"}"#,
            r#"{"type":"command","cmd":"waiting","value":"-infinity"}"#,
            r#"{"type":"command","cmd":"waiting","value":1e300}"#,
        ] {
            let InboundMessage::Command(CommandFrame { value, .. }) = decode_line(raw).unwrap() else {
                panic!("expected command");
            };
            assert_eq!(value, 0.0, "{raw}");
        }
    }

    #[test]
    fn protocol_frames_and_unknown_types() {
        assert_eq!(decode_line(r#"{"type":"ping"}"#).unwrap(), InboundMessage::Ping);
        assert!(matches!(
            decode_line(r#"{"type":"hello_ack","server_time":1712.5}"#).unwrap(),
            InboundMessage::HelloAck { server_time: Some(_) }
        ));
        assert_eq!(decode_line(r#"{"type":"broadcast","x":1}"#).unwrap(), InboundMessage::Unknown);
    }

    #[test]
    fn malformed_frames_are_decode_errors() {
        assert!(matches!(decode_line("not json"), Err(ChannelError::Decode(_))));
        assert!(matches!(decode_line(r#"{"cmd":"go_to"}"#), Err(ChannelError::Decode(_))));
        assert!(matches!(decode_line(r#"{"type":"command"}"#), Err(ChannelError::Decode(_))));
    }

    #[test]
    fn complete_omits_absent_error() {
        let ok = OutboundMessage::Complete {
            cmd: "go_to", agent_id: "a", action_id: "x", status: Status::Ok, error: None,
        };
        let line = encode_line(&ok).unwrap();
        assert!(line.ends_with('\n'));
        let v: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(v, json!({"type":"complete","cmd":"go_to","agent_id":"a","action_id":"x","status":"ok"}));

        let err = OutboundMessage::Complete {
            cmd: "go_to", agent_id: "a", action_id: "x", status: Status::Error, error: Some("target not found"),
        };
        let v: Value = serde_json::from_str(encode_line(&err).unwrap().trim_end()).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["error"], "target not found");
    }

    #[test]
    fn hello_and_pong_shapes() {
        let caps = vec!["waiting".to_owned()];
        let v: Value = serde_json::from_str(
            encode_line(&OutboundMessage::Hello { agent_id: "agent-1", cap: &caps }).unwrap().trim_end(),
        )
        .unwrap();
        assert_eq!(v, json!({"type":"hello","agent_id":"agent-1","cap":["waiting"]}));

        let v: Value = serde_json::from_str(encode_line(&OutboundMessage::Pong).unwrap().trim_end()).unwrap();
        assert_eq!(v, json!({"type":"pong"}));
    }
}

// ── Endpoint parsing ──────────────────────────────────────────────────────────

#[cfg(test)]
mod endpoint {
    use crate::{parse_endpoint, ChannelError};

    #[test]
    fn accepts_tcp_scheme_and_bare_host_port() {
        assert_eq!(parse_endpoint("tcp://127.0.0.1:9876").unwrap(), "127.0.0.1:9876");
        assert_eq!(parse_endpoint("localhost:9876").unwrap(), "localhost:9876");
        assert_eq!(parse_endpoint("tcp://example.org:80/").unwrap(), "example.org:80");
    }

    #[test]
    fn rejects_bad_urls() {
        for url in ["ws://127.0.0.1:9876", "127.0.0.1", ":9876", "host:http", "host:70000"] {
            assert!(matches!(parse_endpoint(url), Err(ChannelError::InvalidUrl { .. })), "{url}");
        }
    }
}

// ── Outbound ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod outbound {
    use wp_core::{ActionId, AgentId, CommandKind};

    use super::{frames, open_outbound};
    use crate::{ConnectionState, Outbound};

    #[test]
    fn sends_are_dropped_unless_open() {
        let outbound = Outbound::new(AgentId::from("a"));
        assert_eq!(outbound.state(), ConnectionState::Disconnected);
        assert!(!outbound.pong());
        assert!(!outbound.complete(&CommandKind::Waiting, &ActionId::from("x"), None));
    }

    #[test]
    fn lost_connection_stops_sending() {
        let (outbound, rx) = open_outbound("a");
        assert!(outbound.ack(&ActionId::from("x")));
        outbound.connection_lost();
        assert_eq!(outbound.state(), ConnectionState::Disconnected);
        assert!(!outbound.ack(&ActionId::from("y")));
        let sent = frames(&rx);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["action_id"], "x");
    }

    #[test]
    fn closing_state_survives_connection_lost() {
        let (outbound, _rx) = open_outbound("a");
        outbound.set_state(ConnectionState::Closing);
        outbound.connection_lost();
        assert_eq!(outbound.state(), ConnectionState::Closing);
    }
}

// ── CommandHandler ────────────────────────────────────────────────────────────

#[cfg(test)]
mod handler {
    use serde_json::json;

    use wp_core::{CommandKind, WorldPoint};
    use wp_dispatch::Outcome;

    use super::{command, frames, harness, RecordingNavigator};
    use crate::TARGET_NOT_FOUND;

    #[test]
    fn ping_gets_pong() {
        let mut h = harness();
        h.handler.handle(command(json!({"type":"ping"})));
        assert_eq!(frames(&h.frames), vec![json!({"type":"pong"})]);
        assert!(h.actions.is_empty());
    }

    #[test]
    fn go_to_acks_then_completes_on_arrival() {
        let mut h = harness();
        h.handler.handle(command(json!({
            "type":"command","cmd":"go_to","agent_id":"agent-1","action_id":"g1",
            "cur_location":"home","target":"shop","value":"0"
        })));

        // Ack goes out before anything is queued for the tick.
        assert_eq!(frames(&h.frames), vec![json!({"type":"ack","agent_id":"agent-1","action_id":"g1"})]);
        assert_eq!(h.actions.len(), 1);

        let mut nav = RecordingNavigator::default();
        assert_eq!(h.actions.drain_up_to(16, &mut nav), 1);
        let added = nav.added.pop().unwrap();
        assert_eq!(added.kind, CommandKind::GoTo);
        // The topological street is skipped.
        assert_eq!(added.targets, vec![WorldPoint::new(1.0, 1.0), WorldPoint::new(9.0, 1.0)]);
        assert!(frames(&h.frames).is_empty(), "no complete before arrival");

        added.on_done.unwrap().fire(Outcome::Arrived);
        assert_eq!(
            frames(&h.frames),
            vec![json!({"type":"complete","cmd":"go_to","agent_id":"agent-1","action_id":"g1","status":"ok"})]
        );
    }

    #[test]
    fn unresolvable_go_to_reports_error_once() {
        let mut h = harness();
        h.handler.handle(command(json!({
            "type":"command","cmd":"go_to","action_id":"g2","cur_location":"home","target":"moon"
        })));
        assert_eq!(frames(&h.frames).len(), 1, "ack only");

        let mut nav = RecordingNavigator::default();
        h.actions.drain_up_to(16, &mut nav);
        assert!(nav.added.is_empty());
        assert_eq!(
            frames(&h.frames),
            vec![json!({
                "type":"complete","cmd":"go_to","agent_id":"agent-1","action_id":"g2",
                "status":"error","error":TARGET_NOT_FOUND
            })]
        );
    }

    #[test]
    fn aborted_navigation_still_reports_ok() {
        let mut h = harness();
        h.handler.handle(command(json!({
            "type":"command","cmd":"go_to","action_id":"g3","cur_location":"shop","target":"home"
        })));
        let mut nav = RecordingNavigator::default();
        h.actions.drain_up_to(16, &mut nav);
        frames(&h.frames);

        let done = nav.added.pop().unwrap().on_done.unwrap();
        done.fire(Outcome::Aborted(wp_dispatch::AbortReason::NoPath));
        let sent = frames(&h.frames);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["status"], "ok");
    }

    #[test]
    fn waiting_is_queued_without_ack() {
        let mut h = harness();
        h.handler.handle(command(json!({"type":"command","cmd":"waiting","action_id":"w1","value":3})));
        assert!(frames(&h.frames).is_empty());

        let mut nav = RecordingNavigator::default();
        h.actions.drain_up_to(16, &mut nav);
        let added = nav.added.pop().unwrap();
        assert_eq!(added.kind, CommandKind::Waiting);
        assert_eq!(added.cost, 3.0);
        assert!(added.targets.is_empty());

        added.on_done.unwrap().fire(Outcome::Waited);
        let sent = frames(&h.frames);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["cmd"], "waiting");
        assert_eq!(sent[0]["action_id"], "w1");
    }

    #[test]
    fn update_state_pops_status_directly() {
        let mut h = harness();
        h.handler.handle(command(json!({"type":"command","cmd":"update_state","target":"item","value":"10"})));
        h.handler.handle(command(json!({
            "type":"command","cmd":"update_state","action_id":"u1","target":"gold","value":-3
        })));

        assert_eq!(*h.status.pops.lock().unwrap(), vec![("item".to_owned(), 10), ("gold".to_owned(), -3)]);
        assert!(h.actions.is_empty(), "status updates are never queued");
        let sent = frames(&h.frames);
        assert_eq!(sent.len(), 1, "complete only for the frame with an action id");
        assert_eq!(sent[0]["action_id"], "u1");
        assert_eq!(sent[0]["status"], "ok");
    }

    #[test]
    fn unknown_command_completes_ok_immediately() {
        let mut h = harness();
        h.handler.handle(command(json!({"type":"command","cmd":"fishing","action_id":"f1"})));
        assert_eq!(
            frames(&h.frames),
            vec![json!({"type":"complete","cmd":"fishing","agent_id":"agent-1","action_id":"f1","status":"ok"})]
        );
        assert!(h.actions.is_empty());
    }

    #[test]
    fn exactly_one_complete_per_action_id() {
        let mut h = harness();
        let script = [
            json!({"type":"command","cmd":"go_to","action_id":"1","cur_location":"home","target":"shop"}),
            json!({"type":"command","cmd":"go_to","action_id":"2","cur_location":"home","target":"nowhere"}),
            json!({"type":"command","cmd":"waiting","action_id":"3","value":1}),
            json!({"type":"command","cmd":"update_state","action_id":"4","target":"x","value":1}),
            json!({"type":"command","cmd":"dance","action_id":"5"}),
            json!({"type":"ping"}),
        ];
        for frame in script {
            h.handler.handle(command(frame));
        }
        let mut nav = RecordingNavigator::default();
        h.actions.drain_up_to(16, &mut nav);
        for added in nav.added.drain(..) {
            if let Some(done) = added.on_done {
                done.fire(Outcome::Arrived);
            }
        }

        let mut completed: Vec<String> = frames(&h.frames)
            .into_iter()
            .filter(|f| f["type"] == "complete")
            .map(|f| f["action_id"].as_str().unwrap().to_owned())
            .collect();
        completed.sort();
        assert_eq!(completed, vec!["1", "2", "3", "4", "5"]);
    }
}

// ── RemoteChannel over loopback TCP ───────────────────────────────────────────

/// Scripted peer on the server side of one connection.
struct ServerConn {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl ServerConn {
    fn accept(listener: &TcpListener) -> ServerConn {
        let (stream, _) = listener.accept().unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        ServerConn { reader: BufReader::new(stream.try_clone().unwrap()), writer: stream }
    }

    fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.reader.read_line(&mut line).unwrap();
        serde_json::from_str(line.trim_end()).unwrap()
    }

    fn send(&mut self, v: Value) {
        writeln!(self.writer, "{v}").unwrap();
        self.writer.flush().unwrap();
    }
}

fn listener() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("tcp://{}", listener.local_addr().unwrap());
    (listener, url)
}

fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

fn channel() -> (crate::RemoteChannel, ActionReceiver) {
    let (tx, rx) = action_queue();
    let channel = crate::RemoteChannel::new(
        crate::ChannelConfig::default(),
        resolver(),
        tx,
        Arc::new(crate::LogStatus),
        SimRng::new(11),
    );
    (channel, rx)
}

#[cfg(test)]
mod remote {
    use std::io::{BufRead, Write};

    use serde_json::json;

    use wp_core::AgentId;
    use wp_dispatch::Outcome;

    use super::{channel, listener, wait_until, RecordingNavigator, ServerConn};
    use crate::{ChannelError, ConnectionState};

    #[test]
    fn hello_ping_and_go_to_round_trip() {
        let (listener, url) = listener();
        let (mut ch, actions) = channel();
        ch.connect(&url, AgentId::from("agent-7")).unwrap();
        assert_eq!(ch.state(), ConnectionState::Open);

        let mut server = ServerConn::accept(&listener);
        assert_eq!(server.recv(), json!({"type":"hello","agent_id":"agent-7","cap":["waiting"]}));

        server.send(json!({"type":"hello_ack","server_time":1.0}));
        server.send(json!({"type":"ping"}));
        assert_eq!(server.recv(), json!({"type":"pong"}));

        server.send(json!({
            "type":"command","cmd":"go_to","agent_id":"agent-7","action_id":"m1",
            "cur_location":"home","target":"shop","value":0
        }));
        assert_eq!(server.recv(), json!({"type":"ack","agent_id":"agent-7","action_id":"m1"}));

        assert!(wait_until(|| !actions.is_empty()));
        let mut nav = RecordingNavigator::default();
        actions.drain_up_to(16, &mut nav);
        nav.added.pop().unwrap().on_done.unwrap().fire(Outcome::Arrived);

        assert_eq!(
            server.recv(),
            json!({"type":"complete","cmd":"go_to","agent_id":"agent-7","action_id":"m1","status":"ok"})
        );
        ch.shutdown();
    }

    #[test]
    fn malformed_frame_does_not_stop_the_loop() {
        let (listener, url) = listener();
        let (mut ch, _actions) = channel();
        ch.connect(&url, AgentId::from("a")).unwrap();
        let mut server = ServerConn::accept(&listener);
        server.recv();

        server.send(json!("just a string"));
        server.send(json!({"type":"ping"}));
        assert_eq!(server.recv(), json!({"type":"pong"}));
    }

    #[test]
    fn non_utf8_frame_is_skipped() {
        let (listener, url) = listener();
        let (mut ch, _actions) = channel();
        ch.connect(&url, AgentId::from("a")).unwrap();
        let mut server = ServerConn::accept(&listener);
        server.recv();

        server.writer.write_all(b"{\"type\":\"ping\",\"x\":\"\xff\"}\n").unwrap();
        server.writer.flush().unwrap();
        server.send(json!({"type":"ping"}));
        assert_eq!(server.recv(), json!({"type":"pong"}));
        assert_eq!(ch.state(), ConnectionState::Open);
    }

    #[test]
    fn connect_while_open_keeps_the_current_session() {
        let (first, url) = listener();
        let (other, other_url) = listener();
        let (mut ch, _actions) = channel();
        ch.connect(&url, AgentId::from("agent-a")).unwrap();
        let mut server = ServerConn::accept(&first);
        server.recv();

        ch.connect(&other_url, AgentId::from("agent-b")).unwrap();
        assert_eq!(ch.url(), Some(url.as_str()));
        other.set_nonblocking(true).unwrap();
        assert!(other.accept().is_err(), "no connection to the second server");

        server.send(json!({"type":"command","cmd":"fishing","action_id":"f1"}));
        let complete = server.recv();
        assert_eq!(complete["type"], "complete");
        assert_eq!(complete["agent_id"], "agent-a");
    }

    #[test]
    fn connect_failure_is_reported_and_leaves_channel_disconnected() {
        let (listener, url) = listener();
        drop(listener);
        let (mut ch, _actions) = channel();
        let err = ch.connect(&url, AgentId::from("a")).unwrap_err();
        assert!(matches!(err, ChannelError::Connect { .. }));
        assert_eq!(ch.state(), ConnectionState::Disconnected);
        assert!(!ch.outbound().pong());
    }

    #[test]
    fn invalid_url_is_rejected_without_io() {
        let (mut ch, _actions) = channel();
        let err = ch.connect("ws://127.0.0.1:1", AgentId::from("a")).unwrap_err();
        assert!(matches!(err, ChannelError::InvalidUrl { .. }));
        assert!(matches!(ch.retry(), Err(ChannelError::InvalidUrl { .. })));
    }

    #[test]
    fn server_close_then_manual_retry_reuses_reporter() {
        let (listener, url) = listener();
        let (mut ch, actions) = channel();
        ch.connect(&url, AgentId::from("agent-r")).unwrap();
        let mut first = ServerConn::accept(&listener);
        first.recv();

        first.send(json!({"type":"command","cmd":"waiting","action_id":"w9","value":1}));
        assert!(wait_until(|| !actions.is_empty()));
        let mut nav = RecordingNavigator::default();
        actions.drain_up_to(16, &mut nav);
        let pending = nav.added.pop().unwrap().on_done.unwrap();

        drop(first);
        assert!(wait_until(|| ch.state() == ConnectionState::Disconnected));
        // Completions fired while disconnected are dropped, not buffered.
        assert!(!ch.outbound().pong());

        ch.retry().unwrap();
        let mut second = ServerConn::accept(&listener);
        assert_eq!(second.recv()["type"], "hello");

        pending.fire(Outcome::Waited);
        let complete = second.recv();
        assert_eq!(complete["type"], "complete");
        assert_eq!(complete["action_id"], "w9");
        assert_eq!(complete["agent_id"], "agent-r");
    }

    #[test]
    fn shutdown_is_idempotent_and_stops_sends() {
        let (listener, url) = listener();
        let (mut ch, _actions) = channel();
        ch.connect(&url, AgentId::from("a")).unwrap();
        let mut server = ServerConn::accept(&listener);
        server.recv();

        ch.shutdown();
        assert_eq!(ch.state(), ConnectionState::Disconnected);
        ch.shutdown();
        assert_eq!(ch.state(), ConnectionState::Disconnected);
        assert!(!ch.outbound().pong());

        // The server sees end-of-stream.
        let mut line = String::new();
        assert_eq!(server.reader.read_line(&mut line).unwrap(), 0);
    }

    #[test]
    fn retry_while_open_is_a_no_op() {
        let (listener, url) = listener();
        let (mut ch, _actions) = channel();
        ch.connect(&url, AgentId::from("a")).unwrap();
        let _server = ServerConn::accept(&listener);
        ch.retry().unwrap();
        assert_eq!(ch.state(), ConnectionState::Open);
        listener.set_nonblocking(true).unwrap();
        assert!(listener.accept().is_err(), "no second connection");
    }

    #[test]
    fn drop_closes_the_connection() {
        let (listener, url) = listener();
        let (mut ch, _actions) = channel();
        ch.connect(&url, AgentId::from("a")).unwrap();
        let mut server = ServerConn::accept(&listener);
        server.recv();
        drop(ch);
        let mut line = String::new();
        assert_eq!(server.reader.read_line(&mut line).unwrap(), 0);
    }
}
