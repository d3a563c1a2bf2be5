//! Unit tests for wp-dispatch.

use std::sync::{Arc, Mutex};

use wp_core::{CommandKind, WorldPoint};

use crate::{Completion, Navigator, Outcome};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Navigator that records every `add_command` call's cost.
#[derive(Default)]
struct Recorder {
    costs: Vec<f32>,
    kinds: Vec<CommandKind>,
}

impl Navigator for Recorder {
    fn add_command(
        &mut self,
        kind:     CommandKind,
        cost:     f32,
        _targets: Vec<WorldPoint>,
        on_done:  Option<Completion>,
    ) {
        self.costs.push(cost);
        self.kinds.push(kind);
        if let Some(done) = on_done {
            done.fire(Outcome::Skipped);
        }
    }
}

/// Completion that appends its outcome to `log`.
fn logging_completion(log: &Arc<Mutex<Vec<Outcome>>>) -> Completion {
    let log = Arc::clone(log);
    Completion::new(move |outcome| log.lock().unwrap().push(outcome))
}

// ── Queue ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod queue {
    use wp_core::CommandKind;

    use super::Recorder;
    use crate::{action_queue, Navigator};

    fn enqueue_numbered(sender: &crate::ActionSender, n: usize) {
        for i in 0..n {
            sender.enqueue(move |nav: &mut dyn Navigator| {
                nav.add_command(CommandKind::Waiting, i as f32, vec![], None);
            });
        }
    }

    #[test]
    fn drain_is_bounded_and_fifo() {
        let (tx, rx) = action_queue();
        enqueue_numbered(&tx, 50);

        let mut nav = Recorder::default();
        assert_eq!(rx.drain_up_to(16, &mut nav), 16);
        assert_eq!(nav.costs, (0..16).map(|i| i as f32).collect::<Vec<_>>());
        assert_eq!(rx.len(), 34);

        let mut rest = Recorder::default();
        assert_eq!(rx.drain_up_to(usize::MAX, &mut rest), 34);
        assert_eq!(rest.costs, (16..50).map(|i| i as f32).collect::<Vec<_>>());
        assert!(rx.is_empty());
    }

    #[test]
    fn drain_on_empty_queue_runs_nothing() {
        let (_tx, rx) = action_queue();
        let mut nav = Recorder::default();
        assert_eq!(rx.drain_up_to(16, &mut nav), 0);
        assert!(nav.costs.is_empty());
    }

    #[test]
    fn cross_thread_producer_keeps_order() {
        let (tx, rx) = action_queue();
        let producer = std::thread::spawn(move || enqueue_numbered(&tx, 100));
        producer.join().unwrap();

        let mut nav = Recorder::default();
        let mut total = 0;
        while total < 100 {
            total += rx.drain_up_to(16, &mut nav);
        }
        assert_eq!(nav.costs, (0..100).map(|i| i as f32).collect::<Vec<_>>());
    }

    #[test]
    fn enqueue_after_receiver_dropped_does_not_panic() {
        let (tx, rx) = action_queue();
        drop(rx);
        enqueue_numbered(&tx, 3);
    }
}

// ── Decomposition ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod decompose {
    use std::sync::{Arc, Mutex};

    use wp_core::{CommandKind, WorldPoint};

    use super::logging_completion;
    use crate::{decompose, Outcome};

    #[test]
    fn only_last_item_carries_callback() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let points = vec![WorldPoint::new(0.0, 0.0), WorldPoint::new(1.0, 0.0), WorldPoint::new(2.0, 0.0)];
        let items = decompose(CommandKind::GoTo, 0.0, points.clone(), Some(logging_completion(&log)));

        assert_eq!(items.len(), 3);
        assert_eq!(items.iter().map(|i| i.target.unwrap()).collect::<Vec<_>>(), points);
        assert!(items[0].on_done.is_none());
        assert!(items[1].on_done.is_none());
        assert!(items[2].on_done.is_some());

        for item in items {
            item.complete(Outcome::Arrived);
        }
        assert_eq!(*log.lock().unwrap(), vec![Outcome::Arrived]);
    }

    #[test]
    fn no_targets_yields_one_pointless_item() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let items = decompose(CommandKind::Waiting, 3.0, vec![], Some(logging_completion(&log)));
        assert_eq!(items.len(), 1);
        assert!(items[0].target.is_none());
        assert_eq!(items[0].cost, 3.0);
        assert!(items[0].on_done.is_some());
    }
}

// ── Completion ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod completion {
    use std::sync::{Arc, Mutex};

    use super::logging_completion;
    use crate::{AbortReason, Outcome};

    #[test]
    fn fire_delivers_outcome() {
        let log = Arc::new(Mutex::new(Vec::new()));
        logging_completion(&log).fire(Outcome::Aborted(AbortReason::NoPath));
        assert_eq!(*log.lock().unwrap(), vec![Outcome::Aborted(AbortReason::NoPath)]);
    }

    #[test]
    fn dropping_unfired_completion_is_silent() {
        let log = Arc::new(Mutex::new(Vec::new()));
        drop(logging_completion(&log));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::Arrived.to_string(), "arrived");
        assert_eq!(Outcome::Aborted(AbortReason::Stuck).to_string(), "aborted (stuck)");
        assert!(Outcome::Aborted(AbortReason::NoWalkableGoal).is_aborted());
        assert!(!Outcome::Interrupted.is_aborted());
    }
}
