//! The per-tick navigation state machine.

use std::collections::VecDeque;

use wp_core::{Cell, CommandKind, GridLayout, SimClock, WorldPoint};
use wp_dispatch::{decompose, AbortReason, ActionItem, Completion, Navigator, Outcome};
use wp_spatial::{nearest_walkable, AStarPathfinder, GridPath, Pathfinder, SpatialError, Walkability};

use crate::{Body, MobilityError, MobilityResult, MotionState, NavHooks, NavParams, NoopHooks, PathPlan};

// ── Internal timers ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum TeleportPhase {
    /// Frozen in place; relocate at `relocate_at`.
    Pre { relocate_at: f64, post_wait: f32 },
    /// Already at the destination; resume at `until`.
    Post { until: f64 },
}

#[derive(Clone, Copy, Debug)]
struct Teleport {
    destination: WorldPoint,
    phase:       TeleportPhase,
}

/// Time without displacement, for the two stuck thresholds.
#[derive(Clone, Copy, Debug, Default)]
struct StuckTracker {
    last_pos: WorldPoint,
    soft:     f32,
    hard:     f32,
}

impl StuckTracker {
    fn reset(&mut self, pos: WorldPoint) {
        *self = StuckTracker { last_pos: pos, soft: 0.0, hard: 0.0 };
    }
}

// ── NavigationEngine ──────────────────────────────────────────────────────────

/// Owns the agent's motion state and consumes action items one at a time.
///
/// # Type parameters
///
/// | Param | Role                                    | Default           |
/// |-------|-----------------------------------------|-------------------|
/// | `W`   | walkability oracle                      |                   |
/// | `B`   | physical body                           |                   |
/// | `P`   | grid pathfinder                         | `AStarPathfinder` |
/// | `H`   | presentation hooks                      | `NoopHooks`       |
///
/// Implements [`Navigator`] so drained queue closures can add work directly.
pub struct NavigationEngine<W, B, P = AStarPathfinder, H = NoopHooks>
where
    W: Walkability,
    B: Body,
    P: Pathfinder,
    H: NavHooks,
{
    layout:      GridLayout,
    walkability: W,
    body:        B,
    pathfinder:  P,
    hooks:       H,
    params:      NavParams,

    clock:    SimClock,
    state:    MotionState,
    items:    VecDeque<ActionItem>,
    /// The item whose callback is owed; set while PathFollowing/Waiting.
    current:  Option<ActionItem>,
    plan:     Option<PathPlan>,
    wait_left: f32,
    frozen_until:   Option<f64>,
    cooldown_until: Option<f64>,
    teleport: Option<Teleport>,
    stuck:    StuckTracker,
}

impl<W: Walkability, B: Body> NavigationEngine<W, B> {
    /// Engine with default parameters, A* planning, and no hooks.
    pub fn new(layout: GridLayout, walkability: W, body: B) -> Self {
        let stuck = StuckTracker { last_pos: body.position(), ..StuckTracker::default() };
        Self {
            layout,
            walkability,
            body,
            pathfinder: AStarPathfinder::default(),
            hooks: NoopHooks,
            params: NavParams::default(),
            clock: SimClock::new(),
            state: MotionState::Idle,
            items: VecDeque::new(),
            current: None,
            plan: None,
            wait_left: 0.0,
            frozen_until: None,
            cooldown_until: None,
            teleport: None,
            stuck,
        }
    }
}

impl<W, B, P, H> NavigationEngine<W, B, P, H>
where
    W: Walkability,
    B: Body,
    P: Pathfinder,
    H: NavHooks,
{
    // ── Construction ──────────────────────────────────────────────────────

    /// Replace the parameters.
    ///
    /// # Errors
    ///
    /// [`MobilityError::InvalidParams`] if `params` fails validation.
    pub fn with_params(mut self, params: NavParams) -> MobilityResult<Self> {
        params.validate()?;
        self.params = params;
        Ok(self)
    }

    pub fn with_pathfinder<P2: Pathfinder>(self, pathfinder: P2) -> NavigationEngine<W, B, P2, H> {
        NavigationEngine {
            layout: self.layout,
            walkability: self.walkability,
            body: self.body,
            pathfinder,
            hooks: self.hooks,
            params: self.params,
            clock: self.clock,
            state: self.state,
            items: self.items,
            current: self.current,
            plan: self.plan,
            wait_left: self.wait_left,
            frozen_until: self.frozen_until,
            cooldown_until: self.cooldown_until,
            teleport: self.teleport,
            stuck: self.stuck,
        }
    }

    pub fn with_hooks<H2: NavHooks>(self, hooks: H2) -> NavigationEngine<W, B, P, H2> {
        NavigationEngine {
            layout: self.layout,
            walkability: self.walkability,
            body: self.body,
            pathfinder: self.pathfinder,
            hooks,
            params: self.params,
            clock: self.clock,
            state: self.state,
            items: self.items,
            current: self.current,
            plan: self.plan,
            wait_left: self.wait_left,
            frozen_until: self.frozen_until,
            cooldown_until: self.cooldown_until,
            teleport: self.teleport,
            stuck: self.stuck,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> MotionState {
        self.state
    }

    pub fn position(&self) -> WorldPoint {
        self.body.position()
    }

    pub fn body(&self) -> &B {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    pub fn walkability(&self) -> &W {
        &self.walkability
    }

    /// Mutable oracle access, e.g. to mark dynamic occupancy between ticks.
    pub fn walkability_mut(&mut self) -> &mut W {
        &mut self.walkability
    }

    pub fn pathfinder(&self) -> &P {
        &self.pathfinder
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    pub fn params(&self) -> &NavParams {
        &self.params
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn plan(&self) -> Option<&PathPlan> {
        self.plan.as_ref()
    }

    /// Items queued behind the current one.
    pub fn pending_items(&self) -> usize {
        self.items.len()
    }

    /// `true` while a manual-suspend cooldown is in force.
    pub fn is_cooling_down(&self) -> bool {
        self.cooldown_until.is_some()
    }

    // ── External triggers ─────────────────────────────────────────────────

    /// Manual override: drop the current path or wait, discharge its
    /// callback as [`Outcome::Interrupted`], and defer physical items for
    /// `secs` seconds.
    pub fn suspend(&mut self, secs: f32) {
        let was = self.state;
        self.cancel_motion();
        self.discharge(Outcome::Interrupted);
        if self.state.is_busy() {
            self.state = MotionState::Idle;
        }
        let until = self.clock.deadline_after(secs);
        self.cooldown_until = Some(self.cooldown_until.map_or(until, |cur| cur.max(until)));
        tracing::debug!(secs, from = %was, "navigation suspended");
    }

    /// Portal travel: freeze for `pre_wait`, jump to `destination`, freeze
    /// for `post_wait`, then resume.  Ignored while already teleporting.
    pub fn request_teleport(&mut self, destination: WorldPoint, pre_wait: f32, post_wait: f32) {
        if self.teleport.is_some() {
            tracing::debug!(%destination, "teleport ignored: already teleporting");
            return;
        }
        self.body.set_velocity(WorldPoint::ZERO);
        self.teleport = Some(Teleport {
            destination,
            phase: TeleportPhase::Pre {
                relocate_at: self.clock.deadline_after(pre_wait),
                post_wait,
            },
        });
        self.state = MotionState::Teleporting;
        tracing::debug!(%destination, pre_wait, post_wait, "teleport requested");
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the state machine by one frame of `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        self.clock.advance(dt);
        self.expire_timers();

        match self.state {
            MotionState::Frozen | MotionState::Teleporting => {
                self.body.set_velocity(WorldPoint::ZERO);
                self.body.step(dt);
                return;
            }
            MotionState::Idle => self.pop_next(),
            MotionState::PathFollowing | MotionState::Waiting => {}
        }

        match self.state {
            MotionState::PathFollowing => self.follow_path(dt),
            MotionState::Waiting => self.advance_wait(dt),
            _ => {}
        }
        self.body.step(dt);
    }

    fn expire_timers(&mut self) {
        if let Some(until) = self.cooldown_until {
            if self.clock.reached(until) {
                self.cooldown_until = None;
                tracing::debug!("suspend cooldown over");
            }
        }

        if let Some(tp) = self.teleport {
            match tp.phase {
                TeleportPhase::Pre { relocate_at, post_wait } if self.clock.reached(relocate_at) => {
                    self.cancel_motion();
                    self.discharge(Outcome::Interrupted);
                    self.body.place(tp.destination);
                    self.stuck.reset(tp.destination);
                    self.hooks.camera_cut();
                    self.teleport = Some(Teleport {
                        destination: tp.destination,
                        phase: TeleportPhase::Post { until: self.clock.deadline_after(post_wait) },
                    });
                    tracing::debug!(destination = %tp.destination, "teleported");
                }
                TeleportPhase::Post { until } if self.clock.reached(until) => {
                    self.teleport = None;
                    self.frozen_until = None;
                    self.state = MotionState::Idle;
                }
                _ => {}
            }
            return;
        }

        if self.state == MotionState::Frozen {
            if self.frozen_until.is_none_or(|until| self.clock.reached(until)) {
                self.frozen_until = None;
                self.state = MotionState::Idle;
            }
        }
    }

    // ── Idle: pop and dispatch ────────────────────────────────────────────

    fn pop_next(&mut self) {
        let Some(item) = self.items.pop_front() else { return };

        if self.cooldown_until.is_some() {
            if item.kind.is_physical() {
                // Put it back where it was; retried once the cooldown ends.
                self.items.push_front(item);
            } else {
                item.complete(Outcome::Skipped);
            }
            return;
        }

        match item.kind {
            CommandKind::GoTo => self.begin_go_to(item),
            CommandKind::Waiting => self.begin_wait(item),
            _ => {
                tracing::debug!(cmd = %item.kind, "no physical effect; completing");
                item.complete(Outcome::Skipped);
            }
        }
    }

    fn begin_go_to(&mut self, item: ActionItem) {
        let Some(target) = item.target else {
            item.complete(Outcome::Skipped);
            return;
        };
        let start = self.layout.world_to_cell(self.body.position());
        let goal = self.layout.world_to_cell(target);

        self.current = Some(item);
        match self.plan_to(start, goal) {
            Ok((goal, path)) => {
                tracing::debug!(%start, %goal, cells = path.len(), "path installed");
                self.plan = Some(PathPlan::new(path, goal));
                self.stuck.reset(self.body.position());
                self.state = MotionState::PathFollowing;
            }
            Err(MobilityError::NoWalkableGoal(cell)) => {
                tracing::debug!(%cell, "goal blocked with nothing walkable nearby");
                self.abort(AbortReason::NoWalkableGoal);
            }
            Err(e) => {
                tracing::debug!(%start, %goal, error = %e, "no path");
                self.abort(AbortReason::NoPath);
            }
        }
    }

    fn begin_wait(&mut self, item: ActionItem) {
        // A NaN or infinite duration would never count down.
        let duration = if item.cost.is_finite() { item.cost.max(0.0) } else { 0.0 };
        if duration != item.cost {
            tracing::debug!(cost = item.cost, "wait duration clamped to 0");
        }
        self.wait_left = duration;
        self.body.set_velocity(WorldPoint::ZERO);
        self.hooks.work_started(duration);
        self.current = Some(item);
        self.state = MotionState::Waiting;
    }

    // ── PathFollowing ─────────────────────────────────────────────────────

    fn follow_path(&mut self, dt: f32) {
        if !self.check_stuck(dt) {
            return;
        }

        let Some(cell) = self.plan.as_ref().and_then(PathPlan::current) else {
            self.arrive();
            return;
        };
        let center = self.layout.cell_center(cell);
        let to_center = center - self.body.position();

        if to_center.length() <= self.params.snap_distance(dt) {
            self.body.place(center);
            let finished = self.plan.as_mut().is_none_or(PathPlan::advance);
            if finished {
                self.arrive();
                return;
            }
            self.steer();
        } else {
            self.body.set_velocity(to_center.normalized() * self.params.speed);
        }
    }

    /// Point the body at the current path cell.
    fn steer(&mut self) {
        let Some(cell) = self.plan.as_ref().and_then(PathPlan::current) else {
            self.body.set_velocity(WorldPoint::ZERO);
            return;
        };
        let dir = (self.layout.cell_center(cell) - self.body.position()).normalized();
        self.body.set_velocity(dir * self.params.speed);
    }

    fn arrive(&mut self) {
        self.cancel_motion();
        self.state = MotionState::Frozen;
        self.frozen_until = Some(self.clock.deadline_after(self.params.settle_secs));
        self.discharge(Outcome::Arrived);
    }

    /// Stuck detection and recovery.  Returns `false` if the item was
    /// aborted and path following must stop this tick.
    fn check_stuck(&mut self, dt: f32) -> bool {
        let pos = self.body.position();
        let moved = (pos - self.stuck.last_pos).length_squared();
        self.stuck.last_pos = pos;

        if moved >= self.params.still_threshold_sq {
            self.stuck.soft = 0.0;
            self.stuck.hard = 0.0;
            return true;
        }

        self.stuck.soft += dt;
        self.stuck.hard += dt;

        if self.stuck.soft > self.params.soft_stuck_secs {
            self.stuck.soft = 0.0;
            tracing::debug!(%pos, "not moving; replanning");
            self.replan();
        }

        if self.stuck.hard > self.params.hard_stuck_secs {
            self.stuck.hard = 0.0;
            let here = self.layout.world_to_cell(pos);
            match nearest_walkable(&self.walkability, here, self.params.hard_stuck_radius) {
                Some(cell) => {
                    let snap = self.layout.cell_center(cell);
                    tracing::warn!(from = %here, to = %cell, "hard stuck; relocating");
                    self.body.place(snap);
                    self.stuck.last_pos = snap;
                    self.replan();
                }
                None => {
                    tracing::warn!(cell = %here, "hard stuck with nowhere to go; aborting");
                    self.abort(AbortReason::Stuck);
                    return false;
                }
            }
        }
        true
    }

    /// Recompute the plan from the current cell to the same goal.  Keeps the
    /// old plan if the new search fails.
    fn replan(&mut self) {
        let Some(goal) = self.plan.as_ref().map(PathPlan::goal) else { return };
        let start = self.layout.world_to_cell(self.body.position());
        match self.plan_to(start, goal) {
            Ok((goal, path)) => {
                self.plan = Some(PathPlan::new(path, goal));
                self.steer();
            }
            Err(e) => tracing::debug!(%start, %goal, error = %e, "replan failed; keeping old path"),
        }
    }

    /// Adjust a blocked goal to the nearest walkable cell, then plan.
    fn plan_to(&self, start: Cell, goal: Cell) -> MobilityResult<(Cell, GridPath)> {
        let goal = if self.walkability.is_walkable(goal) {
            goal
        } else {
            nearest_walkable(&self.walkability, goal, self.params.goal_search_radius)
                .ok_or(MobilityError::NoWalkableGoal(goal))?
        };
        let path = self.pathfinder.find_path(&self.walkability, start, goal)?;
        if path.is_empty() {
            return Err(SpatialError::Unreachable { start, goal }.into());
        }
        Ok((goal, path))
    }

    // ── Waiting ───────────────────────────────────────────────────────────

    fn advance_wait(&mut self, dt: f32) {
        self.wait_left -= dt;
        if self.wait_left <= 0.0 {
            self.wait_left = 0.0;
            self.hooks.work_stopped();
            self.state = MotionState::Idle;
            self.discharge(Outcome::Waited);
        }
    }

    // ── Shared exits ──────────────────────────────────────────────────────

    /// Clear path, wait, and velocity.  Stops the work indicator if a wait
    /// was running.
    fn cancel_motion(&mut self) {
        if matches!(self.current, Some(ref item) if item.kind == CommandKind::Waiting) {
            self.hooks.work_stopped();
        }
        self.plan = None;
        self.wait_left = 0.0;
        self.stuck.reset(self.body.position());
        self.body.set_velocity(WorldPoint::ZERO);
    }

    fn abort(&mut self, reason: AbortReason) {
        self.cancel_motion();
        self.state = MotionState::Idle;
        self.discharge(Outcome::Aborted(reason));
    }

    /// Fire and forget the current item's callback, if any.
    fn discharge(&mut self, outcome: Outcome) {
        if let Some(item) = self.current.take() {
            tracing::debug!(cmd = %item.kind, %outcome, "action item done");
            item.complete(outcome);
        }
    }
}

impl<W, B, P, H> Navigator for NavigationEngine<W, B, P, H>
where
    W: Walkability,
    B: Body,
    P: Pathfinder,
    H: NavHooks,
{
    fn add_command(
        &mut self,
        kind:    CommandKind,
        cost:    f32,
        targets: Vec<WorldPoint>,
        on_done: Option<Completion>,
    ) {
        let items = decompose(kind, cost, targets, on_done);
        tracing::debug!(items = items.len(), queued = self.items.len(), "command added");
        self.items.extend(items);
    }
}
