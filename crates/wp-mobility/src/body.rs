//! The physical-movement collaborator.

use wp_core::WorldPoint;

/// Whatever actually moves the agent.
///
/// The engine only decides direction and speed; translation (and collision)
/// belongs to the implementor.
pub trait Body {
    fn position(&self) -> WorldPoint;

    /// Desired velocity in world units per second.
    fn set_velocity(&mut self, velocity: WorldPoint);

    /// Move instantly to `point` and stop.
    fn place(&mut self, point: WorldPoint);

    /// Integrate one tick.  Engines that share a physics step elsewhere can
    /// leave this as a no-op.
    fn step(&mut self, _dt: f32) {}
}

/// Collision-free point mass.  Used by the headless runner and in tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KinematicBody {
    pub position: WorldPoint,
    pub velocity: WorldPoint,
}

impl KinematicBody {
    pub fn at(position: WorldPoint) -> Self {
        Self { position, velocity: WorldPoint::ZERO }
    }
}

impl Body for KinematicBody {
    fn position(&self) -> WorldPoint {
        self.position
    }

    fn set_velocity(&mut self, velocity: WorldPoint) {
        self.velocity = velocity;
    }

    fn place(&mut self, point: WorldPoint) {
        self.position = point;
        self.velocity = WorldPoint::ZERO;
    }

    fn step(&mut self, dt: f32) {
        self.position = self.position + self.velocity * dt;
    }
}
