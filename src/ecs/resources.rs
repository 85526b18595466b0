use bracket_geometry::prelude::{Point, Rect};
use specs::prelude::Entity;

use crate::spatial;

/// Solid geometry the movement system validates intents against.
#[derive(Clone, Debug, Default)]
pub struct MovementContext {
    pub obstacles: Vec<Rect>,
}

impl MovementContext {
    pub fn new(obstacles: Vec<Rect>) -> Self {
        Self { obstacles }
    }

    pub fn is_blocked(&self, bounds: &Rect) -> bool {
        spatial::blocked(bounds, &self.obstacles)
    }
}

/// What happened to the last player intent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum MoveReport {
    #[default]
    Idle,
    Moved(Point),
    Blocked,
    Encounter(Entity),
}
