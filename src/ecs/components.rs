use bracket_geometry::prelude::{Point, Rect};
use serde::{Deserialize, Serialize};
use specs::prelude::{Component, NullStorage, VecStorage};

/// Health, attack and defense. Values never drop below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub health: i32,
    pub attack: i32,
    pub defense: i32,
}

impl Stats {
    pub const fn new(health: i32, attack: i32, defense: i32) -> Self {
        Self {
            health,
            attack,
            defense,
        }
    }

    pub fn with_health(self, health: i32) -> Self {
        Self {
            health: health.max(0),
            ..self
        }
    }

    pub fn wounded(self, damage: i32) -> Self {
        self.with_health(self.health - damage.max(0))
    }

    pub fn is_down(&self) -> bool {
        self.health <= 0
    }
}

impl Component for Stats {
    type Storage = VecStorage<Self>;
}

/// Pixel-space bounding box of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub bounds: Rect,
}

impl Position {
    pub fn at(origin: Point, size: i32) -> Self {
        Self {
            bounds: Rect::with_size(origin.x, origin.y, size, size),
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.bounds.x1, self.bounds.y1)
    }

    pub fn shifted(&self, delta: Point) -> Rect {
        Rect::with_exact(
            self.bounds.x1 + delta.x,
            self.bounds.y1 + delta.y,
            self.bounds.x2 + delta.x,
            self.bounds.y2 + delta.y,
        )
    }
}

impl Component for Position {
    type Storage = VecStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: u32,
    pub name: String,
    pub is_boss: bool,
}

impl Component for Enemy {
    type Storage = VecStorage<Self>;
}

#[derive(Default)]
pub struct PlayerTag;

impl Component for PlayerTag {
    type Storage = NullStorage<Self>;
}

#[derive(Clone, Debug)]
pub struct IntentStep {
    pub delta: Point,
}

impl Default for IntentStep {
    fn default() -> Self {
        Self {
            delta: Point::new(0, 0),
        }
    }
}

impl Component for IntentStep {
    type Storage = VecStorage<Self>;
}
