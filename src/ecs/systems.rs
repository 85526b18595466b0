use bracket_geometry::prelude::{Point, Rect};
use specs::prelude::*;

use super::{
    components::{Enemy, IntentStep, PlayerTag, Position},
    resources::{MoveReport, MovementContext},
};
use crate::spatial;

/// Applies the player's queued step.
///
/// Walls reject the step outright. Touching an enemy also keeps the player
/// in place and reports the first enemy hit in roster order.
#[derive(Default)]
pub struct MovementSystem;

impl<'a> System<'a> for MovementSystem {
    type SystemData = (
        Entities<'a>,
        WriteStorage<'a, Position>,
        WriteStorage<'a, IntentStep>,
        ReadStorage<'a, PlayerTag>,
        ReadStorage<'a, Enemy>,
        ReadExpect<'a, MovementContext>,
        WriteExpect<'a, MoveReport>,
    );

    fn run(
        &mut self,
        (entities, mut positions, mut intents, players, enemies, movement, mut report): Self::SystemData,
    ) {
        let roster: Vec<(Entity, Rect)> = (&entities, &enemies, &positions)
            .join()
            .map(|(entity, _, pos)| (entity, pos.bounds))
            .collect();

        let mut to_clear = Vec::new();
        for (entity, pos, intent, _) in (&entities, &mut positions, &intents, &players).join() {
            to_clear.push(entity);
            let candidate = pos.shifted(intent.delta);

            if movement.is_blocked(&candidate) {
                *report = MoveReport::Blocked;
                continue;
            }

            let hit = spatial::first_overlap(
                &candidate,
                roster.iter().map(|(enemy, bounds)| (*enemy, bounds)),
            );
            if let Some(enemy) = hit {
                *report = MoveReport::Encounter(enemy);
                continue;
            }

            pos.bounds = candidate;
            *report = MoveReport::Moved(Point::new(candidate.x1, candidate.y1));
        }

        for entity in to_clear {
            intents.remove(entity);
        }
    }
}
