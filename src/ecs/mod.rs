pub mod components;
pub mod resources;
pub mod systems;

use bracket_geometry::prelude::{Point, Rect};
use log::{debug, warn};
use specs::prelude::{
    Builder, Dispatcher, DispatcherBuilder, Entity, Join, World as SpecsWorld, WorldExt,
};

use crate::data::monsters::EnemyTemplate;

use self::{
    components::{Enemy, IntentStep, PlayerTag, Position, Stats},
    resources::{MoveReport, MovementContext},
    systems::MovementSystem,
};

/// Read-only view of one enemy in roster order.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemyView {
    pub entity: Entity,
    pub id: u32,
    pub name: String,
    pub bounds: Rect,
    pub stats: Stats,
    pub is_boss: bool,
}

pub struct EcsWorld {
    specs_world: SpecsWorld,
    dispatcher: Dispatcher<'static, 'static>,
    player: Entity,
}

impl EcsWorld {
    pub fn new(start: Point, entity_size: i32, obstacles: Vec<Rect>) -> Self {
        let mut specs_world = SpecsWorld::new();
        Self::register_components(&mut specs_world);
        specs_world.insert(MovementContext::new(obstacles));
        specs_world.insert(MoveReport::default());
        let player = specs_world
            .create_entity()
            .with(Position::at(start, entity_size))
            .with(PlayerTag)
            .build();
        let dispatcher = DispatcherBuilder::new()
            .with(MovementSystem, "movement", &[])
            .build();

        Self {
            specs_world,
            dispatcher,
            player,
        }
    }

    fn register_components(world: &mut SpecsWorld) {
        world.register::<Position>();
        world.register::<Stats>();
        world.register::<Enemy>();
        world.register::<PlayerTag>();
        world.register::<IntentStep>();
    }

    pub fn spawn_enemy(&mut self, id: u32, template: &EnemyTemplate, origin: Point, size: i32) {
        self.specs_world
            .create_entity()
            .with(Position::at(origin, size))
            .with(template.stats)
            .with(Enemy {
                id,
                name: template.name.to_string(),
                is_boss: template.is_boss,
            })
            .build();
        debug!(
            "spawned {} #{id} at {},{}",
            template.name, origin.x, origin.y
        );
    }

    /// Runs one movement intent through the dispatcher and reports the result.
    pub fn step_player(&mut self, delta: Point) -> MoveReport {
        {
            let mut intents = self.specs_world.write_component::<IntentStep>();
            if let Err(err) = intents.insert(self.player, IntentStep { delta }) {
                warn!("dropped player step {delta:?}: {err}");
            }
        }
        *self.specs_world.write_resource::<MoveReport>() = MoveReport::Idle;
        self.dispatcher.dispatch(&self.specs_world);
        self.specs_world.maintain();
        *self.specs_world.read_resource::<MoveReport>()
    }

    pub fn player_bounds(&self) -> Rect {
        let positions = self.specs_world.read_component::<Position>();
        positions
            .get(self.player)
            .map(|pos| pos.bounds)
            .unwrap_or_else(|| Rect::with_size(0, 0, 0, 0))
    }

    pub fn enemies(&self) -> Vec<EnemyView> {
        let entities = self.specs_world.entities();
        let positions = self.specs_world.read_component::<Position>();
        let stats = self.specs_world.read_component::<Stats>();
        let enemies = self.specs_world.read_component::<Enemy>();
        (&entities, &enemies, &positions, &stats)
            .join()
            .map(|(entity, enemy, pos, stat)| EnemyView {
                entity,
                id: enemy.id,
                name: enemy.name.clone(),
                bounds: pos.bounds,
                stats: *stat,
                is_boss: enemy.is_boss,
            })
            .collect()
    }

    pub fn enemy(&self, entity: Entity) -> Option<EnemyView> {
        self.enemies().into_iter().find(|view| view.entity == entity)
    }

    pub fn enemy_by_id(&self, id: u32) -> Option<EnemyView> {
        self.enemies().into_iter().find(|view| view.id == id)
    }

    pub fn enemy_count(&self) -> usize {
        let enemies = self.specs_world.read_component::<Enemy>();
        (&enemies).join().count()
    }

    pub fn remove_enemy(&mut self, id: u32) -> bool {
        let Some(view) = self.enemy_by_id(id) else {
            return false;
        };
        let removed = self.specs_world.delete_entity(view.entity).is_ok();
        self.specs_world.maintain();
        removed
    }
}
