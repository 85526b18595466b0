//! One player's run from class selection to escape or death.

use std::time::Duration;

use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;
use log::{debug, info};
use serde::Serialize;

use crate::{
    combat::{ActionResult, CombatOutcome, Encounter, Rejection},
    config::GameConfig,
    data::{CharacterClass, monsters::EnemyTemplate},
    ecs::{EcsWorld, EnemyView, components::Stats, resources::MoveReport},
    map::{
        Dungeon,
        placement::{place_start_and_exit, random_floor_cell},
    },
    player::{ItemUse, PlayerState},
    spatial,
};

const MESSAGE_LOG_MAX: usize = 8;
const EXIT_SEALED: &str = "The exit is sealed. Defeat the boss and find the Key.";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn delta(&self, step: i32) -> Point {
        match self {
            Direction::Up => Point::new(0, -step),
            Direction::Down => Point::new(0, step),
            Direction::Left => Point::new(-step, 0),
            Direction::Right => Point::new(step, 0),
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "up" | "u" | "north" => Some(Direction::Up),
            "down" | "d" | "south" => Some(Direction::Down),
            "left" | "l" | "west" => Some(Direction::Left),
            "right" | "r" | "east" => Some(Direction::Right),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Phase {
    ChoosingClass,
    Exploring,
    InCombat,
    GameOver,
    Completed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    Blocked,
    EncounterStarted,
    Escaped,
    /// Not exploring, so the intent was dropped.
    Ignored,
}

/// Everything generated for the current dungeon.
struct Run {
    player: PlayerState,
    dungeon: Dungeon,
    ecs: EcsWorld,
    exit: Rect,
    encounter: Option<Encounter>,
    boss_defeated: bool,
    enemies_defeated: u32,
}

pub struct Session {
    config: GameConfig,
    rng: RandomNumberGenerator,
    phase: Phase,
    run: Option<Run>,
    message_log: Vec<String>,
}

impl Session {
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: RandomNumberGenerator::seeded(seed),
            phase: Phase::ChoosingClass,
            run: None,
            message_log: Vec::new(),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            info!("phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }

    fn push_log_entry<S: Into<String>>(&mut self, entry: S) {
        self.message_log.insert(0, entry.into());
        self.message_log.truncate(MESSAGE_LOG_MAX);
    }

    /// Newest first.
    pub fn messages(&self) -> &[String] {
        &self.message_log
    }

    pub fn select_class(&mut self, class: CharacterClass) {
        if self.phase != Phase::ChoosingClass {
            return;
        }
        let config = &self.config;
        let dungeon = Dungeon::generate(config, &mut self.rng);
        let placed = place_start_and_exit(&dungeon, &mut self.rng);
        let mut ecs = EcsWorld::new(placed.start, config.cell_size, dungeon.obstacles.clone());

        let regular = EnemyTemplate::regular();
        for id in 0..config.enemy_count {
            let cell = random_floor_cell(&dungeon.grid, &mut self.rng);
            ecs.spawn_enemy(
                id as u32,
                &regular,
                dungeon.cell_to_pixel(cell),
                config.cell_size,
            );
        }
        let cell = random_floor_cell(&dungeon.grid, &mut self.rng);
        ecs.spawn_enemy(
            config.enemy_count as u32,
            &EnemyTemplate::boss(),
            dungeon.cell_to_pixel(cell),
            config.cell_size,
        );

        let exit = Rect::with_size(
            placed.exit.x,
            placed.exit.y,
            config.cell_size,
            config.cell_size,
        );
        self.run = Some(Run {
            player: PlayerState::new(class, config.max_health, config.potion_heal),
            dungeon,
            ecs,
            exit,
            encounter: None,
            boss_defeated: false,
            enemies_defeated: 0,
        });
        self.push_log_entry(format!("A {} descends into the dungeon.", class.as_str()));
        self.set_phase(Phase::Exploring);
    }

    pub fn restart(&mut self) {
        self.run = None;
        self.message_log.clear();
        self.set_phase(Phase::ChoosingClass);
    }

    pub fn step(&mut self, direction: Direction) -> MoveOutcome {
        if self.phase != Phase::Exploring {
            return MoveOutcome::Ignored;
        }
        let delay = self.config.counter_delay();
        let step = self.config.step();
        let Some(run) = self.run.as_mut() else {
            return MoveOutcome::Ignored;
        };

        match run.ecs.step_player(direction.delta(step)) {
            MoveReport::Blocked | MoveReport::Idle => MoveOutcome::Blocked,
            MoveReport::Encounter(entity) => {
                let Some(enemy) = run.ecs.enemy(entity) else {
                    return MoveOutcome::Blocked;
                };
                debug!("encounter with {} #{}", enemy.name, enemy.id);
                run.encounter = Some(Encounter::begin(
                    enemy.id,
                    enemy.name,
                    enemy.is_boss,
                    enemy.stats,
                    delay,
                ));
                self.set_phase(Phase::InCombat);
                MoveOutcome::EncounterStarted
            }
            MoveReport::Moved(_) => {
                let player = run.ecs.player_bounds();
                let at_exit = spatial::overlaps(&player, &run.exit);
                let has_key = run.player.inventory().has_key();
                if spatial::exit_triggered(&player, &run.exit, run.boss_defeated, has_key) {
                    let defeated = run.enemies_defeated;
                    self.push_log_entry(format!(
                        "Dungeon completed! You defeated {defeated} enemies."
                    ));
                    self.set_phase(Phase::Completed);
                    return MoveOutcome::Escaped;
                }
                if at_exit && self.message_log.first().map(String::as_str) != Some(EXIT_SEALED) {
                    self.push_log_entry(EXIT_SEALED);
                }
                MoveOutcome::Moved
            }
        }
    }

    pub fn attack(&mut self) -> ActionResult {
        self.combat_action(|encounter, player, rng| encounter.attack(player, rng))
    }

    pub fn flee(&mut self) -> ActionResult {
        self.combat_action(|encounter, _, rng| encounter.flee(rng))
    }

    /// Uses an inventory slot, in or out of combat.
    pub fn use_item(&mut self, index: usize) -> ActionResult {
        match self.phase {
            Phase::InCombat => {
                self.combat_action(|encounter, player, _| encounter.use_item(player, index))
            }
            Phase::Exploring => {
                let Some(run) = self.run.as_mut() else {
                    return ActionResult::Rejected(Rejection::EncounterOver);
                };
                match run.player.use_item(index) {
                    ItemUse::Applied {
                        name, before, after, ..
                    } => {
                        self.push_log_entry(format!("Used {name}: health {before} -> {after}."));
                        ActionResult::Resolved
                    }
                    ItemUse::AtFullHealth => {
                        self.push_log_entry("Your health is already at maximum!");
                        ActionResult::Rejected(Rejection::AtFullHealth)
                    }
                    ItemUse::NotConsumable { name } => {
                        self.push_log_entry(format!("{name} cannot be used here."));
                        ActionResult::Rejected(Rejection::NotConsumable)
                    }
                    ItemUse::NoSuchItem => {
                        self.push_log_entry(format!("Inventory slot {} is empty.", index + 1));
                        ActionResult::Rejected(Rejection::NoSuchItem)
                    }
                }
            }
            _ => ActionResult::Rejected(Rejection::EncounterOver),
        }
    }

    /// Advances real time; fires a pending counter-attack once it is due.
    pub fn tick(&mut self, elapsed: Duration) {
        if self.phase != Phase::InCombat {
            return;
        }
        let outcome = {
            let Some(run) = self.run.as_mut() else {
                return;
            };
            let Some(encounter) = run.encounter.as_mut() else {
                return;
            };
            encounter.tick(elapsed, &mut run.player, &mut self.rng)
        };
        if let Some(outcome) = outcome {
            self.conclude(outcome);
        }
    }

    fn combat_action<F>(&mut self, action: F) -> ActionResult
    where
        F: FnOnce(&mut Encounter, &mut PlayerState, &mut RandomNumberGenerator) -> ActionResult,
    {
        if self.phase != Phase::InCombat {
            return ActionResult::Rejected(Rejection::EncounterOver);
        }
        let result = {
            let Some(run) = self.run.as_mut() else {
                return ActionResult::Rejected(Rejection::EncounterOver);
            };
            let Some(encounter) = run.encounter.as_mut() else {
                return ActionResult::Rejected(Rejection::EncounterOver);
            };
            action(encounter, &mut run.player, &mut self.rng)
        };
        if let ActionResult::Finished(outcome) = result {
            self.conclude(outcome);
        }
        result
    }

    fn conclude(&mut self, outcome: CombatOutcome) {
        let drop_percent = self.config.potion_drop_percent;
        let Some(run) = self.run.as_mut() else {
            return;
        };
        let Some(encounter) = run.encounter.take() else {
            return;
        };
        info!("encounter with {} ended: {outcome:?}", encounter.enemy_name);

        match outcome {
            CombatOutcome::PlayerDefeated => {
                let defeated = run.enemies_defeated;
                self.push_log_entry(format!("You died after defeating {defeated} enemies."));
                self.set_phase(Phase::GameOver);
            }
            CombatOutcome::PlayerFled => {
                self.push_log_entry(format!("You escaped from the {}.", encounter.enemy_name));
                self.set_phase(Phase::Exploring);
            }
            CombatOutcome::EnemyDefeated => {
                run.ecs.remove_enemy(encounter.enemy_id);
                run.enemies_defeated += 1;
                let mut lines = vec![format!("The {} is defeated.", encounter.enemy_name)];
                if encounter.is_boss {
                    run.boss_defeated = true;
                    if run.player.grant_key() {
                        lines.push("You received a Key!".to_string());
                    }
                }
                if self.rng.range(0, 100) < drop_percent {
                    run.player.grant_potion();
                    lines.push("You received a Health Potion!".to_string());
                }
                for line in lines {
                    self.push_log_entry(line);
                }
                self.set_phase(Phase::Exploring);
            }
        }
    }

    pub fn player(&self) -> Option<&PlayerState> {
        self.run.as_ref().map(|run| &run.player)
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.run.as_ref().and_then(|run| run.encounter.as_ref())
    }

    pub fn dungeon(&self) -> Option<&Dungeon> {
        self.run.as_ref().map(|run| &run.dungeon)
    }

    /// Live enemies in roster order.
    pub fn enemies(&self) -> Vec<EnemyView> {
        self.run
            .as_ref()
            .map(|run| run.ecs.enemies())
            .unwrap_or_default()
    }

    pub fn player_bounds(&self) -> Option<Rect> {
        self.run.as_ref().map(|run| run.ecs.player_bounds())
    }

    pub fn exit_bounds(&self) -> Option<Rect> {
        self.run.as_ref().map(|run| run.exit)
    }

    pub fn boss_defeated(&self) -> bool {
        self.run.as_ref().is_some_and(|run| run.boss_defeated)
    }

    pub fn enemies_defeated(&self) -> u32 {
        self.run.as_ref().map_or(0, |run| run.enemies_defeated)
    }

    pub fn snapshot(&self) -> Snapshot {
        let Some(run) = self.run.as_ref() else {
            return Snapshot {
                phase: self.phase,
                ..Snapshot::default()
            };
        };
        let player = run.player.stats();
        Snapshot {
            phase: self.phase,
            class: Some(run.player.class),
            player: Some(Bounds::from(run.ecs.player_bounds())),
            exit: Some(Bounds::from(run.exit)),
            obstacles: run.dungeon.obstacles.iter().copied().map(Bounds::from).collect(),
            enemies: run
                .ecs
                .enemies()
                .into_iter()
                .map(|view| EnemySnapshot {
                    id: view.id,
                    bounds: Bounds::from(view.bounds),
                    is_boss: view.is_boss,
                })
                .collect(),
            stats: Some(player),
            inventory: run
                .player
                .inventory()
                .iter()
                .map(|item| item.name().to_string())
                .collect(),
            boss_defeated: run.boss_defeated,
            enemies_defeated: run.enemies_defeated,
            combat_log: run
                .encounter
                .as_ref()
                .map(|encounter| encounter.log().entries().to_vec())
                .unwrap_or_default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn force_encounter(&mut self, enemy_id: u32) -> bool {
        let delay = self.config.counter_delay();
        let Some(run) = self.run.as_mut() else {
            return false;
        };
        let Some(enemy) = run.ecs.enemy_by_id(enemy_id) else {
            return false;
        };
        run.encounter = Some(Encounter::begin(
            enemy.id,
            enemy.name,
            enemy.is_boss,
            enemy.stats,
            delay,
        ));
        self.set_phase(Phase::InCombat);
        true
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> Option<&mut PlayerState> {
        self.run.as_mut().map(|run| &mut run.player)
    }

    #[cfg(test)]
    pub(crate) fn place_exit_on_player(&mut self) {
        if let Some(run) = self.run.as_mut() {
            run.exit = run.ecs.player_bounds();
        }
    }

    #[cfg(test)]
    pub(crate) fn mark_boss_defeated(&mut self) {
        if let Some(run) = self.run.as_mut() {
            run.boss_defeated = true;
        }
    }
}

/// Pixel rectangle in render-friendly form.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl From<Rect> for Bounds {
    fn from(rect: Rect) -> Self {
        Self {
            x: rect.x1,
            y: rect.y1,
            width: rect.width(),
            height: rect.height(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EnemySnapshot {
    pub id: u32,
    pub bounds: Bounds,
    pub is_boss: bool,
}

/// Read-only frame for the presentation shell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub class: Option<CharacterClass>,
    pub player: Option<Bounds>,
    pub exit: Option<Bounds>,
    pub obstacles: Vec<Bounds>,
    pub enemies: Vec<EnemySnapshot>,
    pub stats: Option<Stats>,
    pub inventory: Vec<String>,
    pub boss_defeated: bool,
    pub enemies_defeated: u32,
    pub combat_log: Vec<String>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            phase: Phase::ChoosingClass,
            class: None,
            player: None,
            exit: None,
            obstacles: Vec::new(),
            enemies: Vec::new(),
            stats: None,
            inventory: Vec::new(),
            boss_defeated: false,
            enemies_defeated: 0,
            combat_log: Vec::new(),
        }
    }
}
