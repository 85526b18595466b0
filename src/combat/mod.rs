//! Turn-based resolution of a single encounter.
//!
//! The encounter works on a private copy of the enemy's stats. A player
//! attack or failed flee schedules the enemy's counter-attack, which fires
//! from [`Encounter::tick`] once the delay has elapsed; until then every
//! player action is refused, so exactly one action resolves at a time.

use std::time::Duration;

use bracket_random::prelude::RandomNumberGenerator;
use log::debug;

use crate::{
    ecs::components::Stats,
    player::{ItemUse, PlayerState},
};

pub const DIE_SIDES: i32 = 20;

/// `max(0, (attack_roll + attack) - (defense_roll + defense))`
pub fn resolve_damage(attack: i32, defense: i32, attack_roll: i32, defense_roll: i32) -> i32 {
    ((attack_roll + attack) - (defense_roll + defense)).max(0)
}

pub fn roll_damage(attack: i32, defense: i32, rng: &mut RandomNumberGenerator) -> i32 {
    let attack_roll = rng.roll_dice(1, DIE_SIDES);
    let defense_roll = rng.roll_dice(1, DIE_SIDES);
    let damage = resolve_damage(attack, defense, attack_roll, defense_roll);
    debug!("d20 {attack_roll}+{attack} vs d20 {defense_roll}+{defense} -> {damage}");
    damage
}

/// Fair coin: a d2 showing 1 means the player got away.
pub fn flee_roll(rng: &mut RandomNumberGenerator) -> bool {
    rng.roll_dice(1, 2) == 1
}

#[derive(Clone, Debug, Default)]
pub struct CombatLog {
    entries: Vec<String>,
}

impl CombatLog {
    pub fn push<S: Into<String>>(&mut self, entry: S) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CombatOutcome {
    EnemyDefeated,
    PlayerFled,
    PlayerDefeated,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CombatPhase {
    AwaitingPlayer,
    CounterPending { remaining: Duration },
    Finished(CombatOutcome),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    ActionInFlight,
    EncounterOver,
    AtFullHealth,
    NotConsumable,
    NoSuchItem,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionResult {
    /// Resolved without handing the turn to the enemy.
    Resolved,
    CounterScheduled,
    Finished(CombatOutcome),
    Rejected(Rejection),
}

#[derive(Clone, Debug)]
pub struct Encounter {
    pub enemy_id: u32,
    pub enemy_name: String,
    pub is_boss: bool,
    enemy_stats: Stats,
    phase: CombatPhase,
    log: CombatLog,
    counter_delay: Duration,
}

impl Encounter {
    pub fn begin(
        enemy_id: u32,
        enemy_name: impl Into<String>,
        is_boss: bool,
        enemy_stats: Stats,
        counter_delay: Duration,
    ) -> Self {
        let enemy_name = enemy_name.into();
        let mut log = CombatLog::default();
        log.push(format!("A wild {enemy_name} blocks the way!"));
        Self {
            enemy_id,
            enemy_name,
            is_boss,
            enemy_stats,
            phase: CombatPhase::AwaitingPlayer,
            log,
            counter_delay,
        }
    }

    pub fn enemy_stats(&self) -> Stats {
        self.enemy_stats
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub fn log(&self) -> &CombatLog {
        &self.log
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        match self.phase {
            CombatPhase::Finished(outcome) => Some(outcome),
            _ => None,
        }
    }

    pub fn counter_pending(&self) -> bool {
        matches!(self.phase, CombatPhase::CounterPending { .. })
    }

    fn guard(&mut self) -> Option<Rejection> {
        match self.phase {
            CombatPhase::AwaitingPlayer => None,
            CombatPhase::CounterPending { .. } => {
                self.log.push(format!("{} is still acting!", self.enemy_name));
                Some(Rejection::ActionInFlight)
            }
            CombatPhase::Finished(_) => Some(Rejection::EncounterOver),
        }
    }

    fn schedule_counter(&mut self) -> ActionResult {
        self.phase = CombatPhase::CounterPending {
            remaining: self.counter_delay,
        };
        ActionResult::CounterScheduled
    }

    fn finish(&mut self, outcome: CombatOutcome) -> ActionResult {
        self.phase = CombatPhase::Finished(outcome);
        ActionResult::Finished(outcome)
    }

    pub fn attack(
        &mut self,
        player: &mut PlayerState,
        rng: &mut RandomNumberGenerator,
    ) -> ActionResult {
        if let Some(rejection) = self.guard() {
            return ActionResult::Rejected(rejection);
        }

        let damage = roll_damage(player.stats().attack, self.enemy_stats.defense, rng);
        self.enemy_stats = self.enemy_stats.wounded(damage);
        self.log
            .push(format!("Player dealt {damage} damage to {}", self.enemy_name));

        if self.enemy_stats.is_down() {
            self.log.push(format!("{} defeated!", self.enemy_name));
            return self.finish(CombatOutcome::EnemyDefeated);
        }
        self.schedule_counter()
    }

    pub fn flee(&mut self, rng: &mut RandomNumberGenerator) -> ActionResult {
        if let Some(rejection) = self.guard() {
            return ActionResult::Rejected(rejection);
        }

        if flee_roll(rng) {
            self.log.push("Player successfully fled!");
            return self.finish(CombatOutcome::PlayerFled);
        }
        self.log.push("Player failed to flee!");
        self.schedule_counter()
    }

    /// Using an item never hands the turn to the enemy.
    pub fn use_item(&mut self, player: &mut PlayerState, index: usize) -> ActionResult {
        if let Some(rejection) = self.guard() {
            return ActionResult::Rejected(rejection);
        }

        match player.use_item(index) {
            ItemUse::Applied {
                name, description, ..
            } => {
                self.log.push(format!("Player used {name} and {description}"));
                ActionResult::Resolved
            }
            ItemUse::AtFullHealth => {
                self.log.push("Player's health is already at maximum!");
                ActionResult::Rejected(Rejection::AtFullHealth)
            }
            ItemUse::NotConsumable { name } => {
                self.log.push(format!("{name} cannot be used in combat."));
                ActionResult::Rejected(Rejection::NotConsumable)
            }
            ItemUse::NoSuchItem => {
                self.log.push(format!("Inventory slot {} is empty.", index + 1));
                ActionResult::Rejected(Rejection::NoSuchItem)
            }
        }
    }

    /// Advances the pending counter-attack, firing it once the delay runs out.
    pub fn tick(
        &mut self,
        elapsed: Duration,
        player: &mut PlayerState,
        rng: &mut RandomNumberGenerator,
    ) -> Option<CombatOutcome> {
        let CombatPhase::CounterPending { remaining } = self.phase else {
            return None;
        };
        let remaining = remaining.saturating_sub(elapsed);
        if !remaining.is_zero() {
            self.phase = CombatPhase::CounterPending { remaining };
            return None;
        }
        self.counter_attack(player, rng)
    }

    fn counter_attack(
        &mut self,
        player: &mut PlayerState,
        rng: &mut RandomNumberGenerator,
    ) -> Option<CombatOutcome> {
        let damage = roll_damage(self.enemy_stats.attack, player.stats().defense, rng);
        let health = player.take_damage(damage);
        self.log
            .push(format!("{} dealt {damage} damage to Player", self.enemy_name));

        if health <= 0 {
            self.log.push("Player has been defeated!");
            self.phase = CombatPhase::Finished(CombatOutcome::PlayerDefeated);
            return Some(CombatOutcome::PlayerDefeated);
        }
        self.phase = CombatPhase::AwaitingPlayer;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CharacterClass, items::HEALTH_POTION};

    const DELAY: Duration = Duration::from_millis(500);

    fn rng() -> RandomNumberGenerator {
        RandomNumberGenerator::seeded(0x5eed)
    }

    fn player() -> PlayerState {
        PlayerState::new(CharacterClass::Thief, 100, 20)
    }

    fn goblin(stats: Stats) -> Encounter {
        Encounter::begin(1, "Enemy", false, stats, DELAY)
    }

    #[test]
    fn damage_formula_matches_worked_example() {
        assert_eq!(resolve_damage(10, 10, 15, 5), 10);
        assert_eq!(resolve_damage(10, 10, 5, 15), 0);
        assert_eq!(resolve_damage(0, 0, 1, 1), 0);
    }

    #[test]
    fn rolled_damage_stays_in_range() {
        let mut rng = rng();
        for _ in 0..1_000 {
            let damage = roll_damage(8, 3, &mut rng);
            assert!((0..=(20 + 8 - 1 - 3)).contains(&damage));
        }
    }

    #[test]
    fn flee_is_a_fair_coin() {
        let mut rng = rng();
        let trials = 10_000;
        let successes = (0..trials).filter(|_| flee_roll(&mut rng)).count();
        let rate = successes as f64 / trials as f64;
        assert!((0.47..=0.53).contains(&rate), "flee rate {rate}");
    }

    #[test]
    fn lethal_attack_skips_counter() {
        let mut rng = rng();
        let mut player = player();
        let mut encounter = goblin(Stats::new(1, 8, -100));
        let result = encounter.attack(&mut player, &mut rng);
        assert_eq!(result, ActionResult::Finished(CombatOutcome::EnemyDefeated));
        assert_eq!(encounter.enemy_stats().health, 0);
        assert_eq!(encounter.log().last(), Some("Enemy defeated!"));

        assert_eq!(encounter.tick(DELAY, &mut player, &mut rng), None);
        assert_eq!(player.stats().health, 100);
    }

    #[test]
    fn counter_waits_for_delay_and_blocks_actions() {
        let mut rng = rng();
        let mut player = player();
        let mut encounter = goblin(Stats::new(10_000, 8, 3));
        assert_eq!(
            encounter.attack(&mut player, &mut rng),
            ActionResult::CounterScheduled
        );
        assert!(encounter.counter_pending());

        assert_eq!(
            encounter.attack(&mut player, &mut rng),
            ActionResult::Rejected(Rejection::ActionInFlight)
        );
        assert_eq!(
            encounter.flee(&mut rng),
            ActionResult::Rejected(Rejection::ActionInFlight)
        );

        let before = encounter.log().len();
        assert_eq!(
            encounter.tick(Duration::from_millis(200), &mut player, &mut rng),
            None
        );
        assert!(encounter.counter_pending());
        assert_eq!(encounter.log().len(), before);

        assert_eq!(
            encounter.tick(Duration::from_millis(300), &mut player, &mut rng),
            None
        );
        assert_eq!(encounter.phase(), CombatPhase::AwaitingPlayer);
        assert!(
            encounter
                .log()
                .last()
                .is_some_and(|line| line.starts_with("Enemy dealt"))
        );
    }

    #[test]
    fn overwhelming_counter_defeats_player() {
        let mut rng = rng();
        let mut player = player();
        let mut encounter = goblin(Stats::new(10_000, 1_000, 3));
        encounter.attack(&mut player, &mut rng);
        let outcome = encounter.tick(DELAY, &mut player, &mut rng);
        assert_eq!(outcome, Some(CombatOutcome::PlayerDefeated));
        assert_eq!(player.stats().health, 0);
        assert_eq!(encounter.outcome(), Some(CombatOutcome::PlayerDefeated));
        assert_eq!(
            encounter.attack(&mut player, &mut rng),
            ActionResult::Rejected(Rejection::EncounterOver)
        );
    }

    #[test]
    fn flee_either_escapes_or_schedules_counter() {
        let mut rng = rng();
        let mut fled = 0;
        let mut failed = 0;
        for _ in 0..100 {
            let mut encounter = goblin(Stats::new(50, 8, 3));
            match encounter.flee(&mut rng) {
                ActionResult::Finished(CombatOutcome::PlayerFled) => {
                    fled += 1;
                    assert_eq!(encounter.log().last(), Some("Player successfully fled!"));
                }
                ActionResult::CounterScheduled => {
                    failed += 1;
                    assert_eq!(encounter.log().last(), Some("Player failed to flee!"));
                }
                other => panic!("unexpected flee result {other:?}"),
            }
        }
        assert!(fled > 0 && failed > 0);
    }

    #[test]
    fn working_copy_is_isolated() {
        let canonical = Stats::new(10_000, 0, 3);
        let mut rng = rng();
        let mut player = PlayerState::new(CharacterClass::Warrior, 100, 20);
        let mut encounter = goblin(canonical);
        for _ in 0..20 {
            encounter.attack(&mut player, &mut rng);
            encounter.tick(DELAY, &mut player, &mut rng);
        }
        assert!(encounter.enemy_stats().health < canonical.health);
        assert_eq!(canonical.health, 10_000);
    }

    #[test]
    fn item_use_in_combat() {
        let mut rng = rng();
        let mut player = player();
        let mut encounter = goblin(Stats::new(50, 8, 3));

        assert_eq!(
            encounter.use_item(&mut player, 0),
            ActionResult::Rejected(Rejection::AtFullHealth)
        );
        assert_eq!(player.inventory().count(HEALTH_POTION), 1);
        assert_eq!(
            encounter.log().last(),
            Some("Player's health is already at maximum!")
        );

        player.take_damage(30);
        assert_eq!(encounter.use_item(&mut player, 0), ActionResult::Resolved);
        assert_eq!(player.stats().health, 90);
        assert_eq!(
            encounter.log().last(),
            Some("Player used Health Potion and Restores 20 health points.")
        );
        assert_eq!(encounter.phase(), CombatPhase::AwaitingPlayer);
        assert_eq!(
            encounter.use_item(&mut player, 0),
            ActionResult::Rejected(Rejection::NoSuchItem)
        );
        let _ = encounter.flee(&mut rng);
    }

    #[test]
    fn empty_slot_is_logged() {
        let mut player = player();
        let mut encounter = goblin(Stats::new(50, 8, 3));
        let before = encounter.log().len();
        assert_eq!(
            encounter.use_item(&mut player, 4),
            ActionResult::Rejected(Rejection::NoSuchItem)
        );
        assert_eq!(encounter.log().len(), before + 1);
        assert_eq!(encounter.log().last(), Some("Inventory slot 5 is empty."));
    }

    #[test]
    fn log_only_grows() {
        let mut rng = rng();
        let mut player = PlayerState::new(CharacterClass::Warrior, 100, 20);
        let mut encounter = goblin(Stats::new(10_000, 0, 3));
        let mut seen = encounter.log().entries().to_vec();
        for _ in 0..10 {
            encounter.attack(&mut player, &mut rng);
            encounter.tick(DELAY, &mut player, &mut rng);
            let now = encounter.log().entries();
            assert!(now.len() > seen.len());
            assert_eq!(&now[..seen.len()], &seen[..]);
            seen = now.to_vec();
        }
    }
}
