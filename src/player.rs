use log::debug;

use crate::{
    data::{
        CharacterClass,
        items::{Inventory, Item},
    },
    ecs::components::Stats,
};

/// Result of trying to use an inventory slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemUse {
    Applied {
        name: String,
        description: String,
        before: i32,
        after: i32,
    },
    AtFullHealth,
    NotConsumable { name: String },
    NoSuchItem,
}

/// Sole owner of the player's stats and inventory.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub class: CharacterClass,
    stats: Stats,
    inventory: Inventory,
    max_health: i32,
    potion_heal: i32,
}

impl PlayerState {
    /// Fresh run: class base stats and a single health potion.
    pub fn new(class: CharacterClass, max_health: i32, potion_heal: i32) -> Self {
        let mut inventory = Inventory::default();
        inventory.push(Item::health_potion(potion_heal, max_health));
        Self {
            class,
            stats: class.base_stats(),
            inventory,
            max_health,
            potion_heal,
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn is_alive(&self) -> bool {
        !self.stats.is_down()
    }

    /// Returns the remaining health.
    pub fn take_damage(&mut self, damage: i32) -> i32 {
        self.stats = self.stats.wounded(damage);
        self.stats.health
    }

    pub fn use_item(&mut self, index: usize) -> ItemUse {
        let Some(item) = self.inventory.get(index) else {
            return ItemUse::NoSuchItem;
        };
        let Some(effect) = item.effect().cloned() else {
            return ItemUse::NotConsumable {
                name: item.name().to_string(),
            };
        };
        if self.stats.health >= self.max_health {
            return ItemUse::AtFullHealth;
        }

        let before = self.stats.health;
        self.stats = effect.apply(self.stats);
        let used = self.inventory.remove(index);
        let (name, description) = used
            .map(|item| (item.name().to_string(), item.description().to_string()))
            .unwrap_or_default();
        debug!("used {name}: health {before} -> {}", self.stats.health);
        ItemUse::Applied {
            name,
            description,
            before,
            after: self.stats.health,
        }
    }

    /// Adds the exit key unless one is already held. Returns whether it was added.
    pub fn grant_key(&mut self) -> bool {
        if self.inventory.has_key() {
            return false;
        }
        self.inventory.push(Item::exit_key());
        true
    }

    pub fn grant_potion(&mut self) {
        self.inventory
            .push(Item::health_potion(self.potion_heal, self.max_health));
    }

    #[cfg(test)]
    pub(crate) fn set_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }
}
