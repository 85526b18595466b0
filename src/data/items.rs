use crate::ecs::components::Stats;

pub const HEALTH_POTION: &str = "Health Potion";
pub const EXIT_KEY: &str = "Key";

/// Stat transform carried by a consumable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PotionEffect {
    Heal { amount: i32, cap: i32 },
}

impl PotionEffect {
    pub fn apply(&self, stats: Stats) -> Stats {
        match *self {
            PotionEffect::Heal { amount, cap } => {
                stats.with_health((stats.health + amount).min(cap))
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Potion {
        name: String,
        description: String,
        effect: PotionEffect,
    },
    Key {
        name: String,
        description: String,
    },
}

impl Item {
    pub fn health_potion(amount: i32, cap: i32) -> Self {
        Item::Potion {
            name: HEALTH_POTION.to_string(),
            description: format!("Restores {amount} health points."),
            effect: PotionEffect::Heal { amount, cap },
        }
    }

    pub fn exit_key() -> Self {
        Item::Key {
            name: EXIT_KEY.to_string(),
            description: "A key that allows you to exit the dungeon.".to_string(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Item::Potion { name, .. } | Item::Key { name, .. } => name,
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Item::Potion { description, .. } | Item::Key { description, .. } => description,
        }
    }

    pub fn effect(&self) -> Option<&PotionEffect> {
        match self {
            Item::Potion { effect, .. } => Some(effect),
            Item::Key { .. } => None,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self, Item::Key { .. })
    }
}

/// Ordered item list; duplicates allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    items: Vec<Item>,
}

impl Inventory {
    pub fn push(&mut self, item: Item) {
        self.items.push(item);
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn has_key(&self) -> bool {
        self.items.iter().any(Item::is_key)
    }

    pub fn count(&self, name: &str) -> usize {
        self.items.iter().filter(|item| item.name() == name).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
