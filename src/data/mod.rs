pub mod items;
pub mod monsters;

use serde::{Deserialize, Serialize};

use crate::ecs::components::Stats;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Thief,
    Mage,
}

pub const CLASSES: [CharacterClass; 3] = [
    CharacterClass::Warrior,
    CharacterClass::Thief,
    CharacterClass::Mage,
];

impl CharacterClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Thief => "Thief",
            CharacterClass::Mage => "Mage",
        }
    }

    pub const fn base_stats(&self) -> Stats {
        match self {
            CharacterClass::Warrior => Stats::new(150, 15, 10),
            CharacterClass::Thief => Stats::new(100, 10, 5),
            CharacterClass::Mage => Stats::new(80, 20, 3),
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            CharacterClass::Warrior => 'W',
            CharacterClass::Thief => 'T',
            CharacterClass::Mage => 'M',
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        CLASSES
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}
