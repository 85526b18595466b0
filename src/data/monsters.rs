use crate::ecs::components::Stats;

#[derive(Clone, Debug)]
pub struct EnemyTemplate {
    pub name: &'static str,
    pub stats: Stats,
    pub is_boss: bool,
}

impl EnemyTemplate {
    pub const fn regular() -> Self {
        Self::new("Enemy", Stats::new(50, 8, 3), false)
    }

    pub const fn boss() -> Self {
        Self::new("Boss", Stats::new(200, 15, 10), true)
    }

    const fn new(name: &'static str, stats: Stats, is_boss: bool) -> Self {
        Self {
            name,
            stats,
            is_boss,
        }
    }
}
