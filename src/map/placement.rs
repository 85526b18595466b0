use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;
use log::debug;

use super::{Dungeon, Grid};

/// Pixel origins for the player's start and the dungeon exit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartAndExit {
    pub start_room: usize,
    pub exit_room: usize,
    pub start: Point,
    pub exit: Point,
}

fn random_room(rooms: &[Rect], rng: &mut RandomNumberGenerator) -> usize {
    rng.range(0, rooms.len() as i32) as usize
}

fn random_cell_in(room: &Rect, rng: &mut RandomNumberGenerator) -> Point {
    Point::new(
        room.x1 + rng.range(0, room.width()),
        room.y1 + rng.range(0, room.height()),
    )
}

/// Picks distinct start and exit rooms, then a random cell in each.
///
/// Needs at least two rooms; config validation guarantees that.
pub fn place_start_and_exit(dungeon: &Dungeon, rng: &mut RandomNumberGenerator) -> StartAndExit {
    let rooms = &dungeon.rooms;
    let start_room = random_room(rooms, rng);
    let mut exit_room = random_room(rooms, rng);
    while exit_room == start_room {
        exit_room = random_room(rooms, rng);
    }

    let start = dungeon.cell_to_pixel(random_cell_in(&rooms[start_room], rng));
    let exit = dungeon.cell_to_pixel(random_cell_in(&rooms[exit_room], rng));
    debug!(
        "player starts in room {start_room} at {},{}; exit in room {exit_room} at {},{}",
        start.x, start.y, exit.x, exit.y
    );

    StartAndExit {
        start_room,
        exit_room,
        start,
        exit,
    }
}

/// Rejection-samples the whole grid until a floor cell turns up.
pub fn random_floor_cell(grid: &Grid, rng: &mut RandomNumberGenerator) -> Point {
    loop {
        let candidate = Point::new(rng.range(0, grid.width), rng.range(0, grid.height));
        if grid.is_walkable(candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn start_and_exit_use_different_rooms() {
        let config = GameConfig::default();
        for seed in 0..100 {
            let mut rng = RandomNumberGenerator::seeded(seed);
            let dungeon = Dungeon::generate(&config, &mut rng);
            let placed = place_start_and_exit(&dungeon, &mut rng);
            assert_ne!(placed.start_room, placed.exit_room);

            let start_cell = dungeon.pixel_to_cell(placed.start);
            let exit_cell = dungeon.pixel_to_cell(placed.exit);
            assert!(dungeon.rooms[placed.start_room].point_in_rect(start_cell));
            assert!(dungeon.rooms[placed.exit_room].point_in_rect(exit_cell));
            assert_eq!(placed.start.x % config.cell_size, 0);
            assert_eq!(placed.exit.y % config.cell_size, 0);
        }
    }

    #[test]
    fn floor_sampling_finds_the_only_floor() {
        let mut grid = Grid::filled(6, 6);
        grid.carve(Point::new(4, 2));
        let mut rng = RandomNumberGenerator::seeded(9);
        for _ in 0..10 {
            assert_eq!(random_floor_cell(&grid, &mut rng), Point::new(4, 2));
        }
    }
}
