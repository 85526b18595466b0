pub mod placement;

use bracket_geometry::prelude::{Point, Rect};
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg, a_star_search};
use bracket_random::prelude::RandomNumberGenerator;
use log::{debug, info, warn};
use smallvec::SmallVec;

use crate::config::GameConfig;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Wall,
    Floor,
}

impl Default for Cell {
    fn default() -> Self {
        Cell::Wall
    }
}

impl Cell {
    pub fn glyph(&self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Floor => '.',
        }
    }
}

/// Walk from `start` along x first, then along y, ending on `end`.
fn corridor_path(start: Point, end: Point) -> Vec<Point> {
    let mut path = Vec::new();
    let mut cursor = start;
    path.push(cursor);

    while cursor.x != end.x {
        cursor.x += if end.x > cursor.x { 1 } else { -1 };
        path.push(cursor);
    }

    while cursor.y != end.y {
        cursor.y += if end.y > cursor.y { 1 } else { -1 };
        path.push(cursor);
    }

    path
}

#[derive(Clone, Debug)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<Cell>,
}

impl Grid {
    pub fn filled(width: i32, height: i32) -> Self {
        let size = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            cells: vec![Cell::Wall; size],
        }
    }

    fn idx(&self, x: i32, y: i32) -> Option<usize> {
        if self.in_bounds(Point::new(x, y)) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    fn carve(&mut self, point: Point) {
        if let Some(idx) = self.idx(point.x, point.y) {
            self.cells[idx] = Cell::Floor;
        }
    }

    pub fn cell_at(&self, point: Point) -> Option<Cell> {
        self.idx(point.x, point.y).map(|idx| self.cells[idx])
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.cell_at(point) == Some(Cell::Floor)
    }

    pub fn wall_points(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if !self.is_walkable(point) {
                    points.push(point);
                }
            }
        }
        points
    }

    /// Whether a walkable route links two cells.
    pub fn reachable(&self, from: Point, to: Point) -> bool {
        if !self.is_walkable(from) || !self.is_walkable(to) {
            return false;
        }
        if from == to {
            return true;
        }
        let path = a_star_search(
            self.point2d_to_index(from),
            self.point2d_to_index(to),
            self,
        );
        path.success
    }
}

impl BaseMap for Grid {
    fn is_opaque(&self, idx: usize) -> bool {
        self.cells.get(idx).is_none_or(|cell| *cell == Cell::Wall)
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let mut exits = SmallVec::new();
        let point = self.index_to_point2d(idx);
        let steps = [
            Point::new(1, 0),
            Point::new(-1, 0),
            Point::new(0, 1),
            Point::new(0, -1),
        ];
        for dir in steps {
            let dest = Point::new(point.x + dir.x, point.y + dir.y);
            if self.is_walkable(dest) {
                exits.push((self.point2d_to_index(dest), 1.0));
            }
        }
        exits
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Manhattan.distance2d(p1, p2)
    }
}

impl Algorithm2D for Grid {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        Grid::in_bounds(self, point)
    }
}

/// A generated level: the walkability grid, the rooms in carving order and
/// one pixel-space obstacle per wall cell.
#[derive(Clone, Debug)]
pub struct Dungeon {
    pub grid: Grid,
    pub rooms: Vec<Rect>,
    pub obstacles: Vec<Rect>,
    pub cell_size: i32,
}

impl Dungeon {
    pub fn generate(config: &GameConfig, rng: &mut RandomNumberGenerator) -> Self {
        let width = config.grid_width();
        let height = config.grid_height();
        let mut grid = Grid::filled(width, height);
        let mut rooms = Vec::with_capacity(config.room_count);

        // Rooms may overlap; later rooms simply carve over earlier ones.
        for _ in 0..config.room_count {
            let room_w = rng.range(config.room_min_size, config.room_max_size + 1);
            let room_h = rng.range(config.room_min_size, config.room_max_size + 1);
            let room_x = rng.range(1, width - room_w);
            let room_y = rng.range(1, height - room_h);
            let room = Rect::with_size(room_x, room_y, room_w, room_h);
            room.for_each(|pt| grid.carve(pt));
            debug!("carved room {room_w}x{room_h} at {room_x},{room_y}");
            rooms.push(room);
        }

        for pair in rooms.windows(2) {
            for pt in corridor_path(pair[0].center(), pair[1].center()) {
                grid.carve(pt);
            }
        }

        let obstacles = grid
            .wall_points()
            .into_iter()
            .map(|pt| {
                Rect::with_size(
                    pt.x * config.cell_size,
                    pt.y * config.cell_size,
                    config.cell_size,
                    config.cell_size,
                )
            })
            .collect::<Vec<Rect>>();

        let dungeon = Self {
            grid,
            rooms,
            obstacles,
            cell_size: config.cell_size,
        };

        info!(
            "generated {}x{} dungeon with {} rooms and {} obstacles",
            width,
            height,
            dungeon.rooms.len(),
            dungeon.obstacles.len()
        );
        if !dungeon.rooms_connected() {
            warn!("generated dungeon failed the room connectivity check");
        }

        dungeon
    }

    /// Every room reaches its predecessor through carved cells.
    pub fn rooms_connected(&self) -> bool {
        self.rooms
            .windows(2)
            .all(|pair| self.grid.reachable(pair[0].center(), pair[1].center()))
    }

    pub fn cell_to_pixel(&self, cell: Point) -> Point {
        Point::new(cell.x * self.cell_size, cell.y * self.cell_size)
    }

    pub fn pixel_to_cell(&self, pixel: Point) -> Point {
        Point::new(
            pixel.x.div_euclid(self.cell_size),
            pixel.y.div_euclid(self.cell_size),
        )
    }
}
