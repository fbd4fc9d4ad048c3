use bracket_geometry::prelude::{Point, Rect};
use bracket_random::prelude::RandomNumberGenerator;
use tracing::debug;

use super::OccupancyGrid;
use crate::config::{MapConfig, MapStrategyKind};

/// A way of carving an occupancy grid.
pub trait MapStrategy {
    fn generate(&self, width: i32, height: i32, rng: &mut RandomNumberGenerator) -> OccupancyGrid;
}

pub fn strategy_for(config: &MapConfig) -> Box<dyn MapStrategy> {
    match config.strategy {
        MapStrategyKind::RandomRooms => Box::new(RandomRooms::from_config(config)),
        MapStrategyKind::BorderOnly => Box::new(BorderOnly),
    }
}

/// Non-overlapping rectangular rooms chained together by L-shaped corridors.
#[derive(Clone, Debug)]
pub struct RandomRooms {
    pub min_rooms: i32,
    pub max_rooms: i32,
    pub room_min_size: i32,
    pub room_max_size: i32,
}

impl RandomRooms {
    pub fn from_config(config: &MapConfig) -> Self {
        Self {
            min_rooms: config.min_rooms,
            max_rooms: config.max_rooms,
            room_min_size: config.room_min_size,
            room_max_size: config.room_max_size,
        }
    }

    /// Lays out the rooms without carving them, so callers can inspect the plan.
    pub fn plan_rooms(&self, width: i32, height: i32, rng: &mut RandomNumberGenerator) -> Vec<Rect> {
        let max_rooms = self.max_rooms.max(0);
        let min_rooms = self.min_rooms.clamp(0, max_rooms);
        let attempts = rng.range(min_rooms, max_rooms + 1);

        let mut rooms: Vec<Rect> = Vec::new();
        for _ in 0..attempts {
            let room_w = rng.range(self.room_min_size, self.room_max_size + 1);
            let room_h = rng.range(self.room_min_size, self.room_max_size + 1);
            let x_max = width - room_w - 1;
            let y_max = height - room_h - 1;
            if x_max < 0 || y_max < 0 {
                continue;
            }

            let room_x = rng.range(0, x_max + 1);
            let room_y = rng.range(0, y_max + 1);
            let candidate = Rect::with_size(room_x, room_y, room_w, room_h);
            if rooms.iter().any(|room| room.intersect(&candidate)) {
                continue;
            }
            rooms.push(candidate);
        }
        rooms
    }
}

impl Default for RandomRooms {
    fn default() -> Self {
        Self::from_config(&MapConfig::default())
    }
}

impl MapStrategy for RandomRooms {
    fn generate(&self, width: i32, height: i32, rng: &mut RandomNumberGenerator) -> OccupancyGrid {
        let mut grid = OccupancyGrid::blocked(width, height);
        let rooms = self.plan_rooms(width, height, rng);

        for room in &rooms {
            carve_room(&mut grid, room);
        }

        for pair in rooms.windows(2) {
            let (start, end) = (pair[0].center(), pair[1].center());
            let horizontal_first = rng.range(0, 2) == 0;
            for point in corridor_path(start, end, horizontal_first) {
                grid.set_walkable(point, true);
            }
        }

        debug!(
            rooms = rooms.len(),
            walkable = grid.walkable_count(),
            "generated random rooms {width}x{height}"
        );
        grid
    }
}

/// One open room filling everything inside the outer wall.
#[derive(Clone, Copy, Debug, Default)]
pub struct BorderOnly;

impl MapStrategy for BorderOnly {
    fn generate(&self, width: i32, height: i32, _rng: &mut RandomNumberGenerator) -> OccupancyGrid {
        let mut grid = OccupancyGrid::blocked(width, height);
        for y in 1..height - 1 {
            for x in 1..width - 1 {
                grid.set_walkable(Point::new(x, y), true);
            }
        }
        grid
    }
}

fn carve_room(grid: &mut OccupancyGrid, room: &Rect) {
    for y in room.y1 + 1..room.y2 {
        for x in room.x1 + 1..room.x2 {
            grid.set_walkable(Point::new(x, y), true);
        }
    }
}

fn corridor_path(start: Point, end: Point, horizontal_first: bool) -> Vec<Point> {
    let mut path = vec![start];
    let mut cursor = start;
    if horizontal_first {
        walk_x(&mut cursor, end, &mut path);
        walk_y(&mut cursor, end, &mut path);
    } else {
        walk_y(&mut cursor, end, &mut path);
        walk_x(&mut cursor, end, &mut path);
    }
    path
}

fn walk_x(cursor: &mut Point, end: Point, path: &mut Vec<Point>) {
    while cursor.x != end.x {
        cursor.x += if end.x > cursor.x { 1 } else { -1 };
        path.push(*cursor);
    }
}

fn walk_y(cursor: &mut Point, end: Point, path: &mut Vec<Point>) {
    while cursor.y != end.y {
        cursor.y += if end.y > cursor.y { 1 } else { -1 };
        path.push(*cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corridor_bends_once_and_reaches_the_end() {
        let path = corridor_path(Point::new(1, 1), Point::new(4, 3), true);
        assert_eq!(path.first(), Some(&Point::new(1, 1)));
        assert_eq!(path.last(), Some(&Point::new(4, 3)));
        assert_eq!(path.len(), 6);
        assert!(path.contains(&Point::new(4, 1)));

        let path = corridor_path(Point::new(1, 1), Point::new(4, 3), false);
        assert!(path.contains(&Point::new(1, 3)));
    }

    #[test]
    fn border_only_leaves_the_edge_blocked() {
        let mut rng = RandomNumberGenerator::seeded(1);
        let grid = BorderOnly.generate(6, 5, &mut rng);
        assert_eq!(grid.walkable_count(), 4 * 3);
        assert!(!grid.is_walkable(Point::new(0, 2)));
        assert!(!grid.is_walkable(Point::new(5, 2)));
        assert!(grid.is_walkable(Point::new(1, 1)));
    }

    #[test]
    fn planned_rooms_fit_and_do_not_overlap() {
        let strategy = RandomRooms::default();
        for seed in 0..20 {
            let mut rng = RandomNumberGenerator::seeded(seed);
            let rooms = strategy.plan_rooms(80, 40, &mut rng);
            for (i, room) in rooms.iter().enumerate() {
                assert!(room.x1 >= 0 && room.x2 < 80);
                assert!(room.y1 >= 0 && room.y2 < 40);
                for other in &rooms[i + 1..] {
                    assert!(!room.intersect(other));
                }
            }
        }
    }

    #[test]
    fn default_dungeons_have_several_rooms() {
        let strategy = RandomRooms::default();
        for seed in 0..20 {
            let rooms = strategy.plan_rooms(80, 40, &mut RandomNumberGenerator::seeded(seed));
            assert!(rooms.len() >= 2, "seed {seed} planned {} room(s)", rooms.len());
        }
    }

    #[test]
    fn generation_is_reproducible_for_a_seed() {
        let strategy = RandomRooms::default();
        let a = strategy.generate(60, 30, &mut RandomNumberGenerator::seeded(42));
        let b = strategy.generate(60, 30, &mut RandomNumberGenerator::seeded(42));
        assert_eq!(a, b);
        assert!(a.walkable_count() > 0);
    }

    #[test]
    fn rooms_larger_than_the_map_are_skipped() {
        let strategy = RandomRooms {
            min_rooms: 5,
            max_rooms: 5,
            room_min_size: 10,
            room_max_size: 10,
        };
        let grid = strategy.generate(8, 8, &mut RandomNumberGenerator::seeded(3));
        assert_eq!(grid.walkable_count(), 0);
    }
}
