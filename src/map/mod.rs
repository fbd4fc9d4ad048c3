pub mod features;
pub mod generator;
pub mod visibility;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap, DistanceAlg};
use bracket_random::prelude::RandomNumberGenerator;
use smallvec::SmallVec;

pub use features::{Glyph, GlyphGrid, classify};
pub use generator::{BorderOnly, MapStrategy, RandomRooms};
pub use visibility::visible_cells;

/// The eight compass steps, clockwise from north.
pub const COMPASS: [Point; 8] = [
    Point { x: 0, y: -1 },
    Point { x: 1, y: -1 },
    Point { x: 1, y: 0 },
    Point { x: 1, y: 1 },
    Point { x: 0, y: 1 },
    Point { x: -1, y: 1 },
    Point { x: -1, y: 0 },
    Point { x: -1, y: -1 },
];

/// Walkable/blocked cells, row-major. Immutable once generated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    pub width: i32,
    pub height: i32,
    walkable: Vec<bool>,
}

impl OccupancyGrid {
    pub fn blocked(width: i32, height: i32) -> Self {
        let size = (width.max(0) * height.max(0)) as usize;
        Self {
            width,
            height,
            walkable: vec![false; size],
        }
    }

    /// Builds a grid from text rows: `#` is blocked, anything else walkable.
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0) as i32;
        let mut grid = Self::blocked(width, height);
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                grid.set_walkable(Point::new(x as i32, y as i32), ch != '#');
            }
        }
        grid
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if self.in_bounds(point) {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn is_walkable(&self, point: Point) -> bool {
        self.idx(point)
            .and_then(|idx| self.walkable.get(idx).copied())
            .unwrap_or(false)
    }

    pub(crate) fn set_walkable(&mut self, point: Point, walkable: bool) {
        if let Some(idx) = self.idx(point) {
            self.walkable[idx] = walkable;
        }
    }

    pub fn walkable_cells(&self) -> Vec<Point> {
        let mut points = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let point = Point::new(x, y);
                if self.is_walkable(point) {
                    points.push(point);
                }
            }
        }
        points
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.iter().filter(|open| **open).count()
    }

    pub fn walkable_neighbors(&self, point: Point) -> SmallVec<[Point; 8]> {
        COMPASS
            .iter()
            .map(|step| point + *step)
            .filter(|target| self.is_walkable(*target))
            .collect()
    }
}

impl BaseMap for OccupancyGrid {
    fn is_opaque(&self, idx: usize) -> bool {
        !self.walkable.get(idx).copied().unwrap_or(false)
    }

    fn get_available_exits(&self, idx: usize) -> SmallVec<[(usize, f32); 10]> {
        let point = self.index_to_point2d(idx);
        self.walkable_neighbors(point)
            .into_iter()
            .map(|dest| (self.point2d_to_index(dest), 1.0))
            .collect()
    }

    fn get_pathing_distance(&self, idx1: usize, idx2: usize) -> f32 {
        let p1 = self.index_to_point2d(idx1);
        let p2 = self.index_to_point2d(idx2);
        DistanceAlg::Pythagoras.distance2d(p1, p2)
    }
}

impl Algorithm2D for OccupancyGrid {
    fn dimensions(&self) -> Point {
        Point::new(self.width, self.height)
    }

    fn in_bounds(&self, point: Point) -> bool {
        OccupancyGrid::in_bounds(self, point)
    }
}

/// Walkable cells not yet handed to an actor.
pub struct CellPool {
    cells: Vec<Point>,
}

impl CellPool {
    pub fn new(grid: &OccupancyGrid) -> Self {
        Self {
            cells: grid.walkable_cells(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Removes and returns a random cell, or `None` once the pool is drained.
    pub fn take_random(&mut self, rng: &mut RandomNumberGenerator) -> Option<Point> {
        if self.cells.is_empty() {
            return None;
        }
        let idx = rng.range(0, self.cells.len() as i32) as usize;
        Some(self.cells.swap_remove(idx))
    }

    pub fn give_back(&mut self, point: Point) {
        if !self.cells.contains(&point) {
            self.cells.push(point);
        }
    }
}
