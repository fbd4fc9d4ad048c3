use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

use super::{COMPASS, OccupancyGrid};

const NORTH: usize = 0;
const EAST: usize = 2;
const SOUTH: usize = 4;
const WEST: usize = 6;

/// Tile category handed to presentation. Plain walls and unseen cells are both `Dark`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Glyph {
    #[default]
    Dark = 0,
    Floor = 1,
    Corridor = 2,
    Door = 3,
    VerticalWall = 4,
    HorizontalWall = 5,
}

impl Glyph {
    pub const ALL: [Glyph; 6] = [
        Glyph::Dark,
        Glyph::Floor,
        Glyph::Corridor,
        Glyph::Door,
        Glyph::VerticalWall,
        Glyph::HorizontalWall,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn is_walkable(self) -> bool {
        matches!(self, Glyph::Floor | Glyph::Corridor | Glyph::Door)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlyphGrid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Glyph>,
}

impl GlyphGrid {
    pub fn dark(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            cells: vec![Glyph::Dark; (width.max(0) * height.max(0)) as usize],
        }
    }

    fn idx(&self, point: Point) -> Option<usize> {
        if point.x >= 0 && point.x < self.width && point.y >= 0 && point.y < self.height {
            Some((point.y * self.width + point.x) as usize)
        } else {
            None
        }
    }

    pub fn get(&self, point: Point) -> Glyph {
        self.idx(point)
            .and_then(|idx| self.cells.get(idx).copied())
            .unwrap_or(Glyph::Dark)
    }

    fn set(&mut self, point: Point, glyph: Glyph) {
        if let Some(idx) = self.idx(point) {
            self.cells[idx] = glyph;
        }
    }

    /// Row-major cells.
    pub fn cells(&self) -> &[Glyph] {
        &self.cells
    }

    pub fn codes(&self) -> Vec<u8> {
        self.cells.iter().map(|glyph| glyph.code()).collect()
    }

    /// Copy of this grid where every cell outside `visible` reads as `Dark`.
    pub fn masked(&self, visible: &HashSet<Point>) -> GlyphGrid {
        let mut view = GlyphGrid::dark(self.width, self.height);
        for point in visible {
            view.set(*point, self.get(*point));
        }
        view
    }

    pub fn count(&self, glyph: Glyph) -> usize {
        self.cells.iter().filter(|cell| **cell == glyph).count()
    }
}

/// Derives the glyph grid from raw walkability. Out-of-bounds neighbours count as blocked.
pub fn classify(grid: &OccupancyGrid) -> GlyphGrid {
    let mut glyphs = GlyphGrid::dark(grid.width, grid.height);
    for y in 0..grid.height {
        for x in 0..grid.width {
            let point = Point::new(x, y);
            glyphs.set(point, classify_cell(grid, point));
        }
    }
    glyphs
}

fn classify_cell(grid: &OccupancyGrid, point: Point) -> Glyph {
    let ring = neighborhood(grid, point);
    if grid.is_walkable(point) {
        if is_doorway(&ring) {
            Glyph::Door
        } else if is_corridor(&ring) {
            Glyph::Corridor
        } else {
            Glyph::Floor
        }
    } else if !ring[NORTH] && !ring[SOUTH] && (ring[EAST] || ring[WEST]) {
        Glyph::VerticalWall
    } else if !ring[EAST] && !ring[WEST] && (ring[NORTH] || ring[SOUTH]) {
        Glyph::HorizontalWall
    } else {
        Glyph::Dark
    }
}

fn neighborhood(grid: &OccupancyGrid, point: Point) -> [bool; 8] {
    std::array::from_fn(|i| grid.is_walkable(point + COMPASS[i]))
}

fn is_corridor(ring: &[bool; 8]) -> bool {
    let open = ring.iter().filter(|cell| **cell).count();
    open == 2 && ((ring[NORTH] && ring[SOUTH]) || (ring[EAST] && ring[WEST]))
}

// A gap in a wall line: blocked on one axis, open on the other, and the open
// cells around it fall into separate runs with at least one spreading wider.
fn is_doorway(ring: &[bool; 8]) -> bool {
    let in_vertical_wall = !ring[NORTH] && !ring[SOUTH] && ring[EAST] && ring[WEST];
    let in_horizontal_wall = !ring[EAST] && !ring[WEST] && ring[NORTH] && ring[SOUTH];
    if !in_vertical_wall && !in_horizontal_wall {
        return false;
    }
    let runs = open_runs(ring);
    runs.len() >= 2 && runs.iter().any(|len| *len >= 2)
}

/// Lengths of the consecutive walkable stretches around the ring, wrapping.
fn open_runs(ring: &[bool; 8]) -> Vec<usize> {
    let Some(start) = (0..8).find(|i| !ring[*i]) else {
        return vec![8];
    };
    let mut runs = Vec::new();
    let mut current = 0;
    for step in 1..=8 {
        if ring[(start + step) % 8] {
            current += 1;
        } else if current > 0 {
            runs.push(current);
            current = 0;
        }
    }
    runs
}
