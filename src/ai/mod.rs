use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{Algorithm2D, BaseMap};
use bracket_random::prelude::RandomNumberGenerator;

use crate::map::OccupancyGrid;

/// A uniformly random walkable neighbour of `from`, if it has any.
pub fn random_step(grid: &OccupancyGrid, from: Point, rng: &mut RandomNumberGenerator) -> Option<Point> {
    if !grid.in_bounds(from) {
        return None;
    }
    let exits = grid.get_available_exits(grid.point2d_to_index(from));
    if exits.is_empty() {
        return None;
    }
    let (idx, _) = exits[rng.range(0, exits.len() as i32) as usize];
    Some(grid.index_to_point2d(idx))
}
