use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use bracket_pathfinding::prelude::{DistanceAlg, field_of_view};

use super::OccupancyGrid;

/// Cells visible from `origin` within a circle of `range`.
///
/// The raw field of view is cast half again as far as `range`, then cut down
/// to the circle.
pub fn visible_cells(grid: &OccupancyGrid, origin: Point, range: i32) -> HashSet<Point> {
    if range < 0 || !grid.in_bounds(origin) {
        return HashSet::new();
    }
    let raw_range = (range as f32 * 1.5) as i32;
    field_of_view(origin, raw_range, grid)
        .into_iter()
        .filter(|point| grid.in_bounds(*point) && within_circle(origin, *point, range))
        .collect()
}

pub fn within_circle(center: Point, point: Point, radius: i32) -> bool {
    DistanceAlg::PythagorasSquared.distance2d(center, point) <= (radius * radius) as f32
}

/// Every in-bounds cell of the circle, ignoring walls.
pub fn circle_cells(grid: &OccupancyGrid, center: Point, radius: i32) -> HashSet<Point> {
    let mut cells = HashSet::new();
    for y in center.y - radius..=center.y + radius {
        for x in center.x - radius..=center.x + radius {
            let point = Point::new(x, y);
            if grid.in_bounds(point) && within_circle(center, point, radius) {
                cells.insert(point);
            }
        }
    }
    cells
}
