//! Cell-list neighbour search.
//!
//! Space is divided into uniform cubic cells; a point's neighbours within a
//! cutoff no larger than the cell size are found by scanning the 27 cells
//! around it.

use crate::model::atom::distance_sq;
use std::collections::HashMap;

/// Grid-based spatial index over a fixed set of points.
#[derive(Debug)]
pub struct SpatialGrid {
    inv_cell_size: f64,
    cells: HashMap<(i64, i64, i64), Vec<usize>>,
    points: Vec<[f64; 3]>,
}

impl SpatialGrid {
    /// Indexes `points` with cubic cells of edge `cell_size`.
    ///
    /// Queries are exact for any cutoff `<= cell_size`. A non-positive or
    /// non-finite cell size falls back to a single cell, which keeps queries
    /// correct at the cost of a linear scan.
    pub fn new(points: &[[f64; 3]], cell_size: f64) -> Self {
        let inv_cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            1.0 / cell_size
        } else {
            0.0
        };
        let mut grid = Self {
            inv_cell_size,
            cells: HashMap::new(),
            points: points.to_vec(),
        };
        for (idx, pos) in points.iter().enumerate() {
            let cell = grid.cell_coords(*pos);
            grid.cells.entry(cell).or_default().push(idx);
        }
        grid
    }

    fn cell_coords(&self, pos: [f64; 3]) -> (i64, i64, i64) {
        (
            (pos[0] * self.inv_cell_size).floor() as i64,
            (pos[1] * self.inv_cell_size).floor() as i64,
            (pos[2] * self.inv_cell_size).floor() as i64,
        )
    }

    fn cell_size_covers(&self, cutoff: f64) -> bool {
        self.inv_cell_size == 0.0 || cutoff * self.inv_cell_size <= 1.0
    }

    /// Returns `true` if any indexed point lies within `cutoff` of `query`
    /// (inclusive).
    pub fn any_within(&self, query: [f64; 3], cutoff: f64) -> bool {
        let cutoff_sq = cutoff * cutoff;
        if !self.cell_size_covers(cutoff) {
            return self
                .points
                .iter()
                .any(|p| distance_sq(*p, query) <= cutoff_sq);
        }

        let (cx, cy, cz) = self.cell_coords(query);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(indices) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    if indices
                        .iter()
                        .any(|&i| distance_sq(self.points[i], query) <= cutoff_sq)
                    {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Indices of all points within `cutoff` of `query`, ascending.
    pub fn within(&self, query: [f64; 3], cutoff: f64) -> Vec<usize> {
        let cutoff_sq = cutoff * cutoff;
        let mut results: Vec<usize> = if self.cell_size_covers(cutoff) {
            let (cx, cy, cz) = self.cell_coords(query);
            let mut found = Vec::new();
            for dx in -1..=1 {
                for dy in -1..=1 {
                    for dz in -1..=1 {
                        if let Some(indices) = self.cells.get(&(cx + dx, cy + dy, cz + dz)) {
                            found.extend(
                                indices
                                    .iter()
                                    .copied()
                                    .filter(|&i| distance_sq(self.points[i], query) <= cutoff_sq),
                            );
                        }
                    }
                }
            }
            found
        } else {
            (0..self.points.len())
                .filter(|&i| distance_sq(self.points[i], query) <= cutoff_sq)
                .collect()
        };
        results.sort_unstable();
        results
    }
}
