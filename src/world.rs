use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Match tolerance used when a cell group has fewer than two cells.
const FALLBACK_TOLERANCE: f32 = 0.05;

/// A 2D point in normalized arena coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

impl Location {
    pub const fn new(x: f32, y: f32) -> Self {
        Location { x, y }
    }

    /// Euclidean distance to another location.
    pub fn dist(self, other: Location) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Heading in degrees of the straight line from `self` to `other`.
    pub fn direction_to(self, other: Location) -> f32 {
        (other.y - self.y).atan2(other.x - self.x).to_degrees()
    }
}

/// One cell of the arena grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cell {
    pub id: u32,
    pub location: Location,
    pub occluded: bool,
}

/// An ordered group of cells. The free-cell group doubles as the action set:
/// a cell's index in the group is its action identifier.
#[derive(Debug, Clone, Default)]
pub struct CellGroup {
    cells: Vec<Cell>,
    tolerance: f32,
}

impl CellGroup {
    pub fn new(cells: Vec<Cell>, tolerance: f32) -> Self {
        CellGroup { cells, tolerance }
    }

    /// Index of the nearest cell within the match tolerance, if any.
    pub fn find(&self, location: Location) -> Option<u32> {
        let mut best: Option<(u32, f32)> = None;
        for (index, cell) in self.cells.iter().enumerate() {
            let distance = cell.location.dist(location);
            if distance <= self.tolerance && best.is_none_or(|(_, d)| distance < d) {
                best = Some((index as u32, distance));
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn get(&self, index: u32) -> Option<&Cell> {
        self.cells.get(index as usize)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn tolerance(&self) -> f32 {
        self.tolerance
    }
}

/// An arena definition: a named set of cells, some of which may be occluded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl World {
    /// Load a world definition from a JSON file.
    pub fn load(path: &Path) -> Result<Self, WorldError> {
        let content = std::fs::read_to_string(path).map_err(|e| WorldError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| WorldError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Generate a regular grid world with the given cell spacing.
    pub fn grid(rows: usize, cols: usize, spacing: f32) -> Self {
        let mut cells = Vec::with_capacity(rows * cols);
        for row in 0..rows {
            for col in 0..cols {
                cells.push(Cell {
                    id: (row * cols + col) as u32,
                    location: Location::new(col as f32 * spacing, row as f32 * spacing),
                    occluded: false,
                });
            }
        }
        World {
            name: format!("grid_{}x{}", rows, cols),
            cells,
        }
    }

    /// The traversable cells in definition order, with a match tolerance of
    /// half the smallest spacing between them.
    pub fn free_cells(&self) -> CellGroup {
        let cells: Vec<Cell> = self.cells.iter().filter(|c| !c.occluded).cloned().collect();
        let tolerance = match min_spacing(&cells) {
            Some(spacing) => spacing / 2.0,
            None => FALLBACK_TOLERANCE,
        };
        CellGroup::new(cells, tolerance)
    }
}

fn min_spacing(cells: &[Cell]) -> Option<f32> {
    let mut min: Option<f32> = None;
    for (i, a) in cells.iter().enumerate() {
        for b in &cells[i + 1..] {
            let distance = a.location.dist(b.location);
            if min.is_none_or(|m| distance < m) {
                min = Some(distance);
            }
        }
    }
    min
}
