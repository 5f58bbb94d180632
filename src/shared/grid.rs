use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::CropInstance;

/// A single plot. `None` is an empty cell.
pub type Cell = Option<CropInstance>;

/// Fixed-size rectangular farm. Dimensions are set at construction and never change.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmGrid {
    rows: usize,
    cols: usize,
    /// Row-major, `rows * cols` long.
    cells: Vec<Cell>,
}

impl Default for FarmGrid {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

impl FarmGrid {
    /// Dimensions whose cell count would overflow `usize` give an empty 0x0 grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        match rows.checked_mul(cols) {
            Some(len) => Self {
                rows,
                cols,
                cells: vec![None; len],
            },
            None => Self {
                rows: 0,
                cols: 0,
                cells: Vec::new(),
            },
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    fn index(&self, row: usize, col: usize) -> Option<usize> {
        self.in_bounds(row, col).then(|| row * self.cols + col)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        self.index(row, col).map(|i| &self.cells[i])
    }

    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.index(row, col).map(move |i| &mut self.cells[i])
    }

    /// Iterate `((row, col), cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &Cell)> + '_ {
        let cols = self.cols.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| ((i / cols, i % cols), cell))
    }

    pub fn occupied(&self) -> impl Iterator<Item = ((usize, usize), &CropInstance)> + '_ {
        self.iter()
            .filter_map(|(pos, cell)| cell.as_ref().map(|crop| (pos, crop)))
    }

    pub fn same_shape(&self, other: &FarmGrid) -> bool {
        self.rows == other.rows && self.cols == other.cols
    }

    /// False for deserialized grids whose cell vector doesn't match the dimensions.
    pub fn is_consistent(&self) -> bool {
        self.rows.checked_mul(self.cols) == Some(self.cells.len())
    }
}
