#![deny(clippy::all)]
#![forbid(unsafe_code)]

//! Grid state and rule engine for Conway's Game of Life on a bounded grid.
//!
//! A [`Generation`] is one complete grid snapshot. [`SharedGrid`] owns the
//! current generation and publishes each new one whole, so readers on other
//! threads only ever see complete generations. [`Painter`] turns a generation
//! into an RGBA frame.

mod config;
mod error;
mod glider;
mod paint;
mod shared;

pub use config::{GridConfig, DEFAULT_HEIGHT, DEFAULT_SCALE, DEFAULT_WIDTH};
pub use error::LifeError;
pub use glider::Direction;
pub use paint::{Color, Painter, Palette};
pub use shared::SharedGrid;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::ops::{Index, IndexMut};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Dead,
    Alive,
}

impl Cell {
    pub fn is_alive(self) -> bool {
        self == Cell::Alive
    }

    /// Applies the B3/S23 rule to this cell given its live neighbor count.
    pub fn next(self, live_neighbors: u32) -> Cell {
        match (self, live_neighbors) {
            (Cell::Alive, 2..=3) => Cell::Alive,
            (Cell::Dead, 3) => Cell::Alive,
            _ => Cell::Dead,
        }
    }
}

/// A full W×H snapshot of the grid. Once published through [`SharedGrid`] it
/// is never mutated in place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Generation {
    width: u32,
    height: u32,
    cells: Vec<Cell>,
}

impl Generation {
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            cells: vec![Cell::Dead; width as usize * height as usize],
        }
    }

    /// Builds a generation with exactly the given cells alive.
    ///
    /// Panics if a location lies outside the grid.
    pub fn with_live_cells<I>(width: u32, height: u32, live: I) -> Self
    where
        I: IntoIterator<Item = Loc>,
    {
        let mut result = Self::new(width, height);
        for loc in live {
            result[loc] = Cell::Alive;
        }
        result
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn cells_iter(&self) -> impl DoubleEndedIterator<Item = &Cell> + Clone {
        self.cells.iter()
    }

    pub fn cells_iter_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// The cell at `loc`, or `Cell::Dead` anywhere outside the grid.
    pub fn cell(&self, loc: Loc) -> Cell {
        self.get(loc).unwrap_or(Cell::Dead)
    }

    pub fn get(&self, loc: Loc) -> Option<Cell> {
        loc.grid_index(self.width, self.height)
            .map(|index| self.cells[index])
    }

    fn get_mut(&mut self, loc: Loc) -> Option<&mut Cell> {
        loc.grid_index(self.width, self.height)
            .map(|index| &mut self.cells[index])
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn live_count(&self) -> usize {
        self.cells_iter().filter(|cell| cell.is_alive()).count()
    }

    pub fn live_cells(&self) -> impl Iterator<Item = Loc> + '_ {
        let width = self.width;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_alive())
            .map(move |(index, _)| Loc::from_index(index, width))
    }

    /// Computes the following generation into a fresh all-dead buffer.
    pub fn next(&self) -> Generation {
        let mut result = Generation::new(self.width, self.height);
        for y in 0..self.height {
            for x in 0..self.width {
                let loc = Loc::new(x, y);
                let neighbors = Neighborhood::new(self, loc).num_live_neighbors();
                result[loc] = self[loc].next(neighbors);
            }
        }
        result
    }
}

impl Index<Loc> for Generation {
    type Output = Cell;

    fn index(&self, loc: Loc) -> &Self::Output {
        loc.grid_index(self.width, self.height)
            .map(|index| &self.cells[index])
            .unwrap_or_else(|| panic!("Index location {}, {} out of bounds", loc.x, loc.y))
    }
}

impl IndexMut<Loc> for Generation {
    fn index_mut(&mut self, loc: Loc) -> &mut Self::Output {
        self.get_mut(loc)
            .unwrap_or_else(|| panic!("Index_mut location {}, {} out of bounds", loc.x, loc.y))
    }
}

/// The 3×3 block around a cell. Positions past the grid edge are absent and
/// read as dead; there is no wrap-around.
pub struct Neighborhood<'a> {
    cells: &'a Generation,
    rows: [Option<u32>; 3],
    cols: [Option<u32>; 3],
}

impl<'a> Neighborhood<'a> {
    pub fn new(cells: &'a Generation, center: Loc) -> Self {
        let (row_above, row_below) = Self::adjacent_indexes(center.y, cells.height());
        let (col_left, col_right) = Self::adjacent_indexes(center.x, cells.width());
        Self {
            cells,
            rows: [row_above, Some(center.y), row_below],
            cols: [col_left, Some(center.x), col_right],
        }
    }

    pub fn num_live_neighbors(&self) -> u32 {
        let mut result = 0;
        self.for_neighbor_cells(|neighbor| {
            if neighbor.is_alive() {
                result += 1;
            }
        });
        result
    }

    pub fn for_neighbor_cells<F>(&self, mut f: F)
    where
        F: FnMut(Cell),
    {
        self.for_cell(0, 0, &mut f);
        self.for_cell(0, 1, &mut f);
        self.for_cell(0, 2, &mut f);

        self.for_cell(1, 0, &mut f);
        self.for_cell(1, 2, &mut f);

        self.for_cell(2, 0, &mut f);
        self.for_cell(2, 1, &mut f);
        self.for_cell(2, 2, &mut f);
    }

    fn for_cell<F>(&self, row: usize, col: usize, f: &mut F)
    where
        F: FnMut(Cell),
    {
        let cell = match (self.rows[row], self.cols[col]) {
            (Some(y), Some(x)) => self.cells[Loc::new(x, y)],
            _ => Cell::Dead,
        };
        f(cell);
    }

    fn adjacent_indexes(cell_index: u32, max: u32) -> (Option<u32>, Option<u32>) {
        (
            cell_index.checked_sub(1),
            Some(cell_index + 1).filter(|&index| index < max),
        )
    }
}

/// A grid coordinate: `x` is the column, `y` the row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Loc {
    pub x: u32,
    pub y: u32,
}

impl Loc {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    fn from_index(index: usize, width: u32) -> Self {
        let width = width as usize;
        Self::new((index % width) as u32, (index / width) as u32)
    }

    pub fn grid_index(&self, width: u32, height: u32) -> Option<usize> {
        if self.x < width && self.y < height {
            Some(self.y as usize * width as usize + self.x as usize)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub struct Random {
    rng: SmallRng,
}

impl Random {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// True with probability `1 / n`. `n` must be nonzero.
    pub fn one_in(&mut self, n: u32) -> bool {
        self.rng.random_ratio(1, n)
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}
