//! 2D bounded grid of cells.
//!
//! Unlike a toroidal world, probing beyond an edge yields "no neighbor":
//! reads return `None` and writes return [`OutOfBounds`].

use crate::entity::{Animal, Occupant};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zoo_core::{Direction, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("position {0} is outside the grid")]
pub struct OutOfBounds(pub Position);

/// A `height x width` matrix of optional occupants, stored row-major
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    pub height: i32,
    pub width: i32,
    cells: Vec<Option<Occupant>>,
}

impl Grid {
    pub fn new(height: i32, width: i32) -> Self {
        let size = height.max(0) as usize * width.max(0) as usize;
        Self {
            height,
            width,
            cells: vec![None; size],
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.height && pos.col >= 0 && pos.col < self.width
    }

    fn index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.row as usize * self.width as usize + pos.col as usize)
        } else {
            None
        }
    }

    pub fn index_to_pos(&self, index: usize) -> Position {
        let width = self.width.max(1) as usize;
        Position::new((index / width) as i32, (index % width) as i32)
    }

    /// Occupant at `pos`; `None` for empty or out-of-bounds cells
    pub fn get(&self, pos: Position) -> Option<&Occupant> {
        self.index(pos).and_then(|i| self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Occupant> {
        let index = self.index(pos)?;
        self.cells[index].as_mut()
    }

    pub fn animal(&self, pos: Position) -> Option<&Animal> {
        self.get(pos).and_then(Occupant::as_animal)
    }

    pub fn animal_mut(&mut self, pos: Position) -> Option<&mut Animal> {
        self.get_mut(pos).and_then(Occupant::as_animal_mut)
    }

    /// Put `occupant` at `pos`, returning whatever was there
    pub fn set(
        &mut self,
        pos: Position,
        occupant: Occupant,
    ) -> Result<Option<Occupant>, OutOfBounds> {
        let index = self.index(pos).ok_or(OutOfBounds(pos))?;
        Ok(self.cells[index].replace(occupant))
    }

    /// Empty the cell at `pos`, returning its previous content
    pub fn clear(&mut self, pos: Position) -> Option<Occupant> {
        let index = self.index(pos)?;
        self.cells[index].take()
    }

    /// In bounds and either empty or dirt
    pub fn is_free(&self, pos: Position) -> bool {
        self.contains(pos) && self.get(pos).map_or(true, Occupant::is_vacant)
    }

    /// Every in-bounds cell within `radius` (square), excluding `pos` itself.
    /// Row-major order.
    pub fn neighbors(&self, pos: Position, radius: i32) -> Vec<(Position, Option<&Occupant>)> {
        let mut neighbors = Vec::new();

        for d_row in -radius..=radius {
            for d_col in -radius..=radius {
                if d_row == 0 && d_col == 0 {
                    continue;
                }

                let neighbor_pos = pos.offset(d_row, d_col);
                if self.contains(neighbor_pos) {
                    neighbors.push((neighbor_pos, self.get(neighbor_pos)));
                }
            }
        }

        neighbors
    }

    /// The eight compass neighbors of `pos`. Edge directions are absent.
    pub fn adjacent(&self, pos: Position) -> Vec<(Direction, Position, Option<&Occupant>)> {
        Direction::all()
            .into_iter()
            .map(|direction| (direction, pos.step(direction)))
            .filter(|(_, target)| self.contains(*target))
            .map(|(direction, target)| (direction, target, self.get(target)))
            .collect()
    }

    /// Free cells within `radius` of `pos`
    pub fn free_cells_around(&self, pos: Position, radius: i32) -> Vec<Position> {
        self.neighbors(pos, radius)
            .into_iter()
            .filter(|(_, occupant)| occupant.map_or(true, |o| o.is_vacant()))
            .map(|(p, _)| p)
            .collect()
    }

    /// Capacity is exhausted when every cell holds something other than dirt
    pub fn is_full(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.as_ref().map_or(false, |o| !o.is_vacant()))
    }

    pub fn positions(&self) -> Vec<Position> {
        (0..self.cells.len()).map(|i| self.index_to_pos(i)).collect()
    }

    /// Iterator over all occupied cells with positions, row-major
    pub fn iter(&self) -> impl Iterator<Item = (Position, &Occupant)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, cell)| cell.as_ref().map(|o| (self.index_to_pos(i), o)))
    }

    pub fn animals(&self) -> impl Iterator<Item = &Animal> + '_ {
        self.cells
            .iter()
            .filter_map(|cell| cell.as_ref().and_then(Occupant::as_animal))
    }

    pub fn count_animals(&self) -> usize {
        self.animals().count()
    }

    /// Rows of cells for renderers
    pub fn rows(&self) -> impl Iterator<Item = &[Option<Occupant>]> + '_ {
        self.cells.chunks(self.width.max(1) as usize)
    }
}
