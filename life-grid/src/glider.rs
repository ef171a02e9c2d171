use crate::{Cell, Generation, LifeError, Loc};
use std::fmt;

/// Glider orientation, named by the diagonal it travels along.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    #[default]
    UpLeft,
    DownLeft,
    DownRight,
    UpRight,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::DownLeft,
        Direction::DownRight,
        Direction::UpRight,
    ];

    pub fn index(self) -> u8 {
        match self {
            Direction::UpLeft => 0,
            Direction::DownLeft => 1,
            Direction::DownRight => 2,
            Direction::UpRight => 3,
        }
    }

    pub fn next(self) -> Direction {
        Self::ALL[(self.index() as usize + 1) % Self::ALL.len()]
    }

    /// The five live cells of the pattern, relative to its center.
    pub fn offsets(self) -> [(i32, i32); 5] {
        match self {
            Direction::UpLeft => [(-1, -1), (0, -1), (1, -1), (-1, 0), (0, 1)],
            Direction::DownLeft => [(-1, -1), (-1, 0), (-1, 1), (0, 1), (1, 0)],
            Direction::DownRight => [(1, -1), (1, 0), (1, 1), (0, 1), (-1, 0)],
            Direction::UpRight => [(-1, -1), (0, -1), (1, -1), (1, 0), (0, 1)],
        }
    }

    /// Displacement after one full four-generation period.
    pub fn travel(self) -> (i32, i32) {
        match self {
            Direction::UpLeft => (-1, -1),
            Direction::DownLeft => (-1, 1),
            Direction::DownRight => (1, 1),
            Direction::UpRight => (1, -1),
        }
    }
}

impl TryFrom<i64> for Direction {
    type Error = LifeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
            .ok_or(LifeError::InvalidDirection(value))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::UpLeft => "up-left",
            Direction::DownLeft => "down-left",
            Direction::DownRight => "down-right",
            Direction::UpRight => "up-right",
        };
        write!(f, "{} ({})", self.index(), name)
    }
}

impl Generation {
    /// Sets the glider's five cells alive around `(x, y)`.
    ///
    /// The center must be at least one cell away from every edge. Otherwise
    /// nothing is written and `GliderOutOfBounds` is returned.
    pub fn stamp_glider(&mut self, x: i64, y: i64, direction: Direction) -> Result<(), LifeError> {
        let center = self.glider_center(x, y).ok_or(LifeError::GliderOutOfBounds {
            x,
            y,
            width: self.width(),
            height: self.height(),
        })?;
        for (dx, dy) in direction.offsets() {
            let loc = Loc::new(
                center.x.wrapping_add_signed(dx),
                center.y.wrapping_add_signed(dy),
            );
            self[loc] = Cell::Alive;
        }
        Ok(())
    }

    fn glider_center(&self, x: i64, y: i64) -> Option<Loc> {
        let fits = |value: i64, size: u32| 1 <= value && value <= i64::from(size) - 2;
        if fits(x, self.width()) && fits(y, self.height()) {
            Some(Loc::new(x as u32, y as u32))
        } else {
            None
        }
    }
}
