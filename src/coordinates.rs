use std::fmt;

/// A resolved, non-negative cell position. `x` is the column, `y` the row.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct GridCoordinate {
    pub x: usize,
    pub y: usize,
}

impl GridCoordinate {
    pub fn new(x: usize, y: usize) -> GridCoordinate {
        GridCoordinate { x, y }
    }

    /// Offset this coordinate, `None` if either component would go below zero.
    pub fn offset(&self, dx: isize, dy: isize) -> Option<GridCoordinate> {
        let x = offset_component(self.x, dx)?;
        let y = offset_component(self.y, dy)?;
        Some(GridCoordinate { x, y })
    }

    /// Steps between two coordinates moving only horizontally and vertically.
    pub fn manhattan_distance(&self, other: GridCoordinate) -> usize {
        diff(self.x, other.x) + diff(self.y, other.y)
    }
}

impl From<(usize, usize)> for GridCoordinate {
    fn from(x_y_pair: (usize, usize)) -> GridCoordinate {
        GridCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

impl fmt::Display for GridCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

fn offset_component(value: usize, delta: isize) -> Option<usize> {
    if delta < 0 {
        value.checked_sub(delta.unsigned_abs())
    } else {
        value.checked_add(delta as usize)
    }
}

fn diff(a: usize, b: usize) -> usize {
    if a > b { a - b } else { b - a }
}
