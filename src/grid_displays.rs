use std::fmt;

use crate::coordinates::GridCoordinate;
use crate::grid::Grid;
use crate::utils::{self, FnvHashSet};

pub const WALL: char = '#';
pub const OPEN: char = ' ';
pub const ON_PATH: char = '.';
pub const START: char = 'S';
pub const END: char = 'E';

/// Title describing whether a path is drawn over the maze.
pub fn title(path: Option<&[GridCoordinate]>) -> &'static str {
    match path {
        Some(p) if !p.is_empty() => "Maze (with path)",
        _ => "Maze (no path)",
    }
}

/// Text view of a grid and an optional path through it.
///
/// A title line is followed by one line per grid row, walls as `#`, open cells as spaces and
/// cells on the path as `.`. When a path is shown its first and last cells are marked `S` and `E`.
pub struct TextRender<'a> {
    grid: &'a Grid,
    path: Option<&'a [GridCoordinate]>,
    on_path_coordinates: FnvHashSet<GridCoordinate>,
}

impl<'a> TextRender<'a> {
    pub fn new(grid: &'a Grid, path: Option<&'a [GridCoordinate]>) -> TextRender<'a> {
        let mut on_path_coordinates = utils::fnv_hashset(path.map_or(0, |p| p.len()));
        if let Some(p) = path {
            on_path_coordinates.extend(p.iter().cloned());
        }
        TextRender {
            grid,
            path,
            on_path_coordinates,
        }
    }

    fn cell_char(&self, coord: GridCoordinate) -> char {
        if let Some(p) = self.path {
            if p.first() == Some(&coord) {
                return START;
            }
            if p.last() == Some(&coord) {
                return END;
            }
        }
        if self.on_path_coordinates.contains(&coord) {
            ON_PATH
        } else if self.grid.is_open(coord) {
            OPEN
        } else {
            WALL
        }
    }
}

impl<'a> fmt::Display for TextRender<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", title(self.path))?;
        for y in 0..self.grid.height() {
            let line: String = (0..self.grid.width())
                .map(|x| self.cell_char(GridCoordinate::new(x, y)))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
