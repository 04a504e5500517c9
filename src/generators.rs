use std::fmt;
use std::path::Path;
use std::str::FromStr;

use error_chain::bail;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::coordinates::GridCoordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::persistence;
use crate::units::{Height, Width};

/// Starting layout of a generated maze.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum MazeTemplate {
    /// Every cell open.
    Empty,
    /// Every cell a wall, then carved into a perfect maze.
    Slalom,
}

impl MazeTemplate {
    /// Look up a template by its numeric identifier: `0` is empty, `1` is slalom.
    pub fn from_id(id: u32) -> Result<MazeTemplate> {
        match id {
            0 => Ok(MazeTemplate::Empty),
            1 => Ok(MazeTemplate::Slalom),
            _ => bail!(ErrorKind::UnknownTemplate(id.to_string())),
        }
    }

    pub fn id(&self) -> u32 {
        match *self {
            MazeTemplate::Empty => 0,
            MazeTemplate::Slalom => 1,
        }
    }
}

impl Default for MazeTemplate {
    fn default() -> MazeTemplate {
        MazeTemplate::Slalom
    }
}

impl FromStr for MazeTemplate {
    type Err = Error;

    fn from_str(s: &str) -> Result<MazeTemplate> {
        match s.trim().to_lowercase().as_ref() {
            "empty" | "0" => Ok(MazeTemplate::Empty),
            "slalom" | "1" => Ok(MazeTemplate::Slalom),
            _ => bail!(ErrorKind::UnknownTemplate(s.to_string())),
        }
    }
}

impl fmt::Display for MazeTemplate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            MazeTemplate::Empty => write!(f, "empty"),
            MazeTemplate::Slalom => write!(f, "slalom"),
        }
    }
}

/// Generate a maze using the thread local random number generator.
pub fn generate(width: Width, height: Height, template: MazeTemplate) -> Result<Grid> {
    let mut rng = rand::thread_rng();
    generate_with_rng(width, height, template, &mut rng)
}

/// Generate a maze, drawing every random choice from `rng`.
pub fn generate_with_rng<R: Rng + ?Sized>(width: Width,
                                          height: Height,
                                          template: MazeTemplate,
                                          rng: &mut R)
                                          -> Result<Grid> {
    let grid = match template {
        MazeTemplate::Empty => Grid::open(width, height)?,
        MazeTemplate::Slalom => {
            let mut grid = Grid::new(width, height)?;
            recursive_backtracker(&mut grid, rng);
            open_end_corner(&mut grid);
            grid
        }
    };

    debug!("Generated {} maze {}x{} with {} open cells",
           template, grid.width(), grid.height(), grid.open_cells_count());
    Ok(grid)
}

/// Generate a maze and save it as CSV to `file_path`.
pub fn generate_to_file<P: AsRef<Path>>(width: Width,
                                        height: Height,
                                        template: MazeTemplate,
                                        file_path: P)
                                        -> Result<Grid> {
    let grid = generate(width, height, template)?;
    persistence::save_to_file(&grid, file_path)?;
    Ok(grid)
}

// Carving jumps two cells at a time, leaving the cell in between as the wall that may be knocked down.
const CARVE_OFFSETS: [(isize, isize); 4] = [(0, -2), (0, 2), (-2, 0), (2, 0)];

/// Depth first carve of an all wall grid starting at the top left cell.
///
/// Cells at even offsets from the origin form the lattice of rooms, the odd cells between them are
/// the walls knocked down to link two rooms. Every room ends up reachable by exactly one route.
fn recursive_backtracker<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {

    let start = grid.start();
    let mut stack = Vec::with_capacity(grid.size() / 4 + 1);
    stack.push(start);
    grid.set_cell(start.x as isize, start.y as isize, false);

    while let Some(&current) = stack.last() {

        let unvisited = CARVE_OFFSETS.iter()
            .filter_map(|&(dx, dy)| {
                let target = current.offset(dx, dy)?;
                let wall = current.offset(dx / 2, dy / 2)?;
                if grid.cell(target) == Some(true) {
                    Some((target, wall))
                } else {
                    None
                }
            })
            .collect::<SmallVec<[(GridCoordinate, GridCoordinate); 4]>>();

        if let Some(&(target, wall)) = unvisited.choose(rng) {
            grid.set_cell(wall.x as isize, wall.y as isize, false);
            grid.set_cell(target.x as isize, target.y as isize, false);
            stack.push(target);
        } else {
            stack.pop();
        }
    }
}

/// Open the end cell and the two cells beside it so the exit is always joined to the lattice.
/// On a grid only 1 cell wide or high the missing neighbours are skipped rather than wrapped.
fn open_end_corner(grid: &mut Grid) {
    let end = grid.end();
    let corner = [end.offset(0, 0), end.offset(-1, 0), end.offset(0, -1)];
    for cell in corner.iter().flatten() {
        grid.set_cell(cell.x as isize, cell.y as isize, false);
    }
}
