use std::fmt;

use bit_set::BitSet;
use error_chain::bail;
use smallvec::SmallVec;

use crate::coordinates::GridCoordinate;
use crate::errors::*;
use crate::units::{Height, Width};

pub type CoordinateSmallVec = SmallVec<[GridCoordinate; 4]>;

/// Offsets to the 4 adjacent cells: left, right, up, down.
///
/// The order is fixed so that searches choosing between equally short routes are reproducible.
pub const NEIGHBOUR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Rectangular maze surface of wall (`true`) and open (`false`) cells.
///
/// Cells are stored row major in a bit set, a set bit is a wall.
///
/// Raw coordinates given to `get_cell`, `set_cell` and `is_passable` may be negative, meaning
/// "distance from the far edge" (`-1` is the last column or row). They are normalized once by
/// `normalize_coordinate` and never again, so `-1 - width` is out of bounds rather than wrapping twice.
///
/// Accessing a cell outside the grid through the raw coordinate API is a programming error and
/// panics with an out of bounds message. Use `cell` for a checked lookup.
#[derive(Clone)]
pub struct Grid {
    walls: BitSet,
    width: usize,
    height: usize,
    start_point: GridCoordinate,
    end_point: GridCoordinate,
}

impl Grid {
    /// A grid of all walls.
    pub fn new(width: Width, height: Height) -> Result<Grid> {
        let mut grid = Grid::open(width, height)?;
        for index in 0..grid.size() {
            grid.walls.insert(index);
        }
        Ok(grid)
    }

    /// A grid of all open cells.
    pub fn open(width: Width, height: Height) -> Result<Grid> {
        let (Width(w), Height(h)) = (width, height);
        if w == 0 || h == 0 {
            bail!(ErrorKind::MalformedGrid(format!("dimensions must be at least 1x1, got {}x{}", w, h)));
        }
        let size = cells_count(w, h)?;
        Ok(Grid {
            walls: BitSet::with_capacity(size),
            width: w,
            height: h,
            start_point: GridCoordinate::new(0, 0),
            end_point: GridCoordinate::new(w - 1, h - 1),
        })
    }

    /// Build a grid from rows of cells, `true` being a wall.
    pub fn from_rows(rows: Vec<Vec<bool>>) -> Result<Grid> {
        let mut grid = Grid::open(Width(1), Height(1))?;
        grid.set_grid(rows)?;
        Ok(grid)
    }

    /// Replace every cell of the grid. The end point moves to the new bottom right corner.
    ///
    /// The grid is left untouched if `rows` is empty or not rectangular.
    pub fn set_grid(&mut self, rows: Vec<Vec<bool>>) -> Result<()> {
        let height = rows.len();
        let width = match rows.first() {
            Some(first_row) => first_row.len(),
            None => bail!(ErrorKind::MalformedGrid("grid has no rows".to_string())),
        };
        if width == 0 {
            bail!(ErrorKind::MalformedGrid("grid rows have no cells".to_string()));
        }
        if let Some((row_index, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != width) {
            bail!(ErrorKind::MalformedGrid(format!("row {} has {} cells, expected {}",
                                                   row_index, row.len(), width)));
        }

        let mut walls = BitSet::with_capacity(cells_count(width, height)?);
        for (y, row) in rows.iter().enumerate() {
            for (x, &is_wall) in row.iter().enumerate() {
                if is_wall {
                    walls.insert(y * width + x);
                }
            }
        }

        self.walls = walls;
        self.width = width;
        self.height = height;
        self.end_point = GridCoordinate::new(width - 1, height - 1);
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.width * self.height
    }

    /// Entry point of the maze, the top left corner.
    #[inline]
    pub fn start(&self) -> GridCoordinate {
        self.start_point
    }

    /// Exit point of the maze, the bottom right corner.
    #[inline]
    pub fn end(&self) -> GridCoordinate {
        self.end_point
    }

    /// Map negative components to their distance from the far edge by adding the width or height.
    /// No bounds checking is done: a component more negative than the dimension stays negative.
    pub fn normalize_coordinate(&self, x: isize, y: isize) -> (isize, isize) {
        let nx = if x < 0 { x + self.width as isize } else { x };
        let ny = if y < 0 { y + self.height as isize } else { y };
        (nx, ny)
    }

    /// Is the cell at the (possibly negative) coordinate a wall?
    ///
    /// Panics if the normalized coordinate is outside the grid.
    pub fn get_cell(&self, x: isize, y: isize) -> bool {
        let index = self.normalized_index(x, y);
        self.walls.contains(index)
    }

    /// Set the cell at the (possibly negative) coordinate to a wall (`true`) or open (`false`).
    ///
    /// Panics if the normalized coordinate is outside the grid.
    pub fn set_cell(&mut self, x: isize, y: isize, is_wall: bool) {
        let index = self.normalized_index(x, y);
        if is_wall {
            self.walls.insert(index);
        } else {
            self.walls.remove(index);
        }
    }

    /// Checked lookup of a resolved coordinate, `None` when outside the grid.
    pub fn cell(&self, coord: GridCoordinate) -> Option<bool> {
        self.coordinate_index(coord).map(|index| self.walls.contains(index))
    }

    /// Is the raw coordinate inside the grid? Negative values are never in bounds here.
    #[inline]
    pub fn is_in_bounds(&self, x: isize, y: isize) -> bool {
        0 <= x && x < self.width as isize && 0 <= y && y < self.height as isize
    }

    /// Is the cell at the (possibly negative) coordinate open?
    ///
    /// Panics if the normalized coordinate is outside the grid.
    #[inline]
    pub fn is_passable(&self, x: isize, y: isize) -> bool {
        !self.get_cell(x, y)
    }

    /// Checked passability of a resolved coordinate, `false` outside the grid.
    pub fn is_open(&self, coord: GridCoordinate) -> bool {
        self.cell(coord) == Some(false)
    }

    /// Adjacent in bounds cells in left, right, up, down order. They are not necessarily open.
    pub fn neighbours(&self, coord: GridCoordinate) -> CoordinateSmallVec {
        NEIGHBOUR_OFFSETS.iter()
                         .filter_map(|&(dx, dy)| coord.offset(dx, dy))
                         .filter(|neighbour| neighbour.x < self.width && neighbour.y < self.height)
                         .collect()
    }

    pub fn open_cells_count(&self) -> usize {
        self.size() - self.walls.len()
    }

    /// Copy of the cells as rows, `true` being a wall.
    pub fn rows(&self) -> Vec<Vec<bool>> {
        (0..self.height).map(|y| {
                            (0..self.width).map(|x| self.walls.contains(y * self.width + x))
                                           .collect()
                        })
                        .collect()
    }

    fn coordinate_index(&self, coord: GridCoordinate) -> Option<usize> {
        if coord.x < self.width && coord.y < self.height {
            Some(coord.y * self.width + coord.x)
        } else {
            None
        }
    }

    fn normalized_index(&self, x: isize, y: isize) -> usize {
        let (nx, ny) = self.normalize_coordinate(x, y);
        if !self.is_in_bounds(nx, ny) {
            panic!("OutOfBounds: cell ({}, {}) is outside the {}x{} grid", x, y, self.width, self.height);
        }
        ny as usize * self.width + nx as usize
    }
}

// Cell coordinates are handled as `isize` at the raw coordinate boundary, so each side must fit one.
fn cells_count(width: usize, height: usize) -> Result<usize> {
    let fits_isize = |side: usize| side <= isize::MAX as usize;
    match width.checked_mul(height) {
        Some(count) if fits_isize(width) && fits_isize(height) => Ok(count),
        _ => bail!(ErrorKind::MalformedGrid(format!("{}x{} grid has too many cells", width, height))),
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Grid) -> bool {
        self.width == other.width && self.height == other.height &&
        self.start_point == other.start_point && self.end_point == other.end_point &&
        self.walls.iter().eq(other.walls.iter())
    }
}
impl Eq for Grid {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid :: width: {}, height: {}, start: {}, end: {}, walls: {}",
               self.width, self.height, self.start_point, self.end_point, self.walls.len())
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use itertools::Itertools; // a trait
    use quickcheck::{quickcheck, TestResult};

    fn open_grid(w: usize, h: usize) -> Grid {
        Grid::open(Width(w), Height(h)).expect("valid grid dimensions")
    }

    #[test]
    fn new_grid_is_all_walls() {
        let g = Grid::new(Width(4), Height(3)).unwrap();
        assert_eq!(g.width(), 4);
        assert_eq!(g.height(), 3);
        assert_eq!(g.size(), 12);
        assert_eq!(g.open_cells_count(), 0);
        assert!(g.rows().iter().flatten().all(|&is_wall| is_wall));
    }

    #[test]
    fn zero_dimensions_are_malformed() {
        for &(w, h) in &[(0, 3), (3, 0), (0, 0)] {
            match Grid::new(Width(w), Height(h)) {
                Err(Error(ErrorKind::MalformedGrid(_), _)) => {}
                other => panic!("expected MalformedGrid, got {:?}", other),
            }
        }
    }

    #[test]
    fn oversized_dimensions_are_malformed() {
        let huge = 1usize << (usize::BITS / 2);
        for &(w, h) in &[(huge, huge), (usize::MAX, 2), (2, usize::MAX)] {
            match Grid::open(Width(w), Height(h)) {
                Err(Error(ErrorKind::MalformedGrid(_), _)) => {}
                other => panic!("expected MalformedGrid for {}x{}, got {:?}", w, h, other),
            }
            assert!(Grid::new(Width(w), Height(h)).is_err());
        }
    }

    #[test]
    fn start_and_end_points() {
        let g = open_grid(7, 5);
        assert_eq!(g.start(), GridCoordinate::new(0, 0));
        assert_eq!(g.end(), GridCoordinate::new(6, 4));
    }

    #[test]
    fn set_grid_recomputes_end_point() {
        let mut g = open_grid(7, 5);
        g.set_grid(vec![vec![false, true], vec![true, false], vec![false, false]]).unwrap();
        assert_eq!(g.width(), 2);
        assert_eq!(g.height(), 3);
        assert_eq!(g.end(), GridCoordinate::new(1, 2));
        assert_eq!(g.start(), GridCoordinate::new(0, 0));
        assert!(g.get_cell(1, 0));
        assert!(!g.get_cell(1, 1));
    }

    #[test]
    fn set_grid_rejects_ragged_rows_and_keeps_old_cells() {
        let mut g = open_grid(3, 3);
        g.set_cell(1, 1, true);
        let result = g.set_grid(vec![vec![false, false], vec![false]]);
        match result {
            Err(Error(ErrorKind::MalformedGrid(_), _)) => {}
            other => panic!("expected MalformedGrid, got {:?}", other),
        }
        assert_eq!(g.width(), 3);
        assert_eq!(g.end(), GridCoordinate::new(2, 2));
        assert!(g.get_cell(1, 1));
    }

    #[test]
    fn set_grid_rejects_empty_matrices() {
        let mut g = open_grid(2, 2);
        assert!(g.set_grid(vec![]).is_err());
        assert!(g.set_grid(vec![vec![], vec![]]).is_err());
    }

    #[test]
    fn from_rows_matches_rows() {
        let rows = vec![vec![true, false, true], vec![false, false, true]];
        let g = Grid::from_rows(rows.clone()).unwrap();
        assert_eq!(g.rows(), rows);
        assert_eq!(g.open_cells_count(), 3);
    }

    #[test]
    fn normalize_negative_coordinates() {
        let g = open_grid(5, 4);
        assert_eq!(g.normalize_coordinate(-1, -1), (4, 3));
        assert_eq!(g.normalize_coordinate(-2, -1), (3, 3));
        assert_eq!(g.normalize_coordinate(2, 1), (2, 1));
        // normalized exactly once
        assert_eq!(g.normalize_coordinate(-6, -5), (-1, -1));
    }

    #[test]
    fn negative_index_aliases_far_edge() {
        let mut g = open_grid(5, 4);
        g.set_cell(4, 3, true);
        assert_eq!(g.get_cell(-1, -1), g.get_cell(4, 3));
        assert!(g.get_cell(-1, -1));

        g.set_cell(-2, -1, true);
        assert!(g.get_cell(3, 3));
        assert!(!g.is_passable(3, 3));
        assert!(g.is_passable(0, 0));
    }

    #[test]
    #[should_panic(expected = "OutOfBounds")]
    fn get_cell_out_of_bounds_panics() {
        let g = open_grid(3, 3);
        g.get_cell(3, 0);
    }

    #[test]
    #[should_panic(expected = "OutOfBounds")]
    fn doubly_negative_index_does_not_wrap_twice() {
        let g = open_grid(3, 3);
        g.get_cell(-4, 0);
    }

    #[test]
    #[should_panic(expected = "OutOfBounds")]
    fn set_cell_out_of_bounds_panics() {
        let mut g = open_grid(3, 3);
        g.set_cell(0, 5, true);
    }

    #[test]
    fn bounds_use_raw_coordinates() {
        let g = open_grid(3, 2);
        assert!(g.is_in_bounds(0, 0));
        assert!(g.is_in_bounds(2, 1));
        assert!(!g.is_in_bounds(3, 1));
        assert!(!g.is_in_bounds(2, 2));
        assert!(!g.is_in_bounds(-1, 0));
        assert!(!g.is_in_bounds(0, -1));
    }

    #[test]
    fn checked_cell_lookup() {
        let mut g = open_grid(2, 2);
        g.set_cell(1, 0, true);
        assert_eq!(g.cell(GridCoordinate::new(1, 0)), Some(true));
        assert_eq!(g.cell(GridCoordinate::new(0, 0)), Some(false));
        assert_eq!(g.cell(GridCoordinate::new(2, 0)), None);
        assert!(g.is_open(GridCoordinate::new(0, 1)));
        assert!(!g.is_open(GridCoordinate::new(1, 0)));
        assert!(!g.is_open(GridCoordinate::new(9, 9)));
    }

    #[test]
    fn neighbour_cells() {
        let g = open_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[GridCoordinate]| {
            let neighbours: Vec<GridCoordinate> = g.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<GridCoordinate> = expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };
        let gc = |x, y| GridCoordinate::new(x, y);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 8), &[gc(1, 8), gc(0, 7), gc(0, 9)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbour_order_is_left_right_up_down() {
        let g = open_grid(3, 3);
        let gc = |x, y| GridCoordinate::new(x, y);
        assert_eq!(&*g.neighbours(gc(1, 1)), &[gc(0, 1), gc(2, 1), gc(1, 0), gc(1, 2)]);
    }

    #[test]
    fn quickcheck_negative_aliases_match_positive() {
        fn p(w: u8, h: u8, dx: u8, dy: u8) -> TestResult {
            let (w, h) = (w as usize % 20 + 1, h as usize % 20 + 1);
            let (x, y) = (dx as usize % w, dy as usize % h);
            let mut g = open_grid(w, h);
            g.set_cell(x as isize, y as isize, true);

            let neg_x = x as isize - w as isize;
            let neg_y = y as isize - h as isize;
            TestResult::from_bool(g.get_cell(neg_x, neg_y) && g.normalize_coordinate(neg_x, neg_y) == (x as isize, y as isize))
        }
        quickcheck(p as fn(u8, u8, u8, u8) -> TestResult);
    }
}
