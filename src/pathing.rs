// Breadth first search over the open cells of a grid.
//
// Every step between adjacent cells costs the same, so the first time the end cell comes off the
// frontier queue we hold one of the shortest routes to it. There are no edge weights to relax and
// no priority queue is needed.

use std::collections::VecDeque;

use log::debug;

use crate::coordinates::GridCoordinate;
use crate::grid::Grid;
use crate::utils;

/// Shortest route from the grid's start point to its end point.
///
/// `None` when the end cannot be reached, which is a normal outcome for a disconnected maze.
pub fn shortest_path(grid: &Grid) -> Option<Vec<GridCoordinate>> {
    shortest_path_between(grid, grid.start(), grid.end())
}

/// Shortest route between two cells, both ends included.
///
/// Neighbours are explored left, right, up then down, which decides between routes of equal
/// length. A start or end point that is out of bounds or a wall has no route.
pub fn shortest_path_between(grid: &Grid,
                             start: GridCoordinate,
                             end: GridCoordinate)
                             -> Option<Vec<GridCoordinate>> {

    if !grid.is_open(start) || !grid.is_open(end) {
        debug!("No path from {} to {}: an end point is blocked or outside the grid", start, end);
        return None;
    }

    let mut frontier = VecDeque::new();
    frontier.push_back((start, vec![start]));

    // Cells are marked visited as they are queued so no cell is queued twice.
    let mut visited = utils::fnv_hashset(grid.open_cells_count());
    visited.insert(start);

    while let Some((cell_coord, path)) = frontier.pop_front() {

        if cell_coord == end {
            debug!("Found path from {} to {} of {} cells, visited {} cells",
                   start, end, path.len(), visited.len());
            return Some(path);
        }

        for neighbour in grid.neighbours(cell_coord) {
            if grid.is_open(neighbour) && visited.insert(neighbour) {
                let mut neighbour_path = Vec::with_capacity(path.len() + 1);
                neighbour_path.extend_from_slice(&path);
                neighbour_path.push(neighbour);
                frontier.push_back((neighbour, neighbour_path));
            }
        }
    }

    debug!("No path from {} to {}, visited {} cells", start, end, visited.len());
    None
}

/// Does `path` walk from `start` to `end` through adjacent open cells of the grid?
pub fn is_valid_path(grid: &Grid,
                     path: &[GridCoordinate],
                     start: GridCoordinate,
                     end: GridCoordinate)
                     -> bool {
    path.first() == Some(&start) && path.last() == Some(&end) &&
    path.iter().all(|&coord| grid.is_open(coord)) &&
    path.windows(2).all(|step| step[0].manhattan_distance(step[1]) == 1)
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::generators::{self, MazeTemplate};
    use crate::units::{Height, Width};
    use quickcheck::{quickcheck, TestResult};

    fn open_grid(w: usize, h: usize) -> Grid {
        Grid::open(Width(w), Height(h)).unwrap()
    }

    #[test]
    fn open_grid_path_prefers_left_right_before_up_down() {
        let g = open_grid(5, 5);
        let gc = |x, y| GridCoordinate::new(x, y);
        let path = shortest_path(&g).unwrap();
        assert_eq!(path,
                   vec![gc(0, 0), gc(1, 0), gc(2, 0), gc(3, 0), gc(4, 0),
                        gc(4, 1), gc(4, 2), gc(4, 3), gc(4, 4)]);
    }

    #[test]
    fn open_grid_path_length_is_manhattan_distance() {
        for &(w, h) in &[(1, 1), (1, 6), (7, 1), (3, 9), (12, 4)] {
            let g = open_grid(w, h);
            let path = shortest_path(&g).unwrap();
            assert_eq!(path.len(), (w - 1) + (h - 1) + 1);
            assert!(is_valid_path(&g, &path, g.start(), g.end()));
        }
    }

    #[test]
    fn single_cell_grid_path_is_the_cell() {
        let g = open_grid(1, 1);
        assert_eq!(shortest_path(&g), Some(vec![GridCoordinate::new(0, 0)]));
    }

    #[test]
    fn walled_off_end_has_no_path() {
        // ring of walls around the end cell
        let mut g = open_grid(6, 6);
        g.set_cell(3, 3, true);
        g.set_cell(4, 3, true);
        g.set_cell(5, 3, true);
        g.set_cell(3, 4, true);
        g.set_cell(3, 5, true);
        assert!(g.is_passable(-1, -1));
        assert_eq!(shortest_path(&g), None);
    }

    #[test]
    fn blocked_end_points_have_no_path() {
        let g = Grid::from_rows(vec![vec![true, true, true],
                                     vec![true, false, true],
                                     vec![true, true, true]]).unwrap();
        assert!(g.is_passable(1, 1));
        assert_eq!(shortest_path(&g), None);

        let mut g = open_grid(3, 3);
        g.set_cell(-1, -1, true);
        assert_eq!(shortest_path(&g), None);
    }

    #[test]
    fn out_of_grid_end_point_has_no_path() {
        let g = open_grid(3, 3);
        assert_eq!(shortest_path_between(&g, g.start(), GridCoordinate::new(3, 3)), None);
    }

    #[test]
    fn path_goes_around_walls() {
        // 0 0 0
        // 1 1 0
        // 0 0 0
        let g = Grid::from_rows(vec![vec![false, false, false],
                                     vec![true, true, false],
                                     vec![false, false, false]]).unwrap();
        let path = shortest_path_between(&g, GridCoordinate::new(0, 0), GridCoordinate::new(0, 2)).unwrap();
        let gc = |x, y| GridCoordinate::new(x, y);
        assert_eq!(path, vec![gc(0, 0), gc(1, 0), gc(2, 0), gc(2, 1), gc(2, 2), gc(1, 2), gc(0, 2)]);
    }

    #[test]
    fn path_to_self() {
        let g = open_grid(4, 4);
        let mid = GridCoordinate::new(2, 1);
        assert_eq!(shortest_path_between(&g, mid, mid), Some(vec![mid]));
    }

    #[test]
    fn pathing_does_not_change_the_grid() {
        let g = generators::generate(Width(9), Height(9), MazeTemplate::Slalom).unwrap();
        let before = g.clone();
        let _ = shortest_path(&g);
        assert_eq!(before, g);
    }

    #[test]
    fn quickcheck_empty_mazes_have_manhattan_paths() {
        fn p(w: u8, h: u8) -> TestResult {
            let (w, h) = (w as usize % 25 + 1, h as usize % 25 + 1);
            let g = generators::generate(Width(w), Height(h), MazeTemplate::Empty).unwrap();
            match shortest_path(&g) {
                Some(path) => TestResult::from_bool(path.len() == w + h - 1 &&
                                                    is_valid_path(&g, &path, g.start(), g.end())),
                None => TestResult::failed(),
            }
        }
        quickcheck(p as fn(u8, u8) -> TestResult);
    }

    #[test]
    fn quickcheck_slalom_paths_are_valid() {
        fn p(w: u8, h: u8) -> TestResult {
            let (w, h) = (w as usize % 25, h as usize % 25);
            if w < 3 || h < 3 {
                return TestResult::discard();
            }
            let g = generators::generate(Width(w), Height(h), MazeTemplate::Slalom).unwrap();
            match shortest_path(&g) {
                Some(path) => TestResult::from_bool(is_valid_path(&g, &path, g.start(), g.end())),
                None => TestResult::failed(),
            }
        }
        quickcheck(p as fn(u8, u8) -> TestResult);
    }
}
