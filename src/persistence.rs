//! Grid files: one comma separated line per grid row, `1` for a wall and `0` for an open cell.

use std::fs;
use std::path::Path;

use error_chain::bail;
use itertools::Itertools;
use log::info;

use crate::errors::*;
use crate::grid::Grid;

/// Parse grid text. Fields may be padded with whitespace and blank lines are ignored.
///
/// Line and column numbers in errors are 1-based.
pub fn parse_grid(data: &str) -> Result<Grid> {

    let mut rows: Vec<Vec<bool>> = vec![];

    for (line_index, line) in data.lines().enumerate() {
        let line_number = line_index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let row = line.split(',')
                      .enumerate()
                      .map(|(column_index, field)| match field.trim() {
                          "1" => Ok(true),
                          "0" => Ok(false),
                          other => Err(Error::from(ErrorKind::InvalidCellValue(line_number,
                                                                               column_index + 1,
                                                                               other.to_string()))),
                      })
                      .collect::<Result<Vec<bool>>>()?;

        if let Some(first_row) = rows.first() {
            if first_row.len() != row.len() {
                bail!(ErrorKind::RaggedRow(line_number, first_row.len(), row.len()));
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        bail!(ErrorKind::MalformedGrid("grid data has no rows".to_string()));
    }

    Grid::from_rows(rows)
}

/// Read and parse a grid file. Read failures are `ErrorKind::Io`, bad contents keep their parse error kind.
pub fn load_from_file<P: AsRef<Path>>(file_path: P) -> Result<Grid> {
    let data = fs::read_to_string(file_path)?;
    parse_grid(&data)
}

/// Grid as text, every row terminated by a newline.
pub fn grid_to_csv(grid: &Grid) -> String {
    let mut csv = String::with_capacity(grid.size() * 2);
    for row in grid.rows() {
        csv.push_str(&row.iter().map(|&is_wall| if is_wall { "1" } else { "0" }).join(","));
        csv.push('\n');
    }
    csv
}

pub fn save_to_file<P: AsRef<Path>>(grid: &Grid, file_path: P) -> Result<()> {
    let path = file_path.as_ref();
    fs::write(path, grid_to_csv(grid))?;
    info!("Saved {}x{} maze to {}", grid.width(), grid.height(), path.display());
    Ok(())
}
