use std::cmp;
use std::convert::TryFrom;
use std::path::Path;

use error_chain::bail;
use image::{Rgb, RgbImage};
use log::info;

use crate::coordinates::GridCoordinate;
use crate::errors::*;
use crate::grid::Grid;
use crate::grid_displays;

pub const WALL_COLOUR: Rgb<u8> = Rgb([0x22, 0x22, 0x22]);
pub const OPEN_COLOUR: Rgb<u8> = Rgb([0xdd, 0xdd, 0xdd]);
pub const PATH_COLOUR: Rgb<u8> = Rgb([0xff, 0, 0]);
pub const START_COLOUR: Rgb<u8> = Rgb([0, 0xc0, 0]);
pub const END_COLOUR: Rgb<u8> = Rgb([0, 0, 0xff]);

#[derive(Debug)]
pub struct RenderOptions<'path> {
    path: Option<&'path [GridCoordinate]>,
    mark_start_end: bool,
    output_file: Option<&'path Path>,
    cell_side_pixels_length: u8,
}

impl<'path> RenderOptions<'path> {
    pub fn path(&self) -> Option<&'path [GridCoordinate]> {
        self.path
    }

    pub fn output_file(&self) -> Option<&'path Path> {
        self.output_file
    }

    pub fn cell_side_pixels_length(&self) -> u8 {
        self.cell_side_pixels_length
    }
}

pub struct RenderOptionsBuilder<'path> {
    options: RenderOptions<'path>,
}

impl<'path> RenderOptionsBuilder<'path> {
    pub fn new() -> RenderOptionsBuilder<'path> {
        RenderOptionsBuilder {
            options: RenderOptions {
                path: None,
                mark_start_end: false,
                output_file: None,
                cell_side_pixels_length: 10,
            },
        }
    }

    pub fn path(mut self, path: Option<&'path [GridCoordinate]>) -> RenderOptionsBuilder<'path> {
        self.options.path = path;
        self
    }

    pub fn mark_start_end(mut self, on: bool) -> RenderOptionsBuilder<'path> {
        self.options.mark_start_end = on;
        self
    }

    pub fn output_file(mut self, output_file: Option<&'path Path>) -> RenderOptionsBuilder<'path> {
        self.options.output_file = output_file;
        self
    }

    /// Side length of one cell in pixels, at least 1.
    pub fn cell_side_pixels_length(mut self, cell_side_pixels_length: u8) -> RenderOptionsBuilder<'path> {
        self.options.cell_side_pixels_length = cmp::max(1, cell_side_pixels_length);
        self
    }

    pub fn build(self) -> RenderOptions<'path> {
        self.options
    }
}

impl<'path> Default for RenderOptionsBuilder<'path> {
    fn default() -> RenderOptionsBuilder<'path> {
        RenderOptionsBuilder::new()
    }
}

/// Draw the grid as a raster image: dark walls, light open cells and the optional path as a red line
/// joining the centres of its cells.
pub fn render_png(grid: &Grid, options: &RenderOptions) -> Result<RgbImage> {

    let cell_px = u32::from(options.cell_side_pixels_length);
    let (img_width, img_height) = match (image_side(grid.width(), cell_px), image_side(grid.height(), cell_px)) {
        (Some(w), Some(h)) => (w, h),
        _ => bail!(ErrorKind::MalformedGrid(format!("{}x{} grid is too large to render at {} pixels per cell",
                                                    grid.width(), grid.height(), cell_px))),
    };

    let mut img = RgbImage::from_pixel(img_width, img_height, OPEN_COLOUR);

    for (y, row) in grid.rows().iter().enumerate() {
        for (x, &is_wall) in row.iter().enumerate() {
            if is_wall {
                fill_rect(&mut img, x as u32 * cell_px, y as u32 * cell_px, cell_px, cell_px, WALL_COLOUR);
            }
        }
    }

    if let Some(path) = options.path {
        let line_px = cmp::max(1, cell_px / 5);
        let marker_px = cmp::max(1, cell_px / 3);

        for step in path.windows(2) {
            let (ax, ay) = cell_centre(step[0], cell_px);
            let (bx, by) = cell_centre(step[1], cell_px);
            let (left, top) = (cmp::min(ax, bx), cmp::min(ay, by));
            let (right, bottom) = (cmp::max(ax, bx), cmp::max(ay, by));
            fill_rect(&mut img,
                      left.saturating_sub(line_px / 2),
                      top.saturating_sub(line_px / 2),
                      right - left + line_px,
                      bottom - top + line_px,
                      PATH_COLOUR);
        }
        for &coord in path {
            let (cx, cy) = cell_centre(coord, cell_px);
            fill_rect(&mut img,
                      cx.saturating_sub(marker_px / 2),
                      cy.saturating_sub(marker_px / 2),
                      marker_px,
                      marker_px,
                      PATH_COLOUR);
        }
    }

    if options.mark_start_end {
        let inset = cell_px / 4;
        let marker_px = cmp::max(1, cell_px - 2 * inset);
        for &(coord, colour) in &[(grid.start(), START_COLOUR), (grid.end(), END_COLOUR)] {
            fill_rect(&mut img,
                      coord.x as u32 * cell_px + inset,
                      coord.y as u32 * cell_px + inset,
                      marker_px,
                      marker_px,
                      colour);
        }
    }

    Ok(img)
}

/// Render to PNG and write it to the options' output file, which must be set.
///
/// Encoding and write failures are `ErrorKind::Image`.
pub fn save_png(grid: &Grid, options: &RenderOptions) -> Result<()> {
    let path = match options.output_file {
        Some(p) => p,
        None => bail!("No output file set for the maze image"),
    };
    let img = render_png(grid, options)?;
    img.save(path)?;
    info!("Saved '{}' image to {}", grid_displays::title(options.path), path.display());
    Ok(())
}

fn image_side(cells: usize, cell_px: u32) -> Option<u32> {
    let cells = u32::try_from(cells).ok()?;
    cells.checked_mul(cell_px)
}

fn cell_centre(coord: GridCoordinate, cell_px: u32) -> (u32, u32) {
    (coord.x as u32 * cell_px + cell_px / 2, coord.y as u32 * cell_px + cell_px / 2)
}

// Clipped to the image bounds.
fn fill_rect(img: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, colour: Rgb<u8>) {
    let x_end = cmp::min(x.saturating_add(w), img.width());
    let y_end = cmp::min(y.saturating_add(h), img.height());
    for py in y..y_end {
        for px in x..x_end {
            img.put_pixel(px, py, colour);
        }
    }
}
