use docopt::Docopt;
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_derive::Deserialize;
use mazes::{
    coordinates::GridCoordinate,
    generators::{self, MazeTemplate},
    grid::Grid,
    grid_displays::TextRender,
    pathing,
    persistence,
    renderers,
    units::{Height, Width},
};
use std::{
    env,
    fs,
    path::Path,
};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [generate] [--width=<w>] [--height=<h>] [--template=<t>] [--seed=<s>] [--save-csv=<path>] [--text-out=<path>] [--image-out=<path>] [--cell-pixels=<n>] [--mark-start-end] [--no-path]
    mazes_driver load <csv> [--text-out=<path>] [--image-out=<path>] [--cell-pixels=<n>] [--mark-start-end] [--no-path]

Options:
    -h --help              Show this screen.
    --width=<w>            The maze width in cells [default: 11].
    --height=<h>           The maze height in cells [default: 11].
    --template=<t>         Starting layout: slalom (carved maze) or empty (all open) [default: slalom].
    --seed=<s>             Seed for the random number generator, for repeatable mazes.
    --save-csv=<path>      Save the generated maze as comma separated 0 (open) / 1 (wall) rows.
    --text-out=<path>      Output file path for a textual rendering of the maze.
    --image-out=<path>     Output file path for an image rendering of the maze. Always PNG format.
    --cell-pixels=<n>      Pixel count for the side of one cell in an image [default: 10] max 255.
    --mark-start-end       Colour the start (green) and end (blue) cells in an image.
    --no-path              Do not search for or draw the path from start to end.

Without --text-out or --image-out the text rendering is printed. Set RUST_LOG to control logging.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_generate: bool,
    cmd_load: bool,
    arg_csv: String,
    flag_width: usize,
    flag_height: usize,
    flag_template: String,
    flag_seed: Option<u64>,
    flag_save_csv: String,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u8,
    flag_mark_start_end: bool,
    flag_no_path: bool,
}

// Errors of the driver wrap the library errors so `chain_err` can add file context.
mod errors {
    use error_chain::*;
    error_chain! {

        links {
            Maze(::mazes::errors::Error, ::mazes::errors::ErrorKind);
        }

        foreign_links {
            DocOptFailure(::docopt::Error);
        }
    }
}
use crate::errors::*;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(ref e) = run() {
        eprintln!("error: {}", e);
        for cause in e.iter().skip(1) {
            eprintln!("caused by: {}", cause);
        }
        ::std::process::exit(1);
    }
}

fn parse_args<I, S>(argv: I) -> Result<MazeArgs>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>
{
    let args = Docopt::new(USAGE).and_then(|d| d.argv(argv).deserialize())?;
    Ok(args)
}

fn run() -> Result<()> {

    // --help prints the usage and exits cleanly, bad arguments are reported like any other error.
    let args = match parse_args(env::args()) {
        Err(Error(ErrorKind::DocOptFailure(ref e), _)) if !e.fatal() => e.exit(),
        other => other?,
    };

    let maze_grid = if args.cmd_load {
        persistence::load_from_file(&args.arg_csv)
            .chain_err(|| format!("Failed to load maze file {}", args.arg_csv))?
    } else {
        generate_maze(&args)?
    };
    info!("Maze is {}x{}, start {} end {}",
          maze_grid.width(), maze_grid.height(), maze_grid.start(), maze_grid.end());

    if !args.flag_save_csv.is_empty() {
        persistence::save_to_file(&maze_grid, &args.flag_save_csv)
            .chain_err(|| format!("Failed to save maze file {}", args.flag_save_csv))?;
    }

    let path_opt = if args.flag_no_path {
        None
    } else {
        let path = pathing::shortest_path(&maze_grid);
        match path {
            Some(ref p) => info!("Shortest path has {} cells", p.len()),
            None => warn!("No path from {} to {}", maze_grid.start(), maze_grid.end()),
        }
        path
    };

    render(&maze_grid, path_opt.as_deref(), &args)
}

fn generate_maze(args: &MazeArgs) -> Result<Grid> {
    let template: MazeTemplate = args.flag_template.parse()?;
    let (width, height) = (Width(args.flag_width), Height(args.flag_height));

    let grid = if let Some(seed) = args.flag_seed {
        let mut rng = StdRng::seed_from_u64(seed);
        generators::generate_with_rng(width, height, template, &mut rng)?
    } else {
        generators::generate(width, height, template)?
    };
    Ok(grid)
}

fn render(maze_grid: &Grid, path: Option<&[GridCoordinate]>, args: &MazeArgs) -> Result<()> {

    let do_text_to_file = !args.flag_text_out.is_empty();
    let do_image = !args.flag_image_out.is_empty();

    if do_text_to_file {
        fs::write(&args.flag_text_out, TextRender::new(maze_grid, path).to_string())
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    } else if !do_image {
        print!("{}", TextRender::new(maze_grid, path));
    }

    if do_image {
        let render_options = renderers::RenderOptionsBuilder::new()
            .path(path)
            .mark_start_end(args.flag_mark_start_end)
            .output_file(Some(Path::new(&args.flag_image_out)))
            .cell_side_pixels_length(args.flag_cell_pixels)
            .build();
        renderers::save_png(maze_grid, &render_options)
            .chain_err(|| format!("Failed to write maze image to {}", args.flag_image_out))?;
    }

    Ok(())
}
