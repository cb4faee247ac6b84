/// Obsidian Terminal Viewer
///
/// Renders the demo cube, or an STL model given on the command line.
/// Controls:
///   - W/S / Up/Down: Move the camera forward/back
///   - A/D / Left/Right: Move the camera sideways
///   - R/F: Move the camera up/down
///   - Q/ESC: Quit

use obsidian_core::{stl, Object};
use obsidian_terminal::{config::USAGE, AppError, Config, TerminalApp};
use std::fs;

fn load_object(config: &Config) -> Result<Object, AppError> {
    match &config.model {
        Some(path) => {
            log::info!("loading model {}", path.display());
            let data = fs::read(path)?;
            let object = stl::parse_stl(&data)?;
            log::info!("loaded {} facets", object.len());
            Ok(object)
        }
        None => Ok(Object::cube(2.0)),
    }
}

fn run() -> Result<(), AppError> {
    let config = Config::from_args(std::env::args().skip(1))?;
    if config.show_help {
        println!("{}", USAGE);
        return Ok(());
    }

    let object = load_object(&config)?;
    let mut app = TerminalApp::new(object, &config)?;
    app.run()
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(err) = run() {
        eprintln!("error: {}", err);
        if matches!(err, AppError::Config(_)) {
            eprintln!("{}", USAGE);
        }
        std::process::exit(1);
    }
}
