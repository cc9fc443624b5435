use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{self, Event};
use grid_snake::config::{
    DEFAULT_CELL_SIZE_PX, DEFAULT_SPEED_LEVEL, DEFAULT_TILE_COUNT, GridSize, MIN_TILE_COUNT,
    SpeedLevel,
};
use grid_snake::game::GameState;
use grid_snake::input::InputController;
use grid_snake::raster::Canvas;
use grid_snake::renderer;
use grid_snake::score::{self, JsonScoreStore, MemoryScoreStore, ScoreStorage};
use grid_snake::session::{Flow, Session};
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use grid_snake::ui::hud::HudInfo;
use log::info;

const LOG_FILE_NAME: &str = "grid-snake.log";

/// Longest wait for input while no tick is scheduled.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

type DynSession = Session<Box<dyn ScoreStorage>>;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Starting speed level, 1 (slowest) to 5 (fastest).
    #[arg(
        long,
        default_value_t = DEFAULT_SPEED_LEVEL,
        value_parser = clap::value_parser!(u8).range(1..=5)
    )]
    speed: u8,

    /// Cells per board side.
    #[arg(
        long,
        default_value_t = DEFAULT_TILE_COUNT,
        value_parser = clap::value_parser!(u16).range(i64::from(MIN_TILE_COUNT)..=200)
    )]
    tiles: u16,

    /// Canvas pixels per cell side.
    #[arg(
        long,
        default_value_t = DEFAULT_CELL_SIZE_PX,
        value_parser = clap::value_parser!(u16).range(2..=40)
    )]
    cell_size: u16,

    /// High-score storage file. Defaults to the per-user data directory.
    #[arg(long)]
    scores_file: Option<PathBuf>,

    /// Keep the high score in memory only.
    #[arg(long)]
    no_save: bool,

    /// Log destination. Defaults to the per-user data directory.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref());

    let speed = SpeedLevel::new(cli.speed)
        .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
    let grid = GridSize {
        tile_count: cli.tiles,
        cell_size: cli.cell_size,
    };

    let store: Box<dyn ScoreStorage> = if cli.no_save {
        Box::new(MemoryScoreStore::default())
    } else {
        let path = cli.scores_file.unwrap_or_else(score::storage_path);
        info!("high score storage at {}", path.display());
        Box::new(JsonScoreStore::new(path))
    };

    let mut session = Session::new(GameState::new(grid.tile_count), speed, store);

    install_panic_hook();
    let result = run(&mut session, grid);
    info!("exiting with high score {}", session.state().high_score);
    result
}

fn run(session: &mut DynSession, grid: GridSize) -> io::Result<()> {
    let mut terminal_session = TerminalSession::enter()?;
    let terminal = terminal_session.terminal_mut();
    let mut input = InputController::new();
    let mut canvas = Canvas::new(grid.canvas_px(), grid.canvas_px());

    loop {
        if session.take_redraw() {
            let hud = HudInfo {
                grid,
                speed: session.speed(),
            };
            let state = session.state();
            terminal.draw(|frame| renderer::render(frame, &mut canvas, state, &hud))?;
        }

        let timeout = session
            .time_until_tick(Instant::now())
            .map_or(IDLE_POLL_INTERVAL, |due| due.min(IDLE_POLL_INTERVAL));

        if event::poll(timeout)? {
            let control = match event::read()? {
                Event::Key(key) => input.on_key(key),
                Event::Mouse(mouse) => input.on_mouse(mouse),
                Event::Resize(..) => {
                    session.request_redraw();
                    None
                }
                _ => None,
            };

            if let Some(control) = control {
                if session.apply(control, Instant::now()) == Flow::Quit {
                    break;
                }
            }
        }

        session.poll_tick(Instant::now());
    }

    Ok(())
}

/// Sends `log` output to a file; the terminal itself belongs to the UI.
fn init_logging(log_file: Option<&Path>) {
    let path = log_file.map_or_else(|| score::data_dir().join(LOG_FILE_NAME), Path::to_path_buf);

    let file = path
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| File::options().create(true).append(true).open(&path));

    match file {
        Ok(file) => {
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
        Err(error) => {
            // Still before raw mode, so stderr is readable.
            eprintln!("Logging disabled, cannot open {}: {error}", path.display());
        }
    }
}
