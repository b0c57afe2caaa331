//! Terminal runner (default binary).
//!
//! Uses crossterm for input and the framebuffer-based renderer from
//! `blockfall-term`. The engine writes into a [`SceneBuffer`] every frame and
//! the game view draws that table plus the HUD.

use std::fs::File;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{info, warn};

use blockfall::engine::{GameConfig, GameController, GameListener, NullAudio};
use blockfall::input::{handle_key_event, map_key, Command, SoftDropHold};
use blockfall::term::{FrameBuffer, GameView, Hud, SceneBuffer, TerminalRenderer, Viewport};
use blockfall::types::GameAction;

const FRAME: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Falling-block puzzle with bombs and blueprints, in the terminal"
)]
struct Args {
    /// Level index to play
    #[arg(short, long, default_value = "0", value_name = "INDEX")]
    level: u32,

    /// Override the level's piece queue seed
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u32>,

    /// JSON game configuration (timing, animations, levels)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write logs to this file (logging is off otherwise)
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Show the tutorial before the level starts
    #[arg(long)]
    tutorial: bool,
}

/// Logs outcomes; the dialogs themselves are drawn by the game view
struct LogListener;

impl GameListener for LogListener {
    fn on_no_moves_left(&mut self) {
        info!("no moves left");
    }

    fn on_level_completed(&mut self, num_stars: u8) {
        info!("level completed with {} stars", num_stars);
    }
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    let mut builder = match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            let mut builder =
                env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
            builder.target(env_logger::Target::Pipe(Box::new(file)));
            builder
        }
        // Anything on stderr would tear through the alternate screen
        None => env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")),
    };
    builder.init();
    Ok(())
}

fn build_controller(args: &Args) -> Result<GameController> {
    let mut config = match &args.config {
        Some(path) => GameConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    config.show_tutorial |= args.tutorial;

    let mut level = config
        .find_level(args.level)
        .with_context(|| format!("no level with index {}", args.level))?;
    if let Some(seed) = args.seed {
        level.seed = seed;
    }
    info!("starting level {} ({}) seed {}", level.index, level.name, level.seed);

    let mut controller = GameController::new(&level, config).context("building level")?;
    controller.start();
    Ok(controller)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_ref())?;
    let mut controller = build_controller(&args)?;

    let mut term = TerminalRenderer::new();
    term.enter().context("entering terminal")?;

    let result = run(&mut term, &mut controller);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(term: &mut TerminalRenderer, controller: &mut GameController) -> Result<()> {
    let view = GameView::default();
    let mut scene = SceneBuffer::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut audio = NullAudio;
    let mut listener = LogListener;
    let mut soft_drop = SoftDropHold::new();

    let mut last_frame = Instant::now();

    loop {
        // Input with timeout until the next frame.
        let timeout = FRAME.checked_sub(last_frame.elapsed()).unwrap_or_default();
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Release => {
                    if handle_key_event(key) == Some(GameAction::SoftDrop) {
                        soft_drop.release();
                    }
                }
                Event::Key(key) => match map_key(key) {
                    Some(Command::Quit) => return Ok(()),
                    Some(Command::Dismiss) => {
                        controller.dismiss();
                    }
                    Some(Command::Suggest) => {
                        if let Err(err) = controller.play_suggested_move() {
                            warn!("suggested move not played: {}", err);
                        }
                    }
                    Some(Command::Game(GameAction::SoftDrop)) => {
                        soft_drop.press();
                        controller.apply_action(GameAction::SoftDrop);
                    }
                    Some(Command::Game(action)) => {
                        controller.apply_action(action);
                    }
                    None => {}
                },
                Event::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        if last_frame.elapsed() < FRAME {
            continue;
        }
        let dt = last_frame.elapsed().as_secs_f32();
        last_frame = Instant::now();

        controller.set_soft_drop(soft_drop.update(dt));
        controller.frame(dt, &mut scene, &mut audio, &mut listener);

        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let hud = Hud::from_controller(controller);
        view.render_into(&scene, &hud, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;
    }
}
