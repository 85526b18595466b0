mod render;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use bracket_terminal::prelude::*;
use chrono::Utc;
use clap::Parser;
use keycrawl::{
    Direction, GameConfig, Phase, Session, data::CLASSES, logging::init_file_logger,
    scripted_input::ScriptedInput,
};
use log::{LevelFilter, info};
use render::{
    draw_class_select, draw_combat, draw_dungeon, draw_end_screen, draw_inventory, draw_log,
    draw_stats,
};

const SCREEN_HEIGHT: i32 = 50;
const LOG_PANEL_START: i32 = SCREEN_HEIGHT - 8;
const COMBAT_PANEL_TOP: i32 = 24;

#[derive(Parser, Debug)]
#[command(name = "keycrawl", version, about = "A small room-and-corridor dungeon crawl")]
struct Cli {
    /// Seed for dungeon generation and combat rolls
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding the default game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run a command script headless and print each `dump` as JSON
    #[arg(long)]
    script: Option<PathBuf>,

    /// Write diagnostics to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

struct KeycrawlState {
    session: Session,
    show_stats: bool,
    show_inventory: bool,
}

impl KeycrawlState {
    fn new(session: Session) -> Self {
        Self {
            session,
            show_stats: true,
            show_inventory: false,
        }
    }

    fn handle_input(&mut self, ctx: &mut BTerm) {
        let Some(key) = ctx.key else {
            return;
        };
        match self.session.phase() {
            Phase::ChoosingClass => {
                if let Some(class) = slot_index(key).and_then(|idx| CLASSES.get(idx)) {
                    self.session.select_class(*class);
                }
            }
            Phase::Exploring => match key {
                VirtualKeyCode::Left => self.step(Direction::Left),
                VirtualKeyCode::Right => self.step(Direction::Right),
                VirtualKeyCode::Up => self.step(Direction::Up),
                VirtualKeyCode::Down => self.step(Direction::Down),
                VirtualKeyCode::C => self.show_stats = !self.show_stats,
                VirtualKeyCode::I => self.show_inventory = !self.show_inventory,
                VirtualKeyCode::R => self.session.restart(),
                other => {
                    if let Some(idx) = slot_index(other) {
                        self.session.use_item(idx);
                    }
                }
            },
            Phase::InCombat => match key {
                VirtualKeyCode::A => {
                    self.session.attack();
                }
                VirtualKeyCode::F => {
                    self.session.flee();
                }
                other => {
                    if let Some(idx) = slot_index(other) {
                        self.session.use_item(idx);
                    }
                }
            },
            Phase::GameOver | Phase::Completed => {
                if key == VirtualKeyCode::R {
                    self.session.restart();
                }
            }
        }
    }

    fn step(&mut self, direction: Direction) {
        self.session.step(direction);
    }

    fn draw_scene(&self, ctx: &mut BTerm) {
        match self.session.phase() {
            Phase::ChoosingClass => draw_class_select(ctx),
            Phase::GameOver | Phase::Completed => draw_end_screen(ctx, &self.session),
            Phase::Exploring | Phase::InCombat => {
                ctx.print_color_centered(
                    1,
                    RGB::named(YELLOW),
                    RGB::named(BLACK),
                    "Keycrawl | arrows move | [C] stats | [I] inventory",
                );
                draw_dungeon(ctx, &self.session);
                if self.show_stats {
                    draw_stats(ctx, &self.session, 54, 3);
                }
                if self.session.phase() == Phase::InCombat {
                    draw_combat(ctx, &self.session, COMBAT_PANEL_TOP);
                } else if self.show_inventory {
                    draw_inventory(ctx, &self.session, 2, COMBAT_PANEL_TOP);
                }
            }
        }
        draw_log(ctx, self.session.messages(), LOG_PANEL_START);
    }
}

impl GameState for KeycrawlState {
    fn tick(&mut self, ctx: &mut BTerm) {
        self.handle_input(ctx);
        self.session
            .tick(Duration::from_secs_f32(ctx.frame_time_ms.max(0.0) / 1000.0));
        ctx.cls();
        self.draw_scene(ctx);
    }
}

fn slot_index(key: VirtualKeyCode) -> Option<usize> {
    let idx = match key {
        VirtualKeyCode::Key1 => 0,
        VirtualKeyCode::Key2 => 1,
        VirtualKeyCode::Key3 => 2,
        VirtualKeyCode::Key4 => 3,
        VirtualKeyCode::Key5 => 4,
        VirtualKeyCode::Key6 => 5,
        VirtualKeyCode::Key7 => 6,
        VirtualKeyCode::Key8 => 7,
        VirtualKeyCode::Key9 => 8,
        _ => return None,
    };
    Some(idx)
}

fn load_config(cli: &Cli) -> Result<GameConfig, keycrawl::ConfigError> {
    let config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run_script(session: &mut Session, path: &Path) -> BError {
    let mut input = ScriptedInput::from_file(path)?;
    info!("running {} scripted commands", input.len());
    for snapshot in input.run(session) {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}

fn main() -> BError {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        init_file_logger(path, cli.log_level)?;
    }

    let config = load_config(&cli)?;
    let seed = cli
        .seed
        .unwrap_or_else(|| Utc::now().timestamp_millis().unsigned_abs());
    info!("starting with seed {seed}");
    let mut session = Session::new(config, seed);

    if let Some(script) = &cli.script {
        return run_script(&mut session, script);
    }

    let context = BTermBuilder::simple80x50()
        .with_title("Keycrawl")
        .build()?;
    main_loop(context, KeycrawlState::new(session))
}
