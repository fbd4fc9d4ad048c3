mod render;
mod scripted_input;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::*;
use megadungeon::{Engine, EngineConfig, PlayerInput};
use render::{TerminalTiles, ascii_floor, draw_log, draw_map};
use scripted_input::ScriptedInput;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MAP_ORIGIN: Point = Point { x: 0, y: 2 };

#[derive(Default)]
struct Args {
    config: Option<PathBuf>,
    script: Option<PathBuf>,
    seed: Option<u64>,
}

impl Args {
    fn parse() -> Result<Self> {
        let mut args = Self::default();
        let mut raw = std::env::args().skip(1);
        while let Some(flag) = raw.next() {
            let mut value = || raw.next().ok_or_else(|| anyhow!("{flag} needs a value"));
            match flag.as_str() {
                "--config" => args.config = Some(value()?.into()),
                "--script" => args.script = Some(value()?.into()),
                "--seed" => {
                    let seed = value()?;
                    args.seed = Some(seed.parse().with_context(|| format!("bad seed {seed:?}"))?);
                }
                other => bail!("unknown argument {other:?}; expected --config, --script or --seed"),
            }
        }
        Ok(args)
    }
}

struct MegadungeonState {
    engine: Engine<TerminalTiles>,
}

impl GameState for MegadungeonState {
    fn tick(&mut self, ctx: &mut BTerm) {
        match ctx.key {
            Some(VirtualKeyCode::Escape) => ctx.quit(),
            Some(key) => {
                if let Some(input) = key_to_input(key) {
                    self.engine.do_turn(input);
                }
            }
            None => {}
        }

        ctx.cls();
        let status = match self.engine.player_health() {
            Some(health) if self.engine.is_player_alive() => {
                format!("Turn {} | HP {}/{}", self.engine.turn(), health.current, health.max)
            }
            _ => format!("Turn {} | You are dead. Esc to quit.", self.engine.turn()),
        };
        ctx.print_color(0, 0, RGB::named(YELLOW), RGB::named(BLACK), &status);
        draw_map(ctx, &self.engine, MAP_ORIGIN);
        draw_log(ctx, &self.engine.messages());
    }
}

fn key_to_input(key: VirtualKeyCode) -> Option<PlayerInput> {
    let input = match key {
        VirtualKeyCode::Up | VirtualKeyCode::Numpad8 | VirtualKeyCode::K | VirtualKeyCode::W => {
            PlayerInput::Up
        }
        VirtualKeyCode::Down | VirtualKeyCode::Numpad2 | VirtualKeyCode::J | VirtualKeyCode::S => {
            PlayerInput::Down
        }
        VirtualKeyCode::Left | VirtualKeyCode::Numpad4 | VirtualKeyCode::H | VirtualKeyCode::A => {
            PlayerInput::Left
        }
        VirtualKeyCode::Right | VirtualKeyCode::Numpad6 | VirtualKeyCode::L | VirtualKeyCode::D => {
            PlayerInput::Right
        }
        VirtualKeyCode::Numpad7 | VirtualKeyCode::Y => PlayerInput::UpLeft,
        VirtualKeyCode::Numpad9 | VirtualKeyCode::U => PlayerInput::UpRight,
        VirtualKeyCode::Numpad1 | VirtualKeyCode::B => PlayerInput::DownLeft,
        VirtualKeyCode::Numpad3 | VirtualKeyCode::N => PlayerInput::DownRight,
        VirtualKeyCode::Numpad5 | VirtualKeyCode::Period => PlayerInput::None,
        _ => return None,
    };
    Some(input)
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    Ok(config)
}

fn run_script(config: &EngineConfig, script: ScriptedInput) -> Result<()> {
    let mut engine = Engine::new(config, TerminalTiles)?;
    info!(turns = script.len(), "replaying script");
    for input in script {
        engine.do_turn(input);
    }

    print!("{}", ascii_floor(&engine));
    for message in engine.messages() {
        println!("{message}");
    }
    if !engine.is_player_alive() {
        println!("The player died on turn {}.", engine.turn());
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse()?;
    let config = load_config(&args)?;

    if let Some(path) = &args.script {
        let script = ScriptedInput::from_file(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        return run_script(&config, script);
    }

    let engine = Engine::new(&config, TerminalTiles)?;
    let context = BTermBuilder::simple80x50()
        .with_title("megadungeon")
        .build()
        .map_err(|e| anyhow!("terminal setup failed: {e}"))?;
    main_loop(context, MegadungeonState { engine }).map_err(|e| anyhow!("{e}"))
}
