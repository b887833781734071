#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that replays click scripts against a Diplomacy world.

mod script;
mod text;

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use diplomacy_core::Command;
use diplomacy_rendering::{BoardGeometry, FrameInput, RenderingBackend, Scene, SpriteManifest};
use diplomacy_system_input::{ClickInput, InputMapper};
use diplomacy_world::{self as world, query, GameConfig, World};
use glam::Vec2;
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::{
    script::{ScriptLine, ScriptStep},
    text::TextBackend,
};

/// Asset directory assumed when no sprite manifest is supplied.
const DEFAULT_SPRITE_DIR: &str = "assets";

#[derive(Debug, Parser)]
#[command(name = "diplomacy")]
#[command(about = "Replay board clicks against a three-team territory game", version)]
struct CliArgs {
    /// TOML file holding the game configuration
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Board side length, overriding the configuration file
    #[arg(long, value_name = "N")]
    board_size: Option<u32>,

    /// Click script to replay; read from stdin when omitted
    #[arg(long, value_name = "FILE")]
    script: Option<PathBuf>,

    /// Sprite manifest mapping every glyph to its image asset
    #[arg(long, value_name = "FILE")]
    sprites: Option<PathBuf>,

    /// Pixel size of the virtual board addressed by `point` steps
    #[arg(long, default_value_t = 1028.0)]
    extent: f32,

    /// Print every world event as a JSON line
    #[arg(long)]
    events: bool,

    /// Color the active team's entities with ANSI escapes
    #[arg(long)]
    ansi: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Entry point for the Diplomacy command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.verbose);

    let config = load_config(&args)?;
    let sprites = load_sprites(args.sprites.as_deref())?;
    let source = read_script(&args)?;
    let lines = script::parse(&source)?;

    let stdout = io::stdout();
    let backend = TextBackend::new(stdout.lock(), args.ansi, sprites);
    let mut session = Session::new(&config, args.extent, backend)?;
    session.print_events = args.events;
    session.run(&lines)
}

fn init_tracing(verbosity: u8) {
    let default_directive = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(args: &CliArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("failed to parse config at {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    if let Some(board_size) = args.board_size {
        config.board_size = board_size;
    }
    Ok(config)
}

fn load_sprites(path: Option<&Path>) -> Result<SpriteManifest> {
    match path {
        Some(path) => SpriteManifest::from_path(path),
        None => Ok(SpriteManifest::default_layout(Path::new(DEFAULT_SPRITE_DIR))),
    }
}

fn read_script(args: &CliArgs) -> Result<String> {
    match &args.script {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read script at {}", path.display())),
        None => io::read_to_string(io::stdin()).context("failed to read script from stdin"),
    }
}

/// World, scene and backend wired together for a script replay.
struct Session<W> {
    world: World,
    scene: Scene,
    mapper: InputMapper,
    backend: TextBackend<W>,
    print_events: bool,
}

impl<W: Write> Session<W> {
    fn new(config: &GameConfig, extent: f32, backend: TextBackend<W>) -> Result<Self> {
        let world = World::with_config(config)?;
        let geometry = BoardGeometry::new(query::board_size(&world), Vec2::splat(extent))?;
        let scene = Scene::new(
            geometry,
            query::entity_view(&world)
                .into_vec()
                .into_iter()
                .map(|snapshot| (snapshot.position, snapshot.entity)),
            query::current_team(&world),
            query::round(&world),
        );

        Ok(Self {
            world,
            scene,
            mapper: InputMapper::new(),
            backend,
            print_events: false,
        })
    }

    fn run(&mut self, lines: &[ScriptLine]) -> Result<()> {
        self.backend.write_line(query::welcome_banner(&self.world))?;
        self.backend.write_legend()?;
        self.backend.present(&self.scene)?;

        for line in lines {
            self.step(line.step)
                .with_context(|| format!("script line {} failed", line.number))?;
        }
        info!(steps = lines.len(), round = query::round(&self.world), "script finished");
        Ok(())
    }

    fn step(&mut self, step: ScriptStep) -> Result<()> {
        match step {
            ScriptStep::Click(position) => self.click(ClickInput::click_at(position)),
            ScriptStep::Point(point) => {
                let frame = FrameInput {
                    cursor_world_space: Some(point),
                    primary_click: true,
                };
                let cell = self.scene.cursor_cell(&frame);
                if cell.is_none() {
                    debug!(x = point.x, y = point.y, "point lies outside the board");
                }
                self.click(ClickInput::new(frame.primary_click, cell))
            }
            ScriptStep::Board => self.backend.present(&self.scene),
        }
    }

    fn click(&mut self, input: ClickInput) -> Result<()> {
        let mut commands: Vec<Command> = Vec::new();
        let world = &self.world;
        self.mapper.handle(
            input,
            |cell| query::entity_at(world, cell).map(|entity| entity.id()),
            &mut commands,
        );

        for command in commands {
            let mut events = Vec::new();
            if let Err(error) = world::apply(&mut self.world, command, &mut events) {
                warn!(%error, ?command, "command rejected");
                continue;
            }
            if self.print_events {
                for event in &events {
                    self.backend.write_event(event)?;
                }
            }
            self.scene.apply(&events);
        }

        self.backend.present(&self.scene)
    }
}
