//! # Minion Arena Headless
//!
//! Runs matches without a browser: a simulated clock drives
//! [`Session::tick`], a scripted player feeds pointer input, and every frame
//! is presented to a recording backend.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p arena-headless -- --seed 7 --matches 3 --placement-ms 500
//! RUST_LOG_FORMAT=json cargo run -p arena-headless -- --config match.json
//! ```
//!
//! ## Architecture
//!
//! - `CliArgs` - Command-line arguments parsed with clap
//! - `HeadlessConfig` - Session and compositor configuration plus run limits
//! - `Simulation` - The frame loop and the scripted human player

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Context;
use arena_core::{
    FrameLayers, InputEvent, NodeId, Phase, Point, Session, SessionConfig, TreeHost, HUMAN,
};
use arena_renderer::{BackendType, Compositor, RecordingBackend, RecordingHandle, RendererConfig};
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Command-line arguments for arena-headless.
#[derive(Debug, Clone, Parser)]
#[command(name = "arena-headless")]
#[command(about = "Run Minion Arena matches on a simulated clock")]
#[command(version)]
pub struct CliArgs {
    /// RNG seed for the session and the scripted player
    #[arg(long, env = "ARENA_SEED")]
    pub seed: Option<u64>,

    /// Number of matches to play to completion
    #[arg(long, env = "ARENA_MATCHES", default_value = "1")]
    pub matches: u32,

    /// Stop after this many frames even if matches are unfinished
    #[arg(long, env = "ARENA_FRAMES", default_value = "200000")]
    pub frames: u64,

    /// Simulated milliseconds per frame
    #[arg(long, env = "ARENA_FRAME_MS", default_value = "16")]
    pub frame_ms: u64,

    /// Placement countdown in milliseconds
    #[arg(long, env = "ARENA_PLACEMENT_MS")]
    pub placement_ms: Option<u64>,

    /// Viewport width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Viewport height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// JSON session configuration file
    #[arg(long, env = "ARENA_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Everything a headless run needs.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Session configuration.
    pub session: SessionConfig,
    /// Compositor configuration.
    pub renderer: RendererConfig,
    /// Matches to complete.
    pub matches: u32,
    /// Frame cap.
    pub max_frames: u64,
    /// Simulated time per frame.
    pub frame: Duration,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            renderer: RendererConfig {
                preferred_backend: BackendType::Recording,
                ..RendererConfig::default()
            },
            matches: 1,
            max_frames: 200_000,
            frame: Duration::from_millis(16),
        }
    }
}

impl HeadlessConfig {
    /// Build the run configuration: the JSON file (if any) first, then the
    /// command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the resulting session
    /// configuration is invalid.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn from_args(args: CliArgs) -> anyhow::Result<Self> {
        let mut session = match &args.config {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                SessionConfig::from_json(&json)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => SessionConfig::default(),
        };
        if args.seed.is_some() {
            session.seed = args.seed;
        }
        if let Some(ms) = args.placement_ms {
            session.placement_ms = ms;
        }
        if let Some(width) = args.width {
            session.width = width as f32;
        }
        if let Some(height) = args.height {
            session.height = height as f32;
        }
        session.validate().context("invalid session configuration")?;
        anyhow::ensure!(args.frame_ms > 0, "--frame-ms must be positive");

        let renderer = RendererConfig {
            preferred_backend: BackendType::Recording,
            width: session.width as u32,
            height: session.height as u32,
            ..RendererConfig::default()
        };
        Ok(Self {
            session,
            renderer,
            matches: args.matches,
            max_frames: args.frames,
            frame: Duration::from_millis(args.frame_ms),
        })
    }
}

/// Result of one completed match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Name of the surviving player.
    pub winner: String,
    /// Combat rounds fought.
    pub rounds: u32,
    /// Frame on which the match ended.
    pub ended_at_frame: u64,
}

/// Totals of a finished run.
#[derive(Debug, Clone)]
pub struct Summary {
    /// Frames simulated.
    pub frames: u64,
    /// Simulated time elapsed.
    pub elapsed: Duration,
    /// Completed matches in order.
    pub matches: Vec<MatchRecord>,
    /// Whether the frame cap stopped the run early.
    pub truncated: bool,
}

impl Summary {
    /// Summary as a JSON value for structured output.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "frames": self.frames,
            "elapsed_ms": self.elapsed.as_millis(),
            "truncated": self.truncated,
            "matches": self.matches.iter().map(|m| serde_json::json!({
                "winner": m.winner,
                "rounds": m.rounds,
                "ended_at_frame": m.ended_at_frame,
            })).collect::<Vec<_>>(),
        })
    }
}

/// Frame loop with a scripted human player.
pub struct Simulation {
    config: HeadlessConfig,
    session: Session,
    compositor: Compositor,
    surfaces: RecordingHandle,
    layers: FrameLayers,
    rng: StdRng,
    clock: Duration,
    frames: u64,
    rounds: u32,
    last_phase: Phase,
    records: Vec<MatchRecord>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("frames", &self.frames)
            .field("clock", &self.clock)
            .field("phase", &self.session.phase())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Create a simulation.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be built.
    pub fn new(config: HeadlessConfig) -> anyhow::Result<Self> {
        let session = Session::new(config.session.clone()).context("building session")?;
        let backend = RecordingBackend::new(config.renderer.width, config.renderer.height);
        let surfaces = backend.handle();
        let compositor = Compositor::with_backend(Box::new(backend), config.renderer.clone());
        let rng = config
            .session
            .seed
            .map_or_else(StdRng::from_entropy, |seed| StdRng::seed_from_u64(seed ^ 0x5eed));
        let last_phase = session.phase();
        Ok(Self {
            config,
            session,
            compositor,
            surfaces,
            layers: FrameLayers::new(),
            rng,
            clock: Duration::ZERO,
            frames: 0,
            rounds: 0,
            last_phase,
            records: Vec::new(),
        })
    }

    /// The session being driven.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The recording backend's surfaces.
    #[must_use]
    pub fn surfaces(&self) -> RecordingHandle {
        Rc::clone(&self.surfaces)
    }

    /// Frames simulated so far.
    #[must_use]
    pub const fn frames(&self) -> u64 {
        self.frames
    }

    /// Completed matches so far.
    #[must_use]
    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    /// Run until the configured number of matches finished or the frame cap
    /// is hit.
    ///
    /// # Errors
    ///
    /// Returns an error if presenting a frame fails.
    pub fn run(&mut self) -> anyhow::Result<Summary> {
        tracing::info!(
            matches = self.config.matches,
            max_frames = self.config.max_frames,
            frame_ms = self.config.frame.as_millis(),
            "headless run started"
        );
        while self.session.matches_completed() < self.config.matches
            && self.frames < self.config.max_frames
        {
            self.step()?;
        }
        let truncated = self.session.matches_completed() < self.config.matches;
        if truncated {
            tracing::warn!(frames = self.frames, "frame cap reached before all matches finished");
        }
        Ok(Summary {
            frames: self.frames,
            elapsed: self.clock,
            matches: self.records.clone(),
            truncated,
        })
    }

    /// Simulate one frame: scripted input, tick, render, present.
    ///
    /// # Errors
    ///
    /// Returns an error if presenting the frame fails.
    pub fn step(&mut self) -> anyhow::Result<()> {
        self.play();
        self.session.tick(self.clock);
        self.observe();

        self.session.render(&mut self.layers);
        self.compositor.present(&self.layers)?;

        self.frames += 1;
        self.clock += self.config.frame;
        Ok(())
    }

    fn observe(&mut self) {
        let phase = self.session.phase();
        if phase == self.last_phase {
            return;
        }
        if self.last_phase == Phase::Placement {
            self.rounds += 1;
        }
        if phase == Phase::MatchOver {
            let winner = self
                .session
                .players()
                .iter()
                .find(|p| !p.is_defeated())
                .map_or_else(|| "nobody".to_string(), |p| p.name.clone());
            tracing::info!(%winner, rounds = self.rounds, frame = self.frames, "match recorded");
            self.records.push(MatchRecord {
                winner,
                rounds: self.rounds,
                ended_at_frame: self.frames,
            });
            self.rounds = 0;
        }
        self.last_phase = phase;
    }

    fn play(&mut self) {
        match self.session.phase() {
            Phase::Intro => {
                if let Some(button) = self.session.start_button() {
                    self.click_node(button);
                }
            }
            Phase::Placement => self.place_one(),
            Phase::Draft => self.draft_one(),
            Phase::Combat | Phase::MatchOver => {}
        }
    }

    /// Move one reserve minion onto a random free board cell.
    fn place_one(&mut self) {
        let tree = self.session.tree();
        let occupant = |slot: &NodeId| tree.slot(*slot).and_then(arena_core::Slot::occupant);
        let tokens: Vec<NodeId> = self
            .session
            .reserve_slots(HUMAN)
            .iter()
            .filter_map(occupant)
            .collect();
        let free: Vec<NodeId> = self
            .session
            .board_cells(HUMAN)
            .iter()
            .copied()
            .filter(|cell| occupant(cell).is_none())
            .collect();
        let (Some(&token), Some(&cell)) = (tokens.choose(&mut self.rng), free.choose(&mut self.rng))
        else {
            return;
        };
        self.drag_node(token, cell);
    }

    /// Take a random offer, or skip the turn when none can be taken.
    fn draft_one(&mut self) {
        let Some(round) = self.session.draft() else {
            return;
        };
        if round.picker() != Some(HUMAN) {
            return;
        }
        let tree = self.session.tree();
        let free = round
            .reserve_slots(HUMAN)
            .iter()
            .copied()
            .find(|&slot| tree.slot(slot).is_some_and(|s| !s.is_occupied()));
        let offer = round
            .offers()
            .choose(&mut self.rng)
            .and_then(|&id| self.session.minion(id))
            .map(|m| m.token);
        let skip = round.skip_button();
        match (offer, free, round.can_pick(self.session.config())) {
            (Some(token), Some(slot), true) => self.drag_node(token, slot),
            _ => self.click_node(skip),
        }
    }

    fn click_node(&mut self, node: NodeId) {
        if let Some(at) = self.session.node_center(node) {
            self.click(at);
        }
    }

    fn drag_node(&mut self, node: NodeId, target: NodeId) {
        let (Some(from), Some(to)) = (self.session.node_center(node), self.session.node_center(target))
        else {
            return;
        };
        self.click(from);
        self.session.handle_input(InputEvent::pointer_move(to.x, to.y));
        self.click(to);
    }

    fn click(&mut self, at: Point) {
        self.session.handle_input(InputEvent::pointer_move(at.x, at.y));
        self.session.handle_input(InputEvent::primary(at.x, at.y));
    }
}

/// Headless driver version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("arena-headless").chain(args.iter().copied()))
            .expect("parse")
    }

    #[test]
    fn flags_override_defaults() {
        let config = HeadlessConfig::from_args(parse(&[
            "--seed",
            "7",
            "--matches",
            "2",
            "--frame-ms",
            "40",
            "--placement-ms",
            "500",
            "--width",
            "800",
        ]))
        .expect("config");
        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.session.placement_ms, 500);
        assert!((config.session.width - 800.0).abs() < f32::EPSILON);
        assert_eq!(config.renderer.width, 800);
        assert_eq!(config.renderer.height, 720);
        assert_eq!(config.matches, 2);
        assert_eq!(config.frame, Duration::from_millis(40));
    }

    #[test]
    fn zero_frame_duration_is_rejected() {
        assert!(HeadlessConfig::from_args(parse(&["--frame-ms", "0"])).is_err());
    }

    #[test]
    fn config_file_is_read_before_flags() {
        let path = std::env::temp_dir().join(format!("arena-headless-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"placement_ms": 1234, "starting_health": 50, "seed": 3}"#)
            .expect("write config");
        let config = HeadlessConfig::from_args(parse(&[
            "--config",
            path.to_str().expect("utf-8 path"),
            "--seed",
            "9",
        ]))
        .expect("config");
        std::fs::remove_file(&path).ok();

        assert_eq!(config.session.placement_ms, 1234);
        assert_eq!(config.session.starting_health, 50);
        assert_eq!(config.session.seed, Some(9));
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let err = HeadlessConfig::from_args(parse(&["--config", "/nonexistent/arena.json"]))
            .expect_err("missing file");
        assert!(err.to_string().contains("reading"));
    }
}
