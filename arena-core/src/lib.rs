//! # Minion Arena Core
//!
//! Runtime core of a 2D autobattler: a scene tree that owns layout,
//! rendering dispatch, input hit-testing, drag-and-drop re-parenting and the
//! match phase machine.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       Session                        │
//! ├──────────────────────────────────────────────────────┤
//! │  Scene Tree          │  Event Router                 │
//! │  - Generational ids  │  - Hit-test (pre-order)       │
//! │  - Update / render   │  - Dispatch (topmost first)   │
//! │  - Layers            │  - Lifecycle broadcast        │
//! ├──────────────────────────────────────────────────────┤
//! │  Drag Controller     │  Phase Machine                │
//! │  - Pointer proxy     │  - Placement countdown        │
//! │  - Swap / revert     │  - Combat, draft, reset       │
//! └──────────────────────────────────────────────────────┘
//!                │  FrameLayers { base, overlay }
//!                ▼
//!          arena-renderer
//! ```
//!
//! The host drives a [`Session`] with [`Session::handle_input`],
//! [`Session::tick`] and [`Session::render`] once per displayed frame.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod draft;
pub mod drag;
pub mod error;
pub mod event;
pub mod geometry;
pub mod model;
pub mod node;
pub mod phase;
pub mod render;
pub mod scene;
pub mod session;
pub mod stats;
pub mod surface;
pub mod timer;
pub mod tree;

pub use config::{PlayerConfig, SessionConfig};
pub use draft::{DraftSelector, RarityWeights};
pub use drag::{DragController, DragState, DropOutcome};
pub use error::{ArenaError, ArenaResult};
pub use event::{broadcast, dispatch, Event, EventKind, Handler, Input, InputEvent};
pub use geometry::{Point, Size};
pub use model::{Minion, MinionDef, MinionId, Player, PlayerId, Rarity};
pub use node::{NodeId, Payload, SceneNode, Slot, SlotKind, UpdateTask};
pub use phase::{CombatOutcome, CombatPolicy, Phase};
pub use render::Renderer;
pub use scene::{Scene, SceneKey, SceneManager};
pub use session::{DraftRound, Session, COMPUTER, HUMAN};
pub use stats::RollingStats;
pub use surface::{Color, CommandList, DrawCommand, DrawSurface, FrameLayers, Layer};
pub use timer::Timer;
pub use tree::{SceneTree, TreeHost};

/// Arena core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
