//! Plinko Sim - particle drop sorter with editable levers
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (physics, collisions, board editing, commands)
//! - `scoring`: Rolling capture window and score against a target distribution
//! - `settings`: Pointer profile, difficulty and other runtime configuration
//! - `snapshot`: Plain-old-data instance records for an external renderer

pub mod scoring;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use scoring::{CaptureWindow, Category, Metrics, ScoreRating, TargetDistribution};
pub use settings::{CaptureLine, Difficulty, PointerProfile, Settings};
pub use sim::{Command, CommandOutcome, StepReport, World, apply_command, step};

/// Simulation configuration constants
pub mod consts {
    /// Largest frame delta fed to the integrator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.032;

    /// Arena dimensions (internal board units)
    pub const ARENA_WIDTH: f32 = 1000.0;
    pub const DEFAULT_ARENA_HEIGHT: f32 = 1400.0;
    /// Height of the bin strip at the bottom of the arena
    pub const BIN_HEIGHT: f32 = 120.0;
    pub const BIN_COUNT: usize = 5;

    /// Obstacle and body sizes
    pub const PEG_RADIUS: f32 = 7.0;
    pub const PARTICLE_RADIUS: f32 = 7.0;
    pub const LEVER_THICKNESS: f32 = 8.0;

    pub const MAX_PARTICLES: usize = 320;
    /// Number of recent captures the score is computed over
    pub const SCORE_WINDOW: usize = 100;

    /// Downward acceleration (units/s²)
    pub const DEFAULT_GRAVITY: f32 = 1050.0;
    /// Per-step horizontal velocity damping
    pub const HORIZONTAL_DAMPING: f32 = 0.999;

    /// Restitution coefficients
    pub const WALL_RESTITUTION: f32 = 0.72;
    pub const PEG_RESTITUTION: f32 = 0.68;
    pub const LEVER_RESTITUTION: f32 = 0.66;
    pub const DIVIDER_RESTITUTION: f32 = 0.62;
    /// Extra clearance kept between a particle and a bin divider
    pub const DIVIDER_MARGIN: f32 = 2.0;

    /// Spawn line and initial fall speed range
    pub const SPAWN_Y: f32 = -10.0;
    pub const SPAWN_JITTER_X: f32 = 12.0;
    pub const SPAWN_MIN_VY: f32 = 30.0;
    pub const SPAWN_MAX_VY: f32 = 50.0;
    pub const SPAWN_MAX_SPIN: f32 = 1.75;
    /// Particles this far below the floor are dropped without capture
    pub const ESCAPE_MARGIN: f32 = 120.0;

    /// Editable interior of the board
    pub const BOARD_MARGIN_X: f32 = 8.0;
    pub const BOARD_MARGIN_TOP: f32 = 28.0;
    pub const BOARD_MARGIN_BOTTOM: f32 = 12.0;
    /// Pegs cannot be placed this close above the bin strip
    pub const PEG_PLACEMENT_FLOOR: f32 = 22.0;
    /// Extra gap required between interactively placed pegs
    pub const PEG_SPACING_SLACK: f32 = 2.0;

    /// Seeded peg grid layout
    pub const PEG_GRID_START_Y: f32 = 80.0;
    pub const PEG_GRID_ROW_GAP: f32 = 68.0;
    pub const PEG_GRID_COL_GAP: f32 = 86.0;
    pub const PEG_GRID_EVEN_OFFSET: f32 = 72.0;
    pub const PEG_GRID_ODD_OFFSET: f32 = 114.0;
    pub const PEG_GRID_RIGHT_MARGIN: f32 = 56.0;
    pub const PEG_GRID_BOTTOM_MARGIN: f32 = 24.0;
}
