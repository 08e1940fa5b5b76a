//! Frame-stepped simulation module
//!
//! All board physics and editing lives here. The module has no rendering or
//! platform dependencies:
//! - Frame delta clamped before integration
//! - Seeded RNG owned by the world
//! - Obstacles resolved in stable (insertion) order

pub mod collision;
pub mod command;
pub mod edit;
pub mod geometry;
pub mod obstacle;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{Contact, lever_contact, peg_contact};
pub use command::{Command, CommandOutcome, apply_command};
pub use edit::{DraftLever, DragMode, DragSession, LeverHit, LeverPart, hit_test_lever, hit_test_peg};
pub use obstacle::{Lever, LeverEnd, Peg};
pub use spawner::Spawner;
pub use state::{Arena, Particle, World};
pub use tick::{StepReport, clamp_frame_dt, step};
