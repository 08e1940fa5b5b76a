//! Board and run-control commands
//!
//! Input layers translate pointer and keyboard events into `Command`s and apply
//! them between frames. Every command either changes the world or is ignored;
//! nothing here can fail.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::obstacle::LeverEnd;
use super::state::World;

/// A single edit or control request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Command {
    AddPeg { at: Vec2 },
    RemovePeg { index: usize },
    AddLever { start: Vec2, end: Vec2 },
    /// Default-length lever centered on `at` at a random tilt
    AddDefaultLever { at: Vec2 },
    MoveLeverEndpoint {
        index: usize,
        end: LeverEnd,
        to: Vec2,
    },
    MoveLeverBody { index: usize, delta: Vec2 },
    RemoveLever { index: usize },
    ResetBoard,
    ResetStatistics,
    SetPaused(bool),
    TogglePause,
    SetGravity(f32),
    SetSpawnRate(f32),
}

/// Whether a command changed the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Applied,
    Ignored,
}

impl CommandOutcome {
    #[inline]
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

impl From<bool> for CommandOutcome {
    fn from(applied: bool) -> Self {
        if applied { Self::Applied } else { Self::Ignored }
    }
}

/// Apply a command to the world
pub fn apply_command(world: &mut World, command: Command) -> CommandOutcome {
    let outcome: CommandOutcome = match command {
        Command::AddPeg { at } => world.add_peg(at).into(),
        Command::RemovePeg { index } => world.remove_peg(index).into(),
        Command::AddLever { start, end } => world.add_lever(start, end).is_some().into(),
        Command::AddDefaultLever { at } => world.add_default_lever(at).is_some().into(),
        Command::MoveLeverEndpoint { index, end, to } => {
            world.move_lever_endpoint(index, end, to).into()
        }
        Command::MoveLeverBody { index, delta } => world.move_lever_body(index, delta).into(),
        Command::RemoveLever { index } => world.remove_lever(index).into(),
        Command::ResetBoard => {
            world.reset_board();
            CommandOutcome::Applied
        }
        Command::ResetStatistics => {
            world.reset_statistics();
            CommandOutcome::Applied
        }
        Command::SetPaused(paused) => {
            world.paused = paused;
            CommandOutcome::Applied
        }
        Command::TogglePause => {
            world.paused = !world.paused;
            CommandOutcome::Applied
        }
        Command::SetGravity(gravity) => {
            if gravity.is_finite() {
                world.gravity = gravity;
                CommandOutcome::Applied
            } else {
                CommandOutcome::Ignored
            }
        }
        Command::SetSpawnRate(rate) => {
            if rate.is_finite() && rate >= 0.0 {
                world.set_spawn_rate(rate);
                CommandOutcome::Applied
            } else {
                CommandOutcome::Ignored
            }
        }
    };

    log::debug!("{:?} -> {:?}", command, outcome);
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{PointerProfile, Settings};

    #[test]
    fn test_lever_lifecycle() {
        let mut world = World::default();
        let add = Command::AddLever {
            start: Vec2::new(100.0, 300.0),
            end: Vec2::new(260.0, 340.0),
        };
        assert_eq!(apply_command(&mut world, add), CommandOutcome::Applied);
        assert_eq!(world.levers().len(), 1);

        let moved = apply_command(
            &mut world,
            Command::MoveLeverBody {
                index: 0,
                delta: Vec2::new(10.0, 0.0),
            },
        );
        assert!(moved.is_applied());
        assert_eq!(world.levers()[0].start, Vec2::new(110.0, 300.0));

        let dragged = apply_command(
            &mut world,
            Command::MoveLeverEndpoint {
                index: 0,
                end: LeverEnd::End,
                to: Vec2::new(400.0, 500.0),
            },
        );
        assert!(dragged.is_applied());
        assert_eq!(world.levers()[0].end, Vec2::new(400.0, 500.0));

        assert!(apply_command(&mut world, Command::RemoveLever { index: 0 }).is_applied());
        assert!(world.levers().is_empty());
        assert_eq!(
            apply_command(&mut world, Command::RemoveLever { index: 0 }),
            CommandOutcome::Ignored
        );
    }

    #[test]
    fn test_degenerate_lever_is_ignored() {
        let mut world = World::default();
        let p = Vec2::new(100.0, 100.0);
        let outcome = apply_command(&mut world, Command::AddLever { start: p, end: p });
        assert_eq!(outcome, CommandOutcome::Ignored);
        assert!(world.levers().is_empty());
    }

    #[test]
    fn test_peg_commands() {
        let mut world = World::default();
        world.clear_obstacles();

        let at = Vec2::new(500.0, 600.0);
        assert!(apply_command(&mut world, Command::AddPeg { at }).is_applied());
        // Too close to the first
        let crowded = apply_command(
            &mut world,
            Command::AddPeg {
                at: at + Vec2::new(5.0, 0.0),
            },
        );
        assert_eq!(crowded, CommandOutcome::Ignored);
        assert_eq!(world.pegs().len(), 1);

        assert!(apply_command(&mut world, Command::RemovePeg { index: 0 }).is_applied());
        assert!(!apply_command(&mut world, Command::RemovePeg { index: 0 }).is_applied());
    }

    #[test]
    fn test_default_lever_uses_profile_length() {
        let mut world = World::new(Settings::for_pointer(PointerProfile::Coarse));
        let outcome = apply_command(
            &mut world,
            Command::AddDefaultLever {
                at: Vec2::new(500.0, 500.0),
            },
        );
        assert!(outcome.is_applied());
        let len = world.levers()[0].length();
        assert!((len - 104.0).abs() < 1e-2);
    }

    #[test]
    fn test_run_controls() {
        let mut world = World::default();
        apply_command(&mut world, Command::TogglePause);
        assert!(world.paused);
        apply_command(&mut world, Command::SetPaused(false));
        assert!(!world.paused);

        assert!(apply_command(&mut world, Command::SetGravity(500.0)).is_applied());
        assert_eq!(world.gravity, 500.0);
        assert!(!apply_command(&mut world, Command::SetGravity(f32::NAN)).is_applied());
        assert_eq!(world.gravity, 500.0);

        assert!(apply_command(&mut world, Command::SetSpawnRate(4.0)).is_applied());
        assert_eq!(world.spawner.rate(), 4.0);
        assert!(!apply_command(&mut world, Command::SetSpawnRate(-1.0)).is_applied());
        assert_eq!(world.spawner.rate(), 4.0);
    }

    #[test]
    fn test_resets() {
        let mut world = World::default();
        for _ in 0..30 {
            world.stats_mut().record(4);
        }
        assert_eq!(world.total_captured(), 30);

        apply_command(&mut world, Command::ResetStatistics);
        assert_eq!(world.total_captured(), 0);
        assert_eq!(world.stats().counts(), &[20, 20, 20, 20, 20]);

        world.add_lever(Vec2::new(100.0, 300.0), Vec2::new(200.0, 300.0));
        apply_command(&mut world, Command::ResetBoard);
        assert!(world.levers().is_empty());
    }

    #[test]
    fn test_commands_from_json() {
        let json = r#"[
            {"AddPeg": {"at": [300.0, 400.0]}},
            "TogglePause",
            {"SetSpawnRate": 8.0}
        ]"#;
        let commands: Vec<Command> = serde_json::from_str(json).unwrap();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[1], Command::TogglePause);
        assert_eq!(
            commands[0],
            Command::AddPeg {
                at: Vec2::new(300.0, 400.0)
            }
        );
    }
}
