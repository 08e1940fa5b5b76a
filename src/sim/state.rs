//! World state and core simulation types
//!
//! Everything the frame loop reads or mutates is owned by a single `World`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::edit;
use super::obstacle::{Lever, LeverEnd, Peg, seed_pegs};
use super::spawner::Spawner;
use crate::consts::*;
use crate::scoring::{self, CaptureWindow, Category, Metrics, TargetDistribution};
use crate::settings::Settings;

/// The rectangular play field
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub bin_height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self::new(ARENA_WIDTH, DEFAULT_ARENA_HEIGHT)
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            bin_height: BIN_HEIGHT,
        }
    }

    #[inline]
    pub fn bin_width(&self) -> f32 {
        self.width / BIN_COUNT as f32
    }

    /// Y coordinate of the top of the bin strip
    #[inline]
    pub fn bin_top(&self) -> f32 {
        self.height - self.bin_height
    }

    /// X positions of the interior bin dividers
    pub fn divider_xs(&self) -> impl Iterator<Item = f32> + '_ {
        (1..BIN_COUNT).map(move |b| b as f32 * self.bin_width())
    }

    #[inline]
    pub fn bin_index(&self, x: f32) -> usize {
        scoring::bin_index(x, self.width)
    }

    /// Top-left and bottom-right corners of the editable interior
    pub fn interior(&self) -> (Vec2, Vec2) {
        let min = Vec2::new(BOARD_MARGIN_X, BOARD_MARGIN_TOP);
        let max = Vec2::new(
            self.width - BOARD_MARGIN_X,
            (self.bin_top() - BOARD_MARGIN_BOTTOM).max(BOARD_MARGIN_TOP),
        );
        (min, max)
    }

    /// Clamp a point into the editable interior (excludes the bin strip)
    pub fn clamp_board_point(&self, p: Vec2) -> Vec2 {
        let (min, max) = self.interior();
        // NaN input lands on the top-left corner instead of propagating
        let p = Vec2::new(
            if p.x.is_nan() { min.x } else { p.x },
            if p.y.is_nan() { min.y } else { p.y },
        );
        super::geometry::clamp_to_rect(p, min, max)
    }
}

/// A falling body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Cosmetic spin (radians), no effect on physics
    pub rotation: f32,
    pub angular_vel: f32,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: PARTICLE_RADIUS,
            rotation: 0.0,
            angular_vel: 0.0,
        }
    }

    /// Y of the lowest point of the body
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.radius
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct World {
    pub arena: Arena,
    settings: Settings,
    pub targets: TargetDistribution,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    pub spawner: Spawner,
    pub paused: bool,
    /// Steps taken (paused frames excluded)
    pub time_ticks: u64,
    pegs: Vec<Peg>,
    levers: Vec<Lever>,
    particles: Vec<Particle>,
    stats: CaptureWindow,
    pub(crate) rng: Pcg32,
}

impl Default for World {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl World {
    /// Create a world with the default board and an evenly seeded window
    pub fn new(settings: Settings) -> Self {
        let height = if settings.arena_height.is_finite() && settings.arena_height > BIN_HEIGHT {
            settings.arena_height
        } else {
            log::warn!(
                "Arena height {} unusable, using {}",
                settings.arena_height,
                DEFAULT_ARENA_HEIGHT
            );
            DEFAULT_ARENA_HEIGHT
        };
        let arena = Arena::new(ARENA_WIDTH, height);
        let mut world = Self {
            arena,
            targets: TargetDistribution::default(),
            gravity: settings.gravity,
            spawner: Spawner::new(settings.spawn_per_sec),
            paused: false,
            time_ticks: 0,
            pegs: Vec::new(),
            levers: Vec::new(),
            particles: Vec::new(),
            stats: CaptureWindow::new(SCORE_WINDOW),
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
        };
        world.reset_board();
        world
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[inline]
    pub fn pegs(&self) -> &[Peg] {
        &self.pegs
    }

    #[inline]
    pub fn levers(&self) -> &[Lever] {
        &self.levers
    }

    #[inline]
    pub fn stats(&self) -> &CaptureWindow {
        &self.stats
    }

    #[inline]
    pub fn total_captured(&self) -> u64 {
        self.stats.total_captured()
    }

    /// Current share per category, in `Category::ALL` order
    pub fn percentages_by_category(&self) -> [f32; Category::COUNT] {
        self.stats.percentages_by_category()
    }

    pub fn score(&self) -> u32 {
        let penalty = self.settings.difficulty.penalty_factor();
        self.stats.score(&self.targets, penalty)
    }

    pub fn metrics(&self) -> Metrics {
        let penalty = self.settings.difficulty.penalty_factor();
        self.stats.metrics(&self.targets, penalty)
    }

    #[inline]
    pub fn min_lever_length(&self) -> f32 {
        self.settings.pointer.min_lever_length()
    }

    pub(crate) fn split_for_step(
        &mut self,
    ) -> (&mut Vec<Particle>, &[Peg], &[Lever], &mut CaptureWindow, &mut Pcg32) {
        (
            &mut self.particles,
            &self.pegs,
            &self.levers,
            &mut self.stats,
            &mut self.rng,
        )
    }

    /// Replace pegs and levers with the default layout
    pub fn reset_board(&mut self) {
        self.pegs = seed_pegs(&self.arena);
        self.levers.clear();
        log::info!("Board reset: {} pegs", self.pegs.len());
    }

    /// Re-seed the rolling window evenly and clear the lifetime counter
    pub fn reset_statistics(&mut self) {
        self.stats.reset();
        log::info!("Statistics reset ({} seeded samples)", self.stats.len());
    }

    /// Place a peg, rejecting points on the bin strip or crowding another peg
    pub fn add_peg(&mut self, p: Vec2) -> bool {
        match edit::place_peg(&self.arena, &self.pegs, p) {
            Some(peg) => {
                self.pegs.push(peg);
                true
            }
            None => false,
        }
    }

    pub fn remove_peg(&mut self, index: usize) -> bool {
        if index < self.pegs.len() {
            self.pegs.remove(index);
            true
        } else {
            false
        }
    }

    /// Create a lever between two raw points; returns its index
    pub fn add_lever(&mut self, a: Vec2, b: Vec2) -> Option<usize> {
        let lever = edit::make_lever(&self.arena, a, b, self.min_lever_length())?;
        self.levers.push(lever);
        Some(self.levers.len() - 1)
    }

    /// Create a default-length lever centered near `at` at a random tilt
    pub fn add_default_lever(&mut self, at: Vec2) -> Option<usize> {
        let half_len = self.settings.pointer.default_lever_half_length();
        let (a, b) = edit::default_lever_points(&self.arena, at, half_len, &mut self.rng);
        self.add_lever(a, b)
    }

    /// Drag one endpoint toward `target`, keeping the minimum length
    pub fn move_lever_endpoint(&mut self, index: usize, which: LeverEnd, target: Vec2) -> bool {
        let min_len = self.min_lever_length();
        match self.levers.get_mut(index) {
            Some(lever) => edit::drag_endpoint(lever, &self.arena, which, target, min_len),
            None => false,
        }
    }

    /// Translate a whole lever by `delta`
    pub fn move_lever_body(&mut self, index: usize, delta: Vec2) -> bool {
        let min_len = self.min_lever_length();
        match self.levers.get_mut(index) {
            Some(lever) => edit::translate_lever(lever, &self.arena, delta, min_len),
            None => false,
        }
    }

    pub fn remove_lever(&mut self, index: usize) -> bool {
        if index < self.levers.len() {
            self.levers.remove(index);
            true
        } else {
            false
        }
    }

    pub fn set_spawn_rate(&mut self, rate: f32) {
        self.spawner.set_rate(rate);
    }

    #[cfg(test)]
    pub(crate) fn push_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    #[cfg(test)]
    pub(crate) fn clear_obstacles(&mut self) {
        self.pegs.clear();
        self.levers.clear();
    }

    #[cfg(test)]
    pub(crate) fn stats_mut(&mut self) -> &mut CaptureWindow {
        &mut self.stats
    }
}
