//! Rate-driven particle spawning
//!
//! A fractional accumulator turns a per-second rate into whole spawns per
//! frame. Credit earned while the store is full is thrown away so a freed-up
//! store does not receive a burst.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::state::{Arena, Particle};
use crate::consts::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    /// Particles per second
    rate: f32,
    accumulator: f32,
    capacity: usize,
}

impl Spawner {
    pub fn new(rate: f32) -> Self {
        Self::with_capacity(rate, MAX_PARTICLES)
    }

    pub fn with_capacity(rate: f32, capacity: usize) -> Self {
        Self {
            rate: sanitize_rate(rate),
            accumulator: 0.0,
            capacity,
        }
    }

    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    pub fn set_rate(&mut self, rate: f32) {
        self.rate = sanitize_rate(rate);
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Number of particles to create this frame
    pub fn advance(&mut self, dt: f32, live: usize) -> usize {
        self.accumulator += self.rate * dt;
        if !self.accumulator.is_finite() {
            self.accumulator = 0.0;
        }

        let mut spawned = 0;
        while self.accumulator >= 1.0 {
            if live + spawned < self.capacity {
                spawned += 1;
            }
            self.accumulator -= 1.0;
            if live + spawned >= self.capacity {
                self.accumulator = 0.0;
                break;
            }
        }
        spawned
    }

    /// A new particle just above the arena, already falling
    pub fn spawn<R: Rng>(arena: &Arena, rng: &mut R) -> Particle {
        let r = PARTICLE_RADIUS;
        let x = r + rng.random::<f32>() * (arena.width - 2.0 * r);
        let vx = (rng.random::<f32>() - 0.5) * 2.0 * SPAWN_JITTER_X;
        let vy = SPAWN_MIN_VY + rng.random::<f32>() * (SPAWN_MAX_VY - SPAWN_MIN_VY);

        let mut particle = Particle::new(Vec2::new(x, SPAWN_Y), Vec2::new(vx, vy));
        particle.rotation = rng.random::<f32>() * TAU;
        particle.angular_vel = (rng.random::<f32>() - 0.5) * 2.0 * SPAWN_MAX_SPIN;
        particle
    }
}

fn sanitize_rate(rate: f32) -> f32 {
    if rate.is_finite() { rate.max(0.0) } else { 0.0 }
}
