//! Collision detection and response for particles
//!
//! Particles collide with the arena walls, pegs (circles), levers (thick
//! segments) and the bin dividers. Each obstacle is resolved on its own, in
//! order; there is no joint solve across simultaneous contacts.

use glam::Vec2;
use rand::Rng;

use super::geometry::{closest_point_on_segment, reflect_inward, segment_normal};
use super::obstacle::{Lever, Peg};
use super::state::{Arena, Particle};
use crate::consts::*;

/// Contact between a particle and an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Point on the obstacle the particle is pushed away from
    pub anchor: Vec2,
    /// Unit normal pointing from the obstacle toward the particle
    pub normal: Vec2,
    /// Center distance from `anchor` at which the particle just touches
    pub touch_distance: f32,
}

/// Check a particle against a peg
pub fn peg_contact(pos: Vec2, radius: f32, peg: &Peg) -> Option<Contact> {
    let offset = pos - peg.center;
    let dist = offset.length();
    let touch_distance = radius + peg.radius;
    if dist >= touch_distance {
        return None;
    }

    // Coincident centers: any direction will do
    let normal = if dist > 0.0 { offset / dist } else { Vec2::X };

    Some(Contact {
        anchor: peg.center,
        normal,
        touch_distance,
    })
}

/// Check a particle against a lever
pub fn lever_contact(pos: Vec2, radius: f32, lever: &Lever) -> Option<Contact> {
    if lever.is_degenerate() {
        return None;
    }

    let (closest, _) = closest_point_on_segment(pos, lever.start, lever.end);
    let offset = pos - closest;
    let dist = offset.length();
    let touch_distance = radius + lever.half_thickness();
    if dist >= touch_distance {
        return None;
    }

    // Center exactly on the centerline: push out along the segment normal
    let normal = if dist > 0.0 {
        offset / dist
    } else {
        segment_normal(lever.start, lever.end)
    };

    Some(Contact {
        anchor: closest,
        normal,
        touch_distance,
    })
}

/// Push a particle out to touching distance and bounce its inward velocity
pub fn resolve_contact(particle: &mut Particle, contact: &Contact, restitution: f32) {
    particle.pos = contact.anchor + contact.normal * contact.touch_distance;
    particle.vel = reflect_inward(particle.vel, contact.normal, restitution);
}

/// Side walls; returns true on contact
pub fn collide_side_walls(particle: &mut Particle, arena: &Arena) -> bool {
    let r = particle.radius;
    if particle.pos.x < r {
        particle.pos.x = r;
        particle.vel.x = particle.vel.x.abs() * WALL_RESTITUTION;
        true
    } else if particle.pos.x > arena.width - r {
        particle.pos.x = arena.width - r;
        particle.vel.x = -particle.vel.x.abs() * WALL_RESTITUTION;
        true
    } else {
        false
    }
}

/// Ceiling; returns true on contact
pub fn collide_top_wall(particle: &mut Particle) -> bool {
    let r = particle.radius;
    if particle.pos.y < r {
        particle.pos.y = r;
        particle.vel.y = particle.vel.y.abs() * WALL_RESTITUTION;
        true
    } else {
        false
    }
}

/// Resolve every peg in order; returns the number of contacts
pub fn collide_pegs(particle: &mut Particle, pegs: &[Peg]) -> usize {
    let mut hits = 0;
    for peg in pegs {
        if let Some(contact) = peg_contact(particle.pos, particle.radius, peg) {
            resolve_contact(particle, &contact, PEG_RESTITUTION);
            hits += 1;
        }
    }
    hits
}

/// Resolve every lever in order; returns the number of contacts
pub fn collide_levers(particle: &mut Particle, levers: &[Lever]) -> usize {
    let mut hits = 0;
    for lever in levers {
        if let Some(contact) = lever_contact(particle.pos, particle.radius, lever) {
            resolve_contact(particle, &contact, LEVER_RESTITUTION);
            hits += 1;
        }
    }
    hits
}

/// Keep particles in the bin band off the dividers
///
/// Only active once the particle has dropped into the bin strip. A particle
/// sitting exactly on a divider is sent to a random side.
pub fn collide_bin_dividers<R: Rng>(particle: &mut Particle, arena: &Arena, rng: &mut R) -> bool {
    if particle.pos.y <= arena.bin_top() - particle.radius {
        return false;
    }

    let min = particle.radius + DIVIDER_MARGIN;
    let mut hit = false;
    for wall_x in arena.divider_xs() {
        let diff = particle.pos.x - wall_x;
        if diff.abs() < min {
            let dir = if diff == 0.0 {
                if rng.random_bool(0.5) { -1.0 } else { 1.0 }
            } else {
                diff.signum()
            };
            particle.pos.x = wall_x + dir * min;
            particle.vel.x = -particle.vel.x * DIVIDER_RESTITUTION;
            hit = true;
        }
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_peg_bounce_exact_touch() {
        let peg = Peg::new(Vec2::new(500.0, 500.0));
        let mut particle = Particle::new(Vec2::new(500.0, 490.0), Vec2::new(0.0, 200.0));

        let hits = collide_pegs(&mut particle, &[peg]);
        assert_eq!(hits, 1);
        assert_eq!(particle.pos.distance(peg.center), PARTICLE_RADIUS + PEG_RADIUS);
        assert!((particle.vel.y - (-200.0 * PEG_RESTITUTION)).abs() < 1e-3);
        assert_eq!(particle.vel.x, 0.0);
    }

    #[test]
    fn test_peg_keeps_tangential_velocity() {
        let peg = Peg::new(Vec2::new(0.0, 0.0));
        let mut particle = Particle::new(Vec2::new(0.0, -10.0), Vec2::new(50.0, 100.0));
        collide_pegs(&mut particle, &[peg]);
        assert!((particle.vel.x - 50.0).abs() < 1e-4);
        assert!((particle.vel.y + 68.0).abs() < 1e-3);
    }

    #[test]
    fn test_peg_separating_velocity_untouched() {
        let peg = Peg::new(Vec2::new(0.0, 0.0));
        let mut particle = Particle::new(Vec2::new(0.0, -10.0), Vec2::new(0.0, -40.0));
        collide_pegs(&mut particle, &[peg]);
        assert_eq!(particle.vel, Vec2::new(0.0, -40.0));
        assert!((particle.pos.y + 14.0).abs() < 1e-4);
    }

    #[test]
    fn test_peg_coincident_centers() {
        let peg = Peg::new(Vec2::new(300.0, 300.0));
        let mut particle = Particle::new(peg.center, Vec2::new(0.0, 100.0));
        collide_pegs(&mut particle, &[peg]);
        assert!(particle.is_finite());
        assert_eq!(particle.pos, Vec2::new(314.0, 300.0));
    }

    #[test]
    fn test_peg_miss() {
        let peg = Peg::new(Vec2::new(0.0, 0.0));
        let mut particle = Particle::new(Vec2::new(0.0, -14.0), Vec2::new(0.0, 100.0));
        assert_eq!(collide_pegs(&mut particle, &[peg]), 0);
        assert_eq!(particle.vel.y, 100.0);
    }

    #[test]
    fn test_lever_bounce() {
        let lever = Lever::new(Vec2::new(100.0, 200.0), Vec2::new(300.0, 200.0));
        let mut particle = Particle::new(Vec2::new(200.0, 192.0), Vec2::new(20.0, 300.0));

        assert_eq!(collide_levers(&mut particle, &[lever]), 1);
        // radius 7 + half thickness 4
        assert!((particle.pos.y - 189.0).abs() < 1e-4);
        assert!((particle.vel.y - (-300.0 * LEVER_RESTITUTION)).abs() < 1e-3);
        assert!((particle.vel.x - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_lever_endpoint_cap() {
        let lever = Lever::new(Vec2::new(100.0, 200.0), Vec2::new(300.0, 200.0));
        let mut particle = Particle::new(Vec2::new(95.0, 200.0), Vec2::new(50.0, 0.0));
        collide_levers(&mut particle, &[lever]);
        assert!((particle.pos - Vec2::new(89.0, 200.0)).length() < 1e-4);
        assert!(particle.vel.x < 0.0);
    }

    #[test]
    fn test_lever_center_on_line() {
        let lever = Lever::new(Vec2::new(100.0, 200.0), Vec2::new(300.0, 200.0));
        let mut particle = Particle::new(Vec2::new(200.0, 200.0), Vec2::new(0.0, 100.0));
        collide_levers(&mut particle, &[lever]);
        assert!(particle.is_finite());
        assert!((particle.pos.distance(Vec2::new(200.0, 200.0)) - 11.0).abs() < 1e-4);
    }

    #[test]
    fn test_degenerate_lever_skipped() {
        let p = Vec2::new(50.0, 50.0);
        let lever = Lever::new(p, p);
        let mut particle = Particle::new(p, Vec2::new(0.0, 100.0));
        assert_eq!(collide_levers(&mut particle, &[lever]), 0);
        assert_eq!(particle.pos, p);
    }

    #[test]
    fn test_side_walls() {
        let arena = Arena::default();
        let mut particle = Particle::new(Vec2::new(2.0, 100.0), Vec2::new(-100.0, 0.0));
        assert!(collide_side_walls(&mut particle, &arena));
        assert_eq!(particle.pos.x, PARTICLE_RADIUS);
        assert!((particle.vel.x - 72.0).abs() < 1e-4);

        let mut particle = Particle::new(Vec2::new(999.0, 100.0), Vec2::new(100.0, 0.0));
        assert!(collide_side_walls(&mut particle, &arena));
        assert_eq!(particle.pos.x, arena.width - PARTICLE_RADIUS);
        assert!((particle.vel.x + 72.0).abs() < 1e-4);
    }

    #[test]
    fn test_top_wall() {
        let mut particle = Particle::new(Vec2::new(500.0, 3.0), Vec2::new(0.0, -50.0));
        assert!(collide_top_wall(&mut particle));
        assert_eq!(particle.pos.y, PARTICLE_RADIUS);
        assert!((particle.vel.y - 36.0).abs() < 1e-4);
    }

    #[test]
    fn test_dividers_only_in_bin_band() {
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut above = Particle::new(Vec2::new(201.0, 500.0), Vec2::new(10.0, 100.0));
        assert!(!collide_bin_dividers(&mut above, &arena, &mut rng));

        let mut inside = Particle::new(Vec2::new(203.0, 1350.0), Vec2::new(-10.0, 100.0));
        assert!(collide_bin_dividers(&mut inside, &arena, &mut rng));
        assert_eq!(inside.pos.x, 209.0);
        assert!((inside.vel.x - 6.2).abs() < 1e-4);
    }

    #[test]
    fn test_divider_tie_break_picks_a_side() {
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..20 {
            let mut p = Particle::new(Vec2::new(400.0, 1350.0), Vec2::ZERO);
            collide_bin_dividers(&mut p, &arena, &mut rng);
            assert!(p.pos.x == 391.0 || p.pos.x == 409.0);
        }
    }
}
