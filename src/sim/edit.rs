//! Board editing rules
//!
//! Geometric constraints behind peg placement and lever create/drag/delete.
//! Gesture detection (long press, drag threshold) is the host's job; this
//! module only turns board-space points into valid obstacle edits.

use glam::Vec2;
use rand::Rng;

use super::obstacle::{Lever, LeverEnd, Peg};
use super::state::{Arena, World};
use crate::consts::*;
use crate::settings::PointerProfile;

/// Random tilt range (radians, either side of horizontal) for default levers
pub const DEFAULT_LEVER_TILT: f32 = 0.55;
/// Drag vectors shorter than this fall back to the lever's own orientation
const DEGENERATE_DRAG: f32 = 0.001;
/// Margin added when rescaling a short drag, so rounding cannot land under the minimum
const RESCALE_MARGIN: f32 = 1e-3;

/// Part of a lever under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverPart {
    Endpoint(LeverEnd),
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeverHit {
    pub index: usize,
    pub part: LeverPart,
}

/// Hit-test levers, topmost (last added) first
///
/// Endpoints win over the body since they are the smaller target.
pub fn hit_test_lever(levers: &[Lever], p: Vec2, pointer: PointerProfile) -> Option<LeverHit> {
    let endpoint_radius = pointer.endpoint_hit_radius();
    let body_radius = pointer.lever_hit_radius();

    for (index, lever) in levers.iter().enumerate().rev() {
        for which in [LeverEnd::Start, LeverEnd::End] {
            if p.distance(lever.endpoint(which)) <= endpoint_radius {
                return Some(LeverHit {
                    index,
                    part: LeverPart::Endpoint(which),
                });
            }
        }
        if lever.distance_to(p) <= body_radius {
            return Some(LeverHit {
                index,
                part: LeverPart::Body,
            });
        }
    }
    None
}

/// Hit-test pegs, last added first
pub fn hit_test_peg(pegs: &[Peg], p: Vec2, pointer: PointerProfile) -> Option<usize> {
    let radius = pointer.peg_hit_radius();
    pegs.iter().rposition(|peg| peg.center.distance(p) <= radius)
}

/// Validate an interactive peg placement
pub fn place_peg(arena: &Arena, pegs: &[Peg], p: Vec2) -> Option<Peg> {
    // Too close to (or inside) the bin strip
    if p.y.is_nan() || p.y > arena.bin_top() - PEG_PLACEMENT_FLOOR {
        return None;
    }
    let center = arena.clamp_board_point(p);
    let min_spacing = PEG_RADIUS * 2.0 + PEG_SPACING_SLACK;
    if pegs.iter().any(|peg| peg.center.distance(center) < min_spacing) {
        return None;
    }
    Some(Peg::new(center))
}

/// Build a lever from two raw points, or `None` if it would be too short
pub fn make_lever(arena: &Arena, a: Vec2, b: Vec2, min_len: f32) -> Option<Lever> {
    let a = arena.clamp_board_point(a);
    let b = arena.clamp_board_point(b);
    if a.distance(b) < min_len {
        return None;
    }
    Some(Lever::new(a, b))
}

/// Endpoints for a menu-placed lever centered near `at`
pub fn default_lever_points<R: Rng>(
    arena: &Arena,
    at: Vec2,
    half_len: f32,
    rng: &mut R,
) -> (Vec2, Vec2) {
    let center = arena.clamp_board_point(at);
    let angle = (rng.random::<f32>() - 0.5) * 2.0 * DEFAULT_LEVER_TILT;
    let half = Vec2::from_angle(angle) * half_len;
    (center - half, center + half)
}

/// Translate both endpoints, clamping each on its own
///
/// A clamp at one end does not move the other, so a lever pushed against the
/// boundary can shorten or change angle. A move that would leave it shorter
/// than `min_len` is declined.
pub fn translate_lever(lever: &mut Lever, arena: &Arena, delta: Vec2, min_len: f32) -> bool {
    if !delta.is_finite() {
        return false;
    }
    let start = arena.clamp_board_point(lever.start + delta);
    let end = arena.clamp_board_point(lever.end + delta);
    if start.distance(end) < min_len {
        return false;
    }
    lever.start = start;
    lever.end = end;
    true
}

/// Move one endpoint toward `target` while the other stays fixed
///
/// Targets closer than `min_len` to the fixed end are pushed out to just past
/// `min_len` along the drag direction; a drag onto the fixed end itself keeps
/// the lever's previous orientation. Declined if the result is still shorter
/// than `min_len` (a clamp in a corner).
pub fn drag_endpoint(
    lever: &mut Lever,
    arena: &Arena,
    which: LeverEnd,
    target: Vec2,
    min_len: f32,
) -> bool {
    let fixed = lever.endpoint(which.opposite());
    let point = arena.clamp_board_point(target);
    let mut offset = point - fixed;
    let dist = offset.length();

    let rescale_len = min_len + RESCALE_MARGIN;
    if dist < rescale_len {
        let dist = if dist < DEGENERATE_DRAG {
            offset = lever.endpoint(which) - fixed;
            let prior = offset.length();
            if prior > 0.0 {
                prior
            } else {
                offset = Vec2::X;
                1.0
            }
        } else {
            dist
        };
        offset *= rescale_len / dist;
    }

    let moved = arena.clamp_board_point(fixed + offset);
    if moved.distance(fixed) < min_len {
        return false;
    }
    lever.set_endpoint(which, moved);
    true
}

/// Drag mode of an active lever edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragMode {
    /// Whole-body translate
    Move,
    Endpoint(LeverEnd),
}

/// An in-progress lever drag, referencing the lever by index
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    pub index: usize,
    pub mode: DragMode,
    last: Vec2,
}

impl DragSession {
    pub fn start(hit: LeverHit, at: Vec2) -> Self {
        let mode = match hit.part {
            LeverPart::Body => DragMode::Move,
            LeverPart::Endpoint(which) => DragMode::Endpoint(which),
        };
        Self {
            index: hit.index,
            mode,
            last: at,
        }
    }

    /// Apply a pointer move; returns false once the lever no longer exists
    pub fn update(&mut self, world: &mut World, pointer: Vec2) -> bool {
        if self.index >= world.levers().len() {
            log::debug!("Drag ended: lever {} is gone", self.index);
            return false;
        }
        match self.mode {
            DragMode::Move => {
                world.move_lever_body(self.index, pointer - self.last);
            }
            DragMode::Endpoint(which) => {
                world.move_lever_endpoint(self.index, which, pointer);
            }
        }
        self.last = pointer;
        true
    }
}

/// Rubber-band preview of a lever being drawn from empty space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftLever {
    pub start: Vec2,
    pub end: Vec2,
}

impl DraftLever {
    pub fn new(arena: &Arena, start: Vec2, end: Vec2) -> Self {
        Self {
            start: arena.clamp_board_point(start),
            end: arena.clamp_board_point(end),
        }
    }

    pub fn update(&mut self, arena: &Arena, pointer: Vec2) {
        self.end = arena.clamp_board_point(pointer);
    }

    /// Turn the draft into a real lever; returns its index if long enough
    pub fn commit(self, world: &mut World) -> Option<usize> {
        world.add_lever(self.start, self.end)
    }
}
