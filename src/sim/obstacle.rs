//! Static pegs and editable levers
//!
//! Pegs are fixed circles. Levers are thick line segments the player can
//! create, drag and delete; the edit rules that keep them valid live in
//! `edit`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{DEGENERATE_LENGTH_SQ, closest_point_on_segment, point_to_segment_distance};
use super::state::Arena;
use crate::consts::*;

/// A static circular obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peg {
    pub center: Vec2,
    pub radius: f32,
}

impl Peg {
    pub fn new(center: Vec2) -> Self {
        Self {
            center,
            radius: PEG_RADIUS,
        }
    }
}

/// Which end of a lever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeverEnd {
    Start,
    End,
}

impl LeverEnd {
    pub fn opposite(self) -> Self {
        match self {
            LeverEnd::Start => LeverEnd::End,
            LeverEnd::End => LeverEnd::Start,
        }
    }
}

/// A thick segment deflector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lever {
    pub start: Vec2,
    pub end: Vec2,
    pub thickness: f32,
}

impl Lever {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self {
            start,
            end,
            thickness: LEVER_THICKNESS,
        }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// True when the segment is too short to have a usable normal
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        (self.end - self.start).length_squared() <= DEGENERATE_LENGTH_SQ
    }

    #[inline]
    pub fn half_thickness(&self) -> f32 {
        self.thickness * 0.5
    }

    pub fn endpoint(&self, which: LeverEnd) -> Vec2 {
        match which {
            LeverEnd::Start => self.start,
            LeverEnd::End => self.end,
        }
    }

    pub fn set_endpoint(&mut self, which: LeverEnd, p: Vec2) {
        match which {
            LeverEnd::Start => self.start = p,
            LeverEnd::End => self.end = p,
        }
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Closest point on the centerline
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        closest_point_on_segment(p, self.start, self.end).0
    }

    /// Distance from `p` to the centerline
    #[inline]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        point_to_segment_distance(p, self.start, self.end)
    }
}

/// Default staggered peg grid for an arena
pub fn seed_pegs(arena: &Arena) -> Vec<Peg> {
    let mut pegs = Vec::new();
    let max_y = arena.bin_top() - PEG_GRID_BOTTOM_MARGIN;
    let max_x = arena.width - PEG_GRID_RIGHT_MARGIN;

    let mut row = 0u32;
    loop {
        let y = PEG_GRID_START_Y + row as f32 * PEG_GRID_ROW_GAP;
        if y >= max_y {
            break;
        }
        let offset = if row % 2 == 0 {
            PEG_GRID_EVEN_OFFSET
        } else {
            PEG_GRID_ODD_OFFSET
        };
        let mut x = offset;
        while x < max_x {
            pegs.push(Peg::new(Vec2::new(x, y)));
            x += PEG_GRID_COL_GAP;
        }
        row += 1;
    }
    pegs
}
