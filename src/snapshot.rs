//! Render snapshot types
//!
//! Flat, `Pod` instance records built from a `World` after each step. A GPU
//! renderer can upload the byte views directly as instance buffers.

use bytemuck::{Pod, Zeroable};

use crate::consts::*;
use crate::scoring::{BIN_CATEGORIES, Category};
use crate::sim::{DraftLever, World};

/// One falling particle
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 2],
    pub rotation: f32,
    pub radius: f32,
    pub color: [f32; 4],
}

/// A filled circle (pegs, lever end caps)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct CircleInstance {
    pub center: [f32; 2],
    pub radius: f32,
    pub _pad: f32,
    pub color: [f32; 4],
}

impl CircleInstance {
    pub const fn new(x: f32, y: f32, radius: f32, color: [f32; 4]) -> Self {
        Self {
            center: [x, y],
            radius,
            _pad: 0.0,
            color,
        }
    }
}

/// A thick round-capped segment (levers, dividers, draft preview)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct SegmentInstance {
    pub a: [f32; 2],
    pub b: [f32; 2],
    pub thickness: f32,
    /// Non-zero for the lever currently being dragged
    pub highlighted: u32,
    pub _pad: [f32; 2],
    pub color: [f32; 4],
}

impl SegmentInstance {
    pub const fn new(a: [f32; 2], b: [f32; 2], thickness: f32, color: [f32; 4]) -> Self {
        Self {
            a,
            b,
            thickness,
            highlighted: 0,
            _pad: [0.0; 2],
            color,
        }
    }
}

/// One bin cell with its live capture count
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct BinInstance {
    /// Top-left corner
    pub origin: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
    pub count: u32,
    pub _pad: [u32; 3],
}

/// Colors for board elements
pub mod colors {
    use crate::scoring::Category;

    pub const BACKGROUND: [f32; 4] = [0.973, 0.980, 0.988, 1.0];
    pub const BIN_STRIP: [f32; 4] = [1.0, 1.0, 1.0, 0.64];
    pub const DIVIDER: [f32; 4] = [0.2, 0.255, 0.333, 0.5];
    pub const PEG: [f32; 4] = [0.388, 0.4, 0.945, 1.0];
    pub const LEVER: [f32; 4] = [0.055, 0.647, 0.914, 1.0];
    pub const LEVER_CAP: [f32; 4] = [0.012, 0.412, 0.631, 1.0];
    pub const LEVER_ACTIVE: [f32; 4] = [0.961, 0.62, 0.043, 1.0];
    pub const DRAFT_LEVER: [f32; 4] = [0.055, 0.647, 0.914, 0.6];
    pub const PARTICLE: [f32; 4] = [0.086, 0.639, 0.29, 1.0];

    /// Opacity of the bin tint over the strip
    pub const BIN_TINT_ALPHA: f32 = 0.28;

    /// Solid color for a category (matches `Category::hex`)
    pub const fn category(category: Category) -> [f32; 4] {
        match category {
            Category::Orange => [0.976, 0.451, 0.086, 1.0],
            Category::Red => [0.937, 0.267, 0.267, 1.0],
            Category::Green => [0.133, 0.773, 0.369, 1.0],
            Category::Blue => [0.231, 0.51, 0.965, 1.0],
            Category::Purple => [0.659, 0.333, 0.969, 1.0],
        }
    }
}

/// Divider stroke width
const DIVIDER_THICKNESS: f32 = 3.0;
/// End cap radius for idle and dragged levers
const LEVER_CAP_RADIUS: f32 = 4.0;
const LEVER_CAP_RADIUS_ACTIVE: f32 = 5.0;
/// Draft preview stroke width
const DRAFT_THICKNESS: f32 = 5.0;

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub particles: Vec<ParticleInstance>,
    pub circles: Vec<CircleInstance>,
    pub segments: Vec<SegmentInstance>,
    pub bins: Vec<BinInstance>,
}

impl Snapshot {
    /// Build instance lists from the current world
    ///
    /// `active_lever` is highlighted; `draft` adds a translucent preview segment.
    pub fn capture(world: &World, active_lever: Option<usize>, draft: Option<&DraftLever>) -> Self {
        let arena = &world.arena;
        let mut snapshot = Self::default();

        let bin_width = arena.bin_width();
        let counts = world.stats().counts();
        for (i, category) in BIN_CATEGORIES.iter().enumerate() {
            let mut color = colors::category(*category);
            color[3] = colors::BIN_TINT_ALPHA;
            snapshot.bins.push(BinInstance {
                origin: [i as f32 * bin_width, arena.bin_top()],
                size: [bin_width, arena.bin_height],
                color,
                count: counts[i],
                _pad: [0; 3],
            });
        }

        for x in arena.divider_xs() {
            snapshot.segments.push(SegmentInstance::new(
                [x, arena.bin_top()],
                [x, arena.height],
                DIVIDER_THICKNESS,
                colors::DIVIDER,
            ));
        }

        for peg in world.pegs() {
            snapshot.circles.push(CircleInstance::new(
                peg.center.x,
                peg.center.y,
                peg.radius,
                colors::PEG,
            ));
        }

        for (i, lever) in world.levers().iter().enumerate() {
            let active = active_lever == Some(i);
            let (color, cap_color, cap_radius) = if active {
                (colors::LEVER_ACTIVE, colors::LEVER_ACTIVE, LEVER_CAP_RADIUS_ACTIVE)
            } else {
                (colors::LEVER, colors::LEVER_CAP, LEVER_CAP_RADIUS)
            };

            let mut segment =
                SegmentInstance::new(lever.start.into(), lever.end.into(), lever.thickness, color);
            segment.highlighted = u32::from(active);
            snapshot.segments.push(segment);

            for end in [lever.start, lever.end] {
                snapshot
                    .circles
                    .push(CircleInstance::new(end.x, end.y, cap_radius, cap_color));
            }
        }

        if let Some(draft) = draft {
            snapshot.segments.push(SegmentInstance::new(
                draft.start.into(),
                draft.end.into(),
                DRAFT_THICKNESS,
                colors::DRAFT_LEVER,
            ));
        }

        snapshot.particles = world
            .particles()
            .iter()
            .map(|p| ParticleInstance {
                position: p.pos.into(),
                rotation: p.rotation,
                radius: p.radius,
                color: colors::PARTICLE,
            })
            .collect();

        snapshot
    }

    pub fn particle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.particles)
    }

    pub fn circle_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.circles)
    }

    pub fn segment_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.segments)
    }

    pub fn bin_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.bins)
    }

    /// Category color for a bin (out-of-range indices use the last bin)
    pub fn bin_color(bin: usize) -> [f32; 4] {
        colors::category(BIN_CATEGORIES[bin.min(BIN_COUNT - 1)])
    }
}

/// Parse `#rrggbb` into RGBA floats
pub fn hex_to_rgba(hex: &str, alpha: f32) -> Option<[f32; 4]> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |i: usize| -> Option<f32> {
        let byte = u8::from_str_radix(digits.get(i..i + 2)?, 16).ok()?;
        Some(byte as f32 / 255.0)
    };
    Some([channel(0)?, channel(2)?, channel(4)?, alpha])
}

/// Category color resolved from its hex string
pub fn category_rgba(category: Category) -> [f32; 4] {
    hex_to_rgba(category.hex(), 1.0).unwrap_or(colors::category(category))
}
