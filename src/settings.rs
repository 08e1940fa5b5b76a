//! Simulation settings and presets
//!
//! Loaded from JSON by the host; the core never touches storage itself.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Input device class the board is tuned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PointerProfile {
    /// Mouse or pen
    #[default]
    Fine,
    /// Touch screen
    Coarse,
}

impl PointerProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            PointerProfile::Fine => "Fine",
            PointerProfile::Coarse => "Coarse",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "fine" | "mouse" => Some(PointerProfile::Fine),
            "coarse" | "touch" => Some(PointerProfile::Coarse),
            _ => None,
        }
    }

    /// Distance from a lever's segment that still grabs its body
    pub fn lever_hit_radius(&self) -> f32 {
        match self {
            PointerProfile::Fine => 12.0,
            PointerProfile::Coarse => 22.0,
        }
    }

    /// Distance from a lever endpoint that grabs the endpoint
    pub fn endpoint_hit_radius(&self) -> f32 {
        match self {
            PointerProfile::Fine => 14.0,
            PointerProfile::Coarse => 24.0,
        }
    }

    pub fn peg_hit_radius(&self) -> f32 {
        match self {
            PointerProfile::Fine => 14.0,
            PointerProfile::Coarse => 20.0,
        }
    }

    /// Shortest lever allowed on the board
    pub fn min_lever_length(&self) -> f32 {
        match self {
            PointerProfile::Fine => 28.0,
            PointerProfile::Coarse => 44.0,
        }
    }

    /// Half-length of a lever placed from the board menu
    pub fn default_lever_half_length(&self) -> f32 {
        match self {
            PointerProfile::Fine => 45.0,
            PointerProfile::Coarse => 52.0,
        }
    }

    /// Particles spawned per second
    pub fn default_spawn_rate(&self) -> f32 {
        match self {
            PointerProfile::Fine => 16.0,
            PointerProfile::Coarse => 14.0,
        }
    }
}

/// Scoring strictness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Relaxed,
    #[default]
    Standard,
    Strict,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Relaxed => "Relaxed",
            Difficulty::Standard => "Standard",
            Difficulty::Strict => "Strict",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relaxed" | "easy" => Some(Difficulty::Relaxed),
            "standard" | "normal" => Some(Difficulty::Standard),
            "strict" | "hard" => Some(Difficulty::Strict),
            _ => None,
        }
    }

    /// Score points lost per percentage point of total absolute error
    pub fn penalty_factor(&self) -> f32 {
        match self {
            Difficulty::Relaxed => 0.9,
            Difficulty::Standard => 1.15,
            Difficulty::Strict => 1.5,
        }
    }
}

/// Where a falling particle is counted as captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CaptureLine {
    /// Lower edge touches the arena floor
    #[default]
    Floor,
    /// Lower edge reaches the top of the bin strip
    BinTop,
}

/// Simulation settings
///
/// Fields missing from JSON take the defaults of the stored `pointer` profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SettingsFile")]
pub struct Settings {
    pub pointer: PointerProfile,
    pub difficulty: Difficulty,
    pub capture_line: CaptureLine,
    /// Initial gravity (units/s²)
    pub gravity: f32,
    /// Initial spawn rate (particles/s)
    pub spawn_per_sec: f32,
    /// Arena height; width is fixed at `ARENA_WIDTH`
    pub arena_height: f32,
    /// RNG seed for spawn jitter and tie-breaks
    pub seed: u64,
}

/// On-disk form of `Settings`; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    pointer: Option<PointerProfile>,
    difficulty: Option<Difficulty>,
    capture_line: Option<CaptureLine>,
    gravity: Option<f32>,
    spawn_per_sec: Option<f32>,
    arena_height: Option<f32>,
    seed: Option<u64>,
}

impl From<SettingsFile> for Settings {
    fn from(file: SettingsFile) -> Self {
        let defaults = Settings::for_pointer(file.pointer.unwrap_or_default());
        Self {
            difficulty: file.difficulty.unwrap_or(defaults.difficulty),
            capture_line: file.capture_line.unwrap_or(defaults.capture_line),
            gravity: file.gravity.unwrap_or(defaults.gravity),
            spawn_per_sec: file.spawn_per_sec.unwrap_or(defaults.spawn_per_sec),
            arena_height: file.arena_height.unwrap_or(defaults.arena_height),
            seed: file.seed.unwrap_or(defaults.seed),
            ..defaults
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::for_pointer(PointerProfile::default())
    }
}

impl Settings {
    /// Defaults tuned for a pointer profile
    pub fn for_pointer(pointer: PointerProfile) -> Self {
        Self {
            pointer,
            difficulty: Difficulty::default(),
            capture_line: CaptureLine::default(),
            gravity: DEFAULT_GRAVITY,
            spawn_per_sec: pointer.default_spawn_rate(),
            arena_height: DEFAULT_ARENA_HEIGHT,
            seed: 0,
        }
    }

    /// Arena height matching a host surface's aspect ratio
    pub fn with_aspect(mut self, surface_width: f32, surface_height: f32) -> Self {
        if surface_width > 0.0 && surface_height > 0.0 {
            self.arena_height = (ARENA_WIDTH * surface_height / surface_width).round();
        }
        self
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse settings, falling back to defaults on malformed input
    pub fn load_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!(
                    "Loaded settings (pointer={}, difficulty={})",
                    settings.pointer.as_str(),
                    settings.difficulty.as_str()
                );
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }
}
