use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::raster::Rgb;

/// Board and pixel dimensions shared by the simulation and the renderer.
///
/// The board is always square: `tile_count` cells per side, each cell drawn
/// as `cell_size` × `cell_size` pixels on the canvas.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub tile_count: u16,
    pub cell_size: u16,
}

impl GridSize {
    /// Returns the total number of cells on the board.
    #[must_use]
    pub fn total_cells(self) -> usize {
        usize::from(self.tile_count) * usize::from(self.tile_count)
    }

    /// Returns the canvas edge length in pixels.
    #[must_use]
    pub fn canvas_px(self) -> u32 {
        u32::from(self.tile_count) * u32::from(self.cell_size)
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            tile_count: DEFAULT_TILE_COUNT,
            cell_size: DEFAULT_CELL_SIZE_PX,
        }
    }
}

/// Number of cells per board side.
pub const DEFAULT_TILE_COUNT: u16 = 20;

/// Canvas pixels per cell side. Two pixel rows share one terminal row.
pub const DEFAULT_CELL_SIZE_PX: u16 = 4;

/// Smallest board accepted from the command line.
pub const MIN_TILE_COUNT: u16 = 4;

/// Smallest board with room for both the snake and its food.
pub const MIN_PLAYABLE_TILE_COUNT: u16 = 2;

/// Storage key holding the persisted high score.
pub const HIGH_SCORE_KEY: &str = "snakeHighScore";

pub const MIN_SPEED_LEVEL: u8 = 1;
pub const MAX_SPEED_LEVEL: u8 = 5;
pub const DEFAULT_SPEED_LEVEL: u8 = 3;

/// Tick interval and label for each speed level, indexed by `level - 1`.
const SPEED_TABLE: [(u64, &str); 5] = [
    (200, "Very slow"),
    (150, "Slow"),
    (100, "Medium"),
    (70, "Fast"),
    (40, "Very fast"),
];

#[derive(Debug, Clone, Copy, Eq, PartialEq, Error)]
pub enum ConfigError {
    #[error("speed level {0} is outside 1..=5")]
    SpeedLevelOutOfRange(u8),
}

/// A validated speed level in `1..=5`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct SpeedLevel(u8);

impl SpeedLevel {
    pub fn new(level: u8) -> Result<Self, ConfigError> {
        if (MIN_SPEED_LEVEL..=MAX_SPEED_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(ConfigError::SpeedLevelOutOfRange(level))
        }
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    /// Returns the tick interval for this level.
    #[must_use]
    pub fn interval(self) -> Duration {
        Duration::from_millis(self.entry().0)
    }

    /// Returns the human-readable label for this level.
    #[must_use]
    pub fn label(self) -> &'static str {
        self.entry().1
    }

    /// One level faster, saturating at the top level.
    #[must_use]
    pub fn faster(self) -> Self {
        Self(self.0.saturating_add(1).min(MAX_SPEED_LEVEL))
    }

    /// One level slower, saturating at the bottom level.
    #[must_use]
    pub fn slower(self) -> Self {
        Self(self.0.saturating_sub(1).max(MIN_SPEED_LEVEL))
    }

    fn entry(self) -> (u64, &'static str) {
        SPEED_TABLE[usize::from(self.0 - MIN_SPEED_LEVEL)]
    }
}

impl Default for SpeedLevel {
    fn default() -> Self {
        Self(DEFAULT_SPEED_LEVEL)
    }
}

impl fmt::Display for SpeedLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.label())
    }
}

/// Flat colors used to paint the canvas.
#[derive(Debug)]
pub struct Palette {
    pub background: Rgb,
    /// Grid lines are white blended over the background at this opacity.
    pub grid_line: Rgb,
    pub grid_alpha: f32,
    pub food: Rgb,
    pub snake_head: Rgb,
    pub snake_body: Rgb,
    /// Game-over dimming, blended over the whole canvas.
    pub overlay: Rgb,
    pub overlay_alpha: f32,
}

pub const PALETTE: Palette = Palette {
    background: Rgb(0x1C, 0x1C, 0x1E),
    grid_line: Rgb(0xFF, 0xFF, 0xFF),
    grid_alpha: 0.08,
    food: Rgb(0xFF, 0x3B, 0x30),
    snake_head: Rgb(0x34, 0xC7, 0x59),
    snake_body: Rgb(0x30, 0xD1, 0x58),
    overlay: Rgb(0x00, 0x00, 0x00),
    overlay_alpha: 0.7,
};

/// Pixel measurements of one drawn cell, derived from the cell size.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CellGeometry {
    /// Gap left on every side of a snake segment.
    pub inset: u32,
    pub corner_radius: u32,
    pub food_radius: u32,
}

impl CellGeometry {
    #[must_use]
    pub fn for_cell_size(cell_size: u16) -> Self {
        let size = u32::from(cell_size);
        Self {
            inset: u32::from(size >= 8),
            // Below two pixels a rounded corner leaves every pixel filled.
            corner_radius: (size / 5).max(2).min(size / 2),
            food_radius: (size / 2).saturating_sub(size / 10),
        }
    }
}

/// Upper half-block glyph: fg paints the top pixel, bg the bottom one.
pub const GLYPH_HALF_UPPER: &str = "▀";
