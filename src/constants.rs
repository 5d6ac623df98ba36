//! Centralized constants for the dungeon tile core.
//!
//! Layer indices, corridor geometry and grid defaults shared by the stamper,
//! the tracer and the Bevy plugin.

// =====================================================
// Tile layers
// =====================================================

/// Layer index of the ground plane (walkability is read from here)
pub const FLOOR_LAYER: i32 = 0;

/// Layer index of the middle plane (top-edge walls live here)
pub const MIDDLE_LAYER: i32 = 1;

/// Layer index of the top plane (side/bottom walls and corners)
pub const TOP_LAYER: i32 = 2;

/// Name of the custom per-cell attribute that selects the target layer in room templates
pub const CUSTOM_TILE_LAYER_NAME: &str = "TileLayer";

// =====================================================
// Corridors
// =====================================================

/// Default corridor cross-section in cells, walls included
pub const CORRIDOR_WIDTH: i32 = 4;

/// Narrowest corridor that still has two wall rows
pub const MIN_CORRIDOR_WIDTH: i32 = 2;

// =====================================================
// Grid
// =====================================================

/// Default cell edge length in polygon space
pub const DEFAULT_CELL_SIZE: f32 = 16.0;

/// Atlas source id used when a catalogue does not name one
pub const DEFAULT_TILE_SOURCE: u32 = 1;
