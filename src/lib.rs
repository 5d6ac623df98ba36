//! Dungeon Tile Core
//!
//! Turns a resolved room/door graph into tiles and tiles into navigation:
//! - Auto-tile catalogue (13 structural roles → atlas patterns)
//! - Room graph with door pairs and prefabricated templates
//! - Tile stamper (bordered rooms, straight galleries, crossing corridors)
//! - Contour tracer (outer and hole outlines from the floor layer)
//! - Bevy plugin wiring both passes to events
//! - Structured logging

pub mod autotile;
pub mod config;
pub mod constants;
pub mod grid;
pub mod logging;
pub mod navigation;
pub mod plugin;
pub mod room;
pub mod stamper;

pub use autotile::{AutoTileConfig, AutoTileSpec, ConfigError, TileRole};
pub use config::DungeonFile;
pub use grid::{CellRect, GridMut, GridView, Layer, TileCell, TileGrid};
pub use navigation::{
    generate_navigation_polygons, NavigationBuilder, NavigationError, NavigationPolygonData,
    NavigationPolygonType, NavigationReport,
};
pub use plugin::DungeonTilePlugin;
pub use room::{DoorDirection, DoorEnd, DungeonGraph, LayoutError, RoomId, TemplateCatalog};
pub use stamper::{StampError, StampReport, TileStamper};
