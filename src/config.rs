//! RON bundle describing one dungeon: catalogue, room graph, templates.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::autotile::{AutoTileSpec, ConfigError};
use crate::constants::{CORRIDOR_WIDTH, DEFAULT_CELL_SIZE};
use crate::grid::TileGrid;
use crate::room::{DungeonGraph, RoomId, TemplateCatalog};
use crate::stamper::{StampError, StampReport, TileStamper};

fn default_cell_size() -> f32 {
    DEFAULT_CELL_SIZE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DungeonFile {
    pub tiles: AutoTileSpec,
    pub graph: DungeonGraph,
    pub root: RoomId,
    #[serde(default)]
    pub corridor_width: Option<i32>,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default)]
    pub templates: TemplateCatalog,
}

impl DungeonFile {
    pub fn new(tiles: AutoTileSpec, graph: DungeonGraph, root: RoomId) -> Self {
        Self {
            tiles,
            graph,
            root,
            corridor_width: None,
            cell_size: DEFAULT_CELL_SIZE,
            templates: TemplateCatalog::new(),
        }
    }

    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn corridor_width(&self) -> i32 {
        self.corridor_width.unwrap_or(CORRIDOR_WIDTH)
    }

    /// Resolve the catalogue and stamp into a fresh grid
    pub fn stamp(&self) -> Result<(TileGrid, StampReport), StampError> {
        let config = self.tiles.resolve()?;
        let mut grid = TileGrid::new(self.cell_size);
        let report = TileStamper::new(&config)
            .with_corridor_width(self.corridor_width())
            .stamp(&mut grid, &self.graph, &self.templates, self.root)?;
        Ok((grid, report))
    }
}
