//! Prefabricated room templates.
//!
//! A template is a small tile scene authored by hand. Every cell carries a
//! custom integer attribute naming the layer it belongs on; the stamper
//! copies a region of the template into the room and drops the instance.

use std::collections::{BTreeMap, HashMap};

use bevy::math::IVec2;
use serde::{Deserialize, Serialize};

use crate::constants::{CUSTOM_TILE_LAYER_NAME, FLOOR_LAYER};
use crate::grid::{Layer, TileCell};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateCell {
    pub position: IVec2,
    pub tile: TileCell,
    #[serde(default)]
    pub custom: BTreeMap<String, i32>,
}

impl TemplateCell {
    pub fn new(position: IVec2, tile: TileCell, layer: i32) -> Self {
        let mut custom = BTreeMap::new();
        custom.insert(CUSTOM_TILE_LAYER_NAME.to_string(), layer);
        Self {
            position,
            tile,
            custom,
        }
    }

    /// Target layer from the custom attribute, clamped; floor when absent
    pub fn layer(&self) -> Layer {
        Layer::from_attribute(
            self.custom
                .get(CUSTOM_TILE_LAYER_NAME)
                .copied()
                .unwrap_or(FLOOR_LAYER),
        )
    }
}

/// An instantiated template scene
#[derive(Debug, Clone, Default)]
pub struct RoomTemplate {
    cells: HashMap<IVec2, TemplateCell>,
}

impl RoomTemplate {
    pub fn from_cells(cells: impl IntoIterator<Item = TemplateCell>) -> Self {
        Self {
            cells: cells.into_iter().map(|cell| (cell.position, cell)).collect(),
        }
    }

    pub fn cell(&self, pos: IVec2) -> Option<&TemplateCell> {
        self.cells.get(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Source of template scenes, keyed by scene path
pub trait TemplateLibrary {
    fn contains(&self, scene_path: &str) -> bool;

    /// Fresh instance of the scene; the caller owns and drops it
    fn instantiate(&self, scene_path: &str) -> Option<RoomTemplate>;
}

/// In-memory template library
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateCatalog {
    scenes: BTreeMap<String, Vec<TemplateCell>>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scene_path: impl Into<String>, cells: Vec<TemplateCell>) {
        self.scenes.insert(scene_path.into(), cells);
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

impl TemplateLibrary for TemplateCatalog {
    fn contains(&self, scene_path: &str) -> bool {
        self.scenes.contains_key(scene_path)
    }

    fn instantiate(&self, scene_path: &str) -> Option<RoomTemplate> {
        self.scenes
            .get(scene_path)
            .map(|cells| RoomTemplate::from_cells(cells.iter().cloned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_layer_attribute() {
        let tile = TileCell::new(1, IVec2::new(2, 3));
        assert_eq!(TemplateCell::new(IVec2::ZERO, tile, 1).layer(), Layer::Middle);
        assert_eq!(TemplateCell::new(IVec2::ZERO, tile, 7).layer(), Layer::Top);
        assert_eq!(TemplateCell::new(IVec2::ZERO, tile, -3).layer(), Layer::Floor);

        let bare = TemplateCell {
            position: IVec2::ZERO,
            tile,
            custom: BTreeMap::new(),
        };
        assert_eq!(bare.layer(), Layer::Floor);
    }

    #[test]
    fn test_catalog_instantiates_fresh_copies() {
        let tile = TileCell::new(1, IVec2::ZERO);
        let mut catalog = TemplateCatalog::new();
        catalog.insert(
            "rooms/shrine",
            vec![
                TemplateCell::new(IVec2::new(0, 0), tile, 2),
                TemplateCell::new(IVec2::new(1, 0), tile, 0),
            ],
        );

        assert!(catalog.contains("rooms/shrine"));
        assert!(!catalog.contains("rooms/missing"));
        assert!(catalog.instantiate("rooms/missing").is_none());

        let instance = catalog.instantiate("rooms/shrine").unwrap();
        assert_eq!(instance.len(), 2);
        assert_eq!(instance.cell(IVec2::new(0, 0)).unwrap().layer(), Layer::Top);
        assert!(instance.cell(IVec2::new(5, 5)).is_none());
    }
}
