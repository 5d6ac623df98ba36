//! Tile stamper: writes rooms and corridors of a [`DungeonGraph`] into a grid.
//!
//! ## Pipeline
//! ```text
//! graph + catalogue → validate (doors, templates, corridor width)
//!       → rooms in post-order (children before parents)
//!             bordered rectangle  |  template copy
//!       → door pairs, each once (lower room id stamps it)
//!             straight gallery    |  two arms + crossing square
//!       → StampReport
//! ```
//!
//! Nothing is written until validation passes, so a bad catalogue or graph
//! leaves the grid untouched.

pub mod crossing;
mod gallery;

use bevy::math::IVec2;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::autotile::{AutoTileConfig, AutoTileSpec, ConfigError, TileRole};
use crate::constants::{CORRIDOR_WIDTH, MIN_CORRIDOR_WIDTH};
use crate::grid::{CellRect, GridMut, Layer};
use crate::logging::TimingSpan;
use crate::room::{DoorInfo, DungeonGraph, LayoutError, RoomId, RoomInfo, RoomSplit, TemplateLibrary};

pub use crossing::{arm_rect, CornerStamp, CrossingShape};

/// Error type for a stamping pass; raised before any cell is written
#[derive(Debug, thiserror::Error)]
pub enum StampError {
    #[error("Tile catalogue error: {0}")]
    Config(#[from] ConfigError),
    #[error("Room layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Summary of one stamping pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampReport {
    pub rooms: usize,
    pub template_rooms: usize,
    pub corridors: usize,
    pub crossings: usize,
    /// Crossing door pairs with no corner pattern (both doors facing the same way)
    pub unmatched_crossings: usize,
}

/// Grid writer bound to one catalogue
pub(crate) struct Brush<'a, G: GridMut> {
    grid: &'a mut G,
    config: &'a AutoTileConfig,
}

impl<'a, G: GridMut> Brush<'a, G> {
    pub(crate) fn new(grid: &'a mut G, config: &'a AutoTileConfig) -> Self {
        Self { grid, config }
    }

    pub(crate) fn fill(&mut self, layer: Layer, role: TileRole, rect: CellRect) {
        self.grid.fill_rect(layer, rect, self.config.pattern(role));
    }

    /// Cut a wall gap: clear the wall layer and lay ground underneath
    pub(crate) fn open(&mut self, layer: Layer, rect: CellRect) {
        self.grid.clear_rect(layer, rect);
        self.fill(Layer::Floor, TileRole::Ground, rect);
    }

    /// Ground inside, walls and inner corners around
    pub(crate) fn bordered_room(&mut self, position: IVec2, size: IVec2) {
        let (x, y, w, h) = (position.x, position.y, size.x, size.y);

        self.fill(Layer::Floor, TileRole::Ground, CellRect::new(x + 1, y + 1, w - 2, h - 2));

        self.fill(Layer::Top, TileRole::InLt, CellRect::new(x, y, 1, 1));
        self.fill(Layer::Top, TileRole::L, CellRect::new(x, y + 1, 1, h - 2));
        self.fill(Layer::Top, TileRole::InLb, CellRect::new(x, y + h - 1, 1, 1));
        self.fill(Layer::Top, TileRole::B, CellRect::new(x + 1, y + h - 1, w - 2, 1));
        self.fill(Layer::Top, TileRole::InRb, CellRect::new(x + w - 1, y + h - 1, 1, 1));
        self.fill(Layer::Top, TileRole::R, CellRect::new(x + w - 1, y + 1, 1, h - 2));
        self.fill(Layer::Top, TileRole::InRt, CellRect::new(x + w - 1, y, 1, 1));
        self.fill(Layer::Middle, TileRole::T, CellRect::new(x + 1, y, w - 2, 1));
    }
}

/// Stamps room graphs with one tile catalogue
#[derive(Debug, Clone)]
pub struct TileStamper<'c> {
    config: &'c AutoTileConfig,
    corridor_width: i32,
}

impl<'c> TileStamper<'c> {
    pub fn new(config: &'c AutoTileConfig) -> Self {
        Self {
            config,
            corridor_width: CORRIDOR_WIDTH,
        }
    }

    pub fn with_corridor_width(mut self, width: i32) -> Self {
        self.corridor_width = width;
        self
    }

    pub fn corridor_width(&self) -> i32 {
        self.corridor_width
    }

    /// Stamp `root` and its whole `next` subtree into `grid`
    pub fn stamp<G: GridMut, T: TemplateLibrary>(
        &self,
        grid: &mut G,
        graph: &DungeonGraph,
        templates: &T,
        root: RoomId,
    ) -> Result<StampReport, StampError> {
        let _span = TimingSpan::new("stamp_dungeon");

        let order = self.validate(graph, templates, root)?;
        let mut report = StampReport::default();
        let mut brush = Brush::new(grid, self.config);

        // Every room border lands before any corridor cuts a gap into it
        for id in &order {
            let room = graph.room(*id).ok_or(LayoutError::UnknownRoom(*id))?;
            self.stamp_room(&mut brush, templates, room, &mut report);
        }
        for id in &order {
            let room = graph.room(*id).ok_or(LayoutError::UnknownRoom(*id))?;
            self.stamp_room_doors(&mut brush, graph, room, &mut report);
        }

        info!(
            rooms = report.rooms,
            corridors = report.corridors,
            crossings = report.crossings,
            "Dungeon stamped"
        );
        Ok(report)
    }

    fn validate<T: TemplateLibrary>(
        &self,
        graph: &DungeonGraph,
        templates: &T,
        root: RoomId,
    ) -> Result<Vec<RoomId>, LayoutError> {
        if self.corridor_width < MIN_CORRIDOR_WIDTH {
            return Err(LayoutError::CorridorTooNarrow(self.corridor_width));
        }
        graph.validate()?;
        let order = graph.post_order(root)?;
        for id in &order {
            let room = graph.room(*id).ok_or(LayoutError::UnknownRoom(*id))?;
            if let Some(split) = &room.split {
                if !templates.contains(&split.scene_path) {
                    return Err(LayoutError::MissingTemplate {
                        room: room.id,
                        scene_path: split.scene_path.clone(),
                    });
                }
            }
        }
        Ok(order)
    }

    fn stamp_room<G: GridMut, T: TemplateLibrary>(
        &self,
        brush: &mut Brush<'_, G>,
        templates: &T,
        room: &RoomInfo,
        report: &mut StampReport,
    ) {
        match &room.split {
            None => brush.bordered_room(room.position, room.size),
            Some(split) => {
                self.stamp_template(brush, templates, room, split);
                report.template_rooms += 1;
            }
        }
        report.rooms += 1;
        debug!(room = %room.id, template = room.split.is_some(), "Room stamped");
    }

    fn stamp_template<G: GridMut, T: TemplateLibrary>(
        &self,
        brush: &mut Brush<'_, G>,
        templates: &T,
        room: &RoomInfo,
        split: &RoomSplit,
    ) {
        let Some(instance) = templates.instantiate(&split.scene_path) else {
            warn!(room = %room.id, scene = %split.scene_path, "Template vanished after validation");
            return;
        };

        let region = split.region;
        for offset in CellRect::new(0, 0, region.width(), region.height()).cells() {
            if let Some(cell) = instance.cell(region.position + offset) {
                brush
                    .grid
                    .set_cell(cell.layer(), room.position + offset, cell.tile);
            }
        }
        // `instance` is dropped here; templates are never kept past one room
    }

    fn stamp_room_doors<G: GridMut>(
        &self,
        brush: &mut Brush<'_, G>,
        graph: &DungeonGraph,
        room: &RoomInfo,
        report: &mut StampReport,
    ) {
        for door in &room.doors {
            // The pair is laid once, from the room with the smaller id
            if door.connect_room <= room.id {
                continue;
            }
            let Some(other) = graph.connected_door(door) else {
                warn!(room = %room.id, connect = %door.connect_room, "Door has no partner");
                continue;
            };
            self.stamp_door_pair(brush, door, other, report);
        }
    }

    fn stamp_door_pair<G: GridMut>(
        &self,
        brush: &mut Brush<'_, G>,
        door: &DoorInfo,
        other: &DoorInfo,
        report: &mut StampReport,
    ) {
        match door.cross {
            None => {
                let rect = brush.straight_corridor(door, other, self.corridor_width);
                report.corridors += 1;
                debug!(from = %door.room, to = %other.room, ?rect, "Corridor stamped");
            }
            Some(cross) => {
                let shape = brush.crossing_corridor(door, other, cross, self.corridor_width);
                report.crossings += 1;
                if shape.is_none() {
                    report.unmatched_crossings += 1;
                }
                debug!(from = %door.room, to = %other.room, ?shape, "Crossing corridor stamped");
            }
        }
    }
}

/// Resolve `spec` and stamp in one call
pub fn stamp_dungeon<G: GridMut, T: TemplateLibrary>(
    grid: &mut G,
    spec: &AutoTileSpec,
    graph: &DungeonGraph,
    templates: &T,
    root: RoomId,
) -> Result<StampReport, StampError> {
    let config = spec.resolve()?;
    TileStamper::new(&config).stamp(grid, graph, templates, root)
}
