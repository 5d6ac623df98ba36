//! Sparse three-layer tile grid.
//!
//! The host renderer owns the real tile map; the stamper writes through
//! [`GridMut`] and the contour tracer reads through [`GridView`]. [`TileGrid`]
//! is the in-memory implementation used by the plugin, the demo binary and
//! the tests.

use std::collections::HashMap;

use bevy::math::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Sha3_256};

use crate::constants::{DEFAULT_CELL_SIZE, FLOOR_LAYER, MIDDLE_LAYER, TOP_LAYER};

/// One of the three stacked tile planes, ordered bottom to top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Layer {
    Floor,
    Middle,
    Top,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Floor, Layer::Middle, Layer::Top];

    pub fn index(self) -> i32 {
        match self {
            Layer::Floor => FLOOR_LAYER,
            Layer::Middle => MIDDLE_LAYER,
            Layer::Top => TOP_LAYER,
        }
    }

    /// Resolve a template's custom layer attribute, clamped into [Floor, Top]
    pub fn from_attribute(value: i32) -> Self {
        match value.clamp(FLOOR_LAYER, TOP_LAYER) {
            FLOOR_LAYER => Layer::Floor,
            MIDDLE_LAYER => Layer::Middle,
            _ => Layer::Top,
        }
    }

    fn slot(self) -> usize {
        self.index() as usize
    }
}

/// A stamped tile: atlas source plus the pattern coordinate inside it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCell {
    pub source_id: u32,
    pub atlas: IVec2,
}

impl TileCell {
    pub fn new(source_id: u32, atlas: IVec2) -> Self {
        Self { source_id, atlas }
    }
}

/// Integer rectangle in cell units. Sizes may be zero; nothing is iterated then.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellRect {
    pub position: IVec2,
    pub size: IVec2,
}

impl CellRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            position: IVec2::new(x, y),
            size: IVec2::new(width, height),
        }
    }

    /// Normalised rectangle spanning two corner cells (size is the absolute delta)
    pub fn from_corners(a: IVec2, b: IVec2) -> Self {
        Self {
            position: a.min(b),
            size: (a - b).abs(),
        }
    }

    pub fn with_width(self, width: i32) -> Self {
        Self {
            size: IVec2::new(width, self.size.y),
            ..self
        }
    }

    pub fn with_height(self, height: i32) -> Self {
        Self {
            size: IVec2::new(self.size.x, height),
            ..self
        }
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// One past the last cell on both axes
    pub fn end(&self) -> IVec2 {
        self.position + self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        let end = self.end();
        pos.x >= self.position.x && pos.y >= self.position.y && pos.x < end.x && pos.y < end.y
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &CellRect) -> CellRect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let min = self.position.min(other.position);
        let max = self.end().max(other.end());
        CellRect {
            position: min,
            size: max - min,
        }
    }

    /// Cells in row-major order (y outer, x inner)
    pub fn cells(&self) -> impl Iterator<Item = IVec2> {
        let origin = self.position;
        let width = self.size.x.max(0);
        let height = self.size.y.max(0);
        (0..height).flat_map(move |dy| (0..width).map(move |dx| origin + IVec2::new(dx, dy)))
    }
}

/// Read access to a layered tile grid
pub trait GridView {
    fn cell(&self, layer: Layer, pos: IVec2) -> Option<TileCell>;

    /// Bounding rectangle of every occupied cell on any layer
    fn used_rect(&self) -> CellRect;

    /// Edge length of one cell in polygon space
    fn cell_size(&self) -> f32;

    /// A cell is walkable iff the floor layer holds a tile there.
    /// Never fails for coordinates outside the used rectangle.
    fn is_walkable(&self, pos: IVec2) -> bool {
        self.cell(Layer::Floor, pos).is_some()
    }

    fn cell_center(&self, pos: IVec2) -> Vec2 {
        (pos.as_vec2() + Vec2::splat(0.5)) * self.cell_size()
    }

    fn cell_at_position(&self, position: Vec2) -> IVec2 {
        (position / self.cell_size()).floor().as_ivec2()
    }

    /// Walkability of the cell under a polygon-space position
    fn is_walkable_position(&self, position: Vec2) -> bool {
        self.is_walkable(self.cell_at_position(position))
    }
}

/// Write access, used only by the stamping pass
pub trait GridMut: GridView {
    fn set_cell(&mut self, layer: Layer, pos: IVec2, cell: TileCell);

    fn clear_cell(&mut self, layer: Layer, pos: IVec2);

    fn fill_rect(&mut self, layer: Layer, rect: CellRect, cell: TileCell) {
        for pos in rect.cells() {
            self.set_cell(layer, pos, cell);
        }
    }

    fn clear_rect(&mut self, layer: Layer, rect: CellRect) {
        for pos in rect.cells() {
            self.clear_cell(layer, pos);
        }
    }
}

/// In-memory sparse grid, one hash map per layer
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    layers: [HashMap<IVec2, TileCell>; 3],
    cell_size: f32,
}

impl Default for TileGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl TileGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            layers: Default::default(),
            cell_size: cell_size.max(f32::EPSILON),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(HashMap::is_empty)
    }

    pub fn len(&self, layer: Layer) -> usize {
        self.layers[layer.slot()].len()
    }

    pub fn clear(&mut self) {
        for layer in &mut self.layers {
            layer.clear();
        }
    }

    /// Cells of one layer sorted by (y, x)
    pub fn sorted_cells(&self, layer: Layer) -> Vec<(IVec2, TileCell)> {
        let mut cells: Vec<(IVec2, TileCell)> = self.layers[layer.slot()]
            .iter()
            .map(|(pos, cell)| (*pos, *cell))
            .collect();
        cells.sort_by_key(|(pos, _)| (pos.y, pos.x));
        cells
    }

    pub fn walkable_count(&self) -> usize {
        self.len(Layer::Floor)
    }

    /// SHA3-256 digest of every layer in sorted coordinate order.
    /// Equal grids always produce equal fingerprints.
    pub fn fingerprint(&self) -> [u8; 32] {
        let mut hasher = Sha3_256::new();
        hasher.update(self.cell_size.to_le_bytes());
        for layer in Layer::ALL {
            hasher.update(layer.index().to_le_bytes());
            for (pos, cell) in self.sorted_cells(layer) {
                hasher.update(pos.x.to_le_bytes());
                hasher.update(pos.y.to_le_bytes());
                hasher.update(cell.source_id.to_le_bytes());
                hasher.update(cell.atlas.x.to_le_bytes());
                hasher.update(cell.atlas.y.to_le_bytes());
            }
        }
        let digest = hasher.finalize();
        let mut out = [0u8; 32];
        out.copy_from_slice(&digest);
        out
    }

    /// ASCII dump of the walkability layer ('.' walkable, '#' blocked)
    pub fn render_walkable(&self) -> String {
        let rect = self.used_rect();
        let mut out = String::new();
        for y in rect.position.y..rect.end().y {
            for x in rect.position.x..rect.end().x {
                out.push(if self.is_walkable(IVec2::new(x, y)) {
                    '.'
                } else {
                    '#'
                });
            }
            out.push('\n');
        }
        out
    }
}

impl GridView for TileGrid {
    fn cell(&self, layer: Layer, pos: IVec2) -> Option<TileCell> {
        self.layers[layer.slot()].get(&pos).copied()
    }

    fn used_rect(&self) -> CellRect {
        let mut min = IVec2::MAX;
        let mut max = IVec2::MIN;
        let mut any = false;
        for layer in &self.layers {
            for pos in layer.keys() {
                min = min.min(*pos);
                max = max.max(*pos);
                any = true;
            }
        }
        if !any {
            return CellRect::default();
        }
        CellRect {
            position: min,
            size: max - min + IVec2::ONE,
        }
    }

    fn cell_size(&self) -> f32 {
        self.cell_size
    }
}

impl GridMut for TileGrid {
    fn set_cell(&mut self, layer: Layer, pos: IVec2, cell: TileCell) {
        self.layers[layer.slot()].insert(pos, cell);
    }

    fn clear_cell(&mut self, layer: Layer, pos: IVec2) {
        self.layers[layer.slot()].remove(&pos);
    }
}
