//! Straight corridor segments ("galleries").
//!
//! A gallery covers `width` cells across its axis: one wall row on each side
//! and ground between. Both ends get a gap cut into whatever wall sits one
//! cell beyond the gallery, normally the wall of the room the door belongs to.

use tracing::trace;

use super::Brush;
use crate::autotile::TileRole;
use crate::grid::{CellRect, GridMut, Layer};
use crate::room::DoorInfo;

impl<G: GridMut> Brush<'_, G> {
    /// East-west gallery: top wall on the middle layer, bottom wall on top
    pub(crate) fn horizontal_gallery(&mut self, rect: CellRect) {
        let (x, y, w, h) = (rect.position.x, rect.position.y, rect.width(), rect.height());

        self.fill(Layer::Floor, TileRole::Ground, CellRect::new(x, y + 1, w, h - 2));
        self.fill(Layer::Middle, TileRole::T, CellRect::new(x, y, w, 1));
        self.fill(Layer::Top, TileRole::B, CellRect::new(x, y + h - 1, w, 1));

        self.open(Layer::Top, CellRect::new(x - 1, y + 1, 1, h - 2));
        self.open(Layer::Top, CellRect::new(x + w, y + 1, 1, h - 2));
    }

    /// North-south gallery: side walls on the top layer
    pub(crate) fn vertical_gallery(&mut self, rect: CellRect) {
        let (x, y, w, h) = (rect.position.x, rect.position.y, rect.width(), rect.height());

        self.fill(Layer::Floor, TileRole::Ground, CellRect::new(x + 1, y, w - 2, h));
        self.fill(Layer::Top, TileRole::L, CellRect::new(x, y, 1, h));
        self.fill(Layer::Top, TileRole::R, CellRect::new(x + w - 1, y, 1, h));

        // A room's bottom wall is on the top layer, its top wall on the middle layer
        self.open(Layer::Top, CellRect::new(x + 1, y - 1, w - 2, 1));
        self.open(Layer::Middle, CellRect::new(x + 1, y + h, w - 2, 1));
    }

    pub(crate) fn gallery(&mut self, vertical: bool, rect: CellRect) {
        trace!(vertical, ?rect, "Gallery");
        if vertical {
            self.vertical_gallery(rect);
        } else {
            self.horizontal_gallery(rect);
        }
    }

    /// Gallery spanning the two door origins; returns its rectangle
    pub(crate) fn straight_corridor(&mut self, door: &DoorInfo, other: &DoorInfo, width: i32) -> CellRect {
        let span = CellRect::from_corners(door.origin, other.origin);
        let vertical = door.direction.is_vertical();
        let rect = if vertical {
            span.with_width(width)
        } else {
            span.with_height(width)
        };
        self.gallery(vertical, rect);
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autotile::{AutoTileConfig, AutoTileSpec};
    use crate::grid::{GridView, TileGrid};
    use bevy::math::IVec2;

    fn config() -> AutoTileConfig {
        AutoTileSpec::single_row(1).resolve().unwrap()
    }

    #[test]
    fn test_horizontal_gallery_layout() {
        let config = config();
        let mut grid = TileGrid::new(1.0);
        Brush::new(&mut grid, &config).horizontal_gallery(CellRect::new(10, 0, 3, 4));

        let t = config.pattern(TileRole::T);
        let b = config.pattern(TileRole::B);
        for x in 10..13 {
            assert_eq!(grid.cell(Layer::Middle, IVec2::new(x, 0)), Some(t));
            assert_eq!(grid.cell(Layer::Top, IVec2::new(x, 3)), Some(b));
            assert!(grid.is_walkable(IVec2::new(x, 1)));
            assert!(grid.is_walkable(IVec2::new(x, 2)));
        }
        // End caps are floored gap cells
        for x in [9, 13] {
            assert!(grid.is_walkable(IVec2::new(x, 1)));
            assert!(grid.cell(Layer::Top, IVec2::new(x, 1)).is_none());
            assert!(!grid.is_walkable(IVec2::new(x, 0)));
        }
        assert_eq!(grid.walkable_count(), 3 * 2 + 2 * 2);
    }

    #[test]
    fn test_vertical_gallery_clears_existing_walls() {
        let config = config();
        let mut grid = TileGrid::new(1.0);
        let wall = config.pattern(TileRole::B);
        let top = config.pattern(TileRole::T);
        grid.fill_rect(Layer::Top, CellRect::new(0, 4, 6, 1), wall);
        grid.fill_rect(Layer::Middle, CellRect::new(0, 10, 6, 1), top);

        Brush::new(&mut grid, &config).vertical_gallery(CellRect::new(1, 5, 4, 5));

        assert!(grid.cell(Layer::Top, IVec2::new(2, 4)).is_none());
        assert!(grid.cell(Layer::Top, IVec2::new(3, 4)).is_none());
        assert_eq!(grid.cell(Layer::Top, IVec2::new(1, 4)), Some(wall));
        assert!(grid.cell(Layer::Middle, IVec2::new(2, 10)).is_none());
        assert_eq!(grid.cell(Layer::Middle, IVec2::new(4, 10)), Some(top));

        assert_eq!(grid.cell(Layer::Top, IVec2::new(1, 7)), Some(config.pattern(TileRole::L)));
        assert_eq!(grid.cell(Layer::Top, IVec2::new(4, 7)), Some(config.pattern(TileRole::R)));
        for y in 4..=10 {
            assert!(grid.is_walkable(IVec2::new(2, y)), "column 2 blocked at {y}");
        }
    }
}
