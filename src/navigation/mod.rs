//! Navigation polygons traced from the floor layer.
//!
//! One pass scans the grid's used rectangle row by row. Every walkable cell
//! not yet walked by an earlier trace is a seed candidate:
//! - nothing walkable above → outer contour
//! - nothing walkable below → inner contour (a hole boundary)
//! - otherwise interior, skipped
//!
//! Polygon points are cell centers. Two contours sharing a cell (a 1-wide
//! passage) fail the whole pass; stuck traces just produce no polygon.

pub mod tracer;

use bevy::math::{IVec2, Vec2};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::grid::GridView;
use crate::logging::TimingSpan;

pub use tracer::{trace_contour, ContourKind, Heading, VisitedCells};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("Contours overlap at cell ({}, {})", cell.x, cell.y)]
    Overlap { cell: IVec2 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavigationPolygonType {
    Outer,
    Inner,
}

impl From<ContourKind> for NavigationPolygonType {
    fn from(kind: ContourKind) -> Self {
        match kind {
            ContourKind::Outer => NavigationPolygonType::Outer,
            ContourKind::Inner => NavigationPolygonType::Inner,
        }
    }
}

/// One closed outline; the last point connects back to the first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationPolygonData {
    pub kind: NavigationPolygonType,
    pub points: Vec<Vec2>,
}

impl NavigationPolygonData {
    pub fn is_outer(&self) -> bool {
        self.kind == NavigationPolygonType::Outer
    }

    /// Shoelace area; positive for clockwise outlines on a y-down grid
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum::<f32>()
            * 0.5
    }
}

/// Statistics of one tracing pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationReport {
    pub outer: usize,
    pub inner: usize,
    pub degenerate: usize,
    pub visited_cells: usize,
}

/// Runs the scan-and-trace pass over a grid
#[derive(Debug, Default)]
pub struct NavigationBuilder {
    visited: VisitedCells,
    outer: Vec<NavigationPolygonData>,
    inner: Vec<NavigationPolygonData>,
    report: NavigationReport,
}

impl NavigationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trace every contour of `grid`; outer polygons come first, then inner,
    /// each group in scan order
    pub fn build<G: GridView + ?Sized>(
        mut self,
        grid: &G,
    ) -> Result<(Vec<NavigationPolygonData>, NavigationReport), NavigationError> {
        let _span = TimingSpan::new("navigation_polygons");

        for cell in grid.used_rect().cells() {
            if !grid.is_walkable(cell) || self.visited.contains(cell) {
                continue;
            }
            let kind = if !grid.is_walkable(cell - IVec2::Y) {
                ContourKind::Outer
            } else if !grid.is_walkable(cell + IVec2::Y) {
                ContourKind::Inner
            } else {
                continue;
            };
            self.trace(grid, kind, cell)?;
        }

        self.report.visited_cells = self.visited.len();
        info!(
            outer = self.report.outer,
            inner = self.report.inner,
            degenerate = self.report.degenerate,
            "Navigation polygons built"
        );

        let mut polygons = self.outer;
        polygons.extend(self.inner);
        Ok((polygons, self.report))
    }

    fn trace<G: GridView + ?Sized>(
        &mut self,
        grid: &G,
        kind: ContourKind,
        seed: IVec2,
    ) -> Result<(), NavigationError> {
        match trace_contour(grid, kind, seed, &mut self.visited)? {
            Some(points) => {
                debug!(?kind, seed = ?seed, points = points.len(), "Contour traced");
                let polygon = NavigationPolygonData {
                    kind: kind.into(),
                    points,
                };
                match kind {
                    ContourKind::Outer => {
                        self.outer.push(polygon);
                        self.report.outer += 1;
                    }
                    ContourKind::Inner => {
                        self.inner.push(polygon);
                        self.report.inner += 1;
                    }
                }
            }
            None => {
                debug!(?kind, seed = ?seed, "Degenerate contour, no polygon");
                self.visited.mark(seed);
                self.report.degenerate += 1;
            }
        }
        Ok(())
    }
}

/// Every navigation polygon of `grid`: all outer outlines, then all holes
pub fn generate_navigation_polygons<G: GridView + ?Sized>(
    grid: &G,
) -> Result<Vec<NavigationPolygonData>, NavigationError> {
    NavigationBuilder::new().build(grid).map(|(polygons, _)| polygons)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellRect, GridMut, Layer, TileCell, TileGrid};

    fn walkable(rects: &[CellRect]) -> TileGrid {
        let mut grid = TileGrid::new(1.0);
        for rect in rects {
            grid.fill_rect(Layer::Floor, *rect, TileCell::new(1, IVec2::ZERO));
        }
        grid
    }

    fn corners(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x1, y0),
            Vec2::new(x1, y1),
            Vec2::new(x0, y1),
        ]
    }

    #[test]
    fn test_five_by_five_block() {
        let grid = walkable(&[CellRect::new(0, 0, 5, 5)]);
        let polygons = generate_navigation_polygons(&grid).unwrap();
        assert_eq!(polygons.len(), 1);
        assert!(polygons[0].is_outer());
        assert_eq!(polygons[0].points, corners(0.5, 0.5, 4.5, 4.5));
    }

    #[test]
    fn test_empty_grid_has_no_polygons() {
        let grid = TileGrid::new(16.0);
        let (polygons, report) = NavigationBuilder::new().build(&grid).unwrap();
        assert!(polygons.is_empty());
        assert_eq!(report, NavigationReport::default());
    }

    #[test]
    fn test_hole_gives_inner_polygon() {
        let mut grid = walkable(&[CellRect::new(0, 0, 7, 7)]);
        grid.clear_cell(Layer::Floor, IVec2::new(3, 3));

        let (polygons, report) = NavigationBuilder::new().build(&grid).unwrap();
        assert_eq!(report.outer, 1);
        assert_eq!(report.inner, 1);
        assert_eq!(polygons[0].points, corners(0.5, 0.5, 6.5, 6.5));
        assert_eq!(polygons[1].kind, NavigationPolygonType::Inner);
        assert_eq!(polygons[1].points, corners(2.5, 2.5, 4.5, 4.5));
    }

    #[test]
    fn test_outer_polygons_precede_inner() {
        // Left block has a hole, right block is plain; the right outer comes
        // after the left inner in scan order but is still listed first
        let mut grid = walkable(&[CellRect::new(0, 0, 7, 7), CellRect::new(10, 4, 3, 3)]);
        grid.clear_cell(Layer::Floor, IVec2::new(3, 3));

        let polygons = generate_navigation_polygons(&grid).unwrap();
        let kinds: Vec<_> = polygons.iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                NavigationPolygonType::Outer,
                NavigationPolygonType::Outer,
                NavigationPolygonType::Inner,
            ]
        );
        assert_eq!(polygons[1].points, corners(10.5, 4.5, 12.5, 6.5));
    }

    #[test]
    fn test_isolated_cell_counted_as_degenerate() {
        let grid = walkable(&[CellRect::new(0, 0, 4, 4), CellRect::new(8, 8, 1, 1)]);
        let (polygons, report) = NavigationBuilder::new().build(&grid).unwrap();
        assert_eq!(polygons.len(), 1);
        assert_eq!(report.degenerate, 1);
    }

    #[test]
    fn test_one_wide_bridge_overlaps() {
        // Two 3x3 blocks joined by a single cell at (3, 1)
        let grid = walkable(&[
            CellRect::new(0, 0, 3, 3),
            CellRect::new(3, 1, 1, 1),
            CellRect::new(4, 0, 3, 3),
        ]);
        assert_eq!(
            generate_navigation_polygons(&grid),
            Err(NavigationError::Overlap {
                cell: IVec2::new(4, 1)
            })
        );
    }

    #[test]
    fn test_retrace_is_deterministic() {
        let mut grid = walkable(&[CellRect::new(0, 0, 9, 6), CellRect::new(12, 0, 4, 4)]);
        grid.clear_cell(Layer::Floor, IVec2::new(4, 3));
        let first = generate_navigation_polygons(&grid).unwrap();
        let second = generate_navigation_polygons(&grid).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_signed_area_of_outline() {
        let polygon = NavigationPolygonData {
            kind: NavigationPolygonType::Outer,
            points: corners(0.5, 0.5, 4.5, 4.5),
        };
        assert!((polygon.signed_area() - 16.0).abs() < 1e-5);
    }

    #[test]
    fn test_polygon_json_shape() {
        let polygon = NavigationPolygonData {
            kind: NavigationPolygonType::Inner,
            points: vec![Vec2::new(1.5, 2.5)],
        };
        let json = serde_json::to_string(&polygon).unwrap();
        assert!(json.contains("\"Inner\""));
        let restored: NavigationPolygonData = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, polygon);
    }
}
