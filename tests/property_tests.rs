//! Property-based tests using proptest
//!
//! Invariants that must hold for all generated inputs:
//! - Disjoint rectangles → one 4-point outer polygon each, on their corners
//! - Blocks with spaced 1x1 holes → one inner polygon per hole
//! - Rotating the floor by 90° rotates the polygon vertex sets
//! - Stamping is deterministic and idempotent

use std::collections::BTreeSet;

use bevy::math::{IVec2, Vec2};
use proptest::prelude::*;

use dungeon_core::grid::{CellRect, GridMut, GridView, Layer, TileCell, TileGrid};
use dungeon_core::navigation::{generate_navigation_polygons, NavigationPolygonData};
use dungeon_core::{AutoTileSpec, DungeonGraph, NavigationPolygonType, TemplateCatalog, TileStamper};

// ============================================================
// Helpers
// ============================================================

const SLOT: i32 = 12;

fn floor() -> TileCell {
    TileCell::new(1, IVec2::ZERO)
}

fn cell_of(point: Vec2) -> (i32, i32) {
    let cell = (point - Vec2::splat(0.5)).round();
    (cell.x as i32, cell.y as i32)
}

fn slot_origin(index: usize) -> IVec2 {
    IVec2::new((index % 3) as i32 * SLOT, (index / 3) as i32 * SLOT)
}

/// Hole cells of a `width` x `height` block: lattice points at least two
/// cells from the edge and three apart, filtered by `mask`
fn lattice_holes(width: i32, height: i32, mask: &[bool]) -> Vec<IVec2> {
    let mut holes = Vec::new();
    for j in 0..6 {
        for i in 0..6 {
            let hole = IVec2::new(2 + 3 * i, 2 + 3 * j);
            if hole.x <= width - 3 && hole.y <= height - 3 && mask[(j * 6 + i) as usize] {
                holes.push(hole);
            }
        }
    }
    holes
}

fn holed_block(width: i32, height: i32, holes: &[IVec2]) -> Vec<IVec2> {
    CellRect::new(0, 0, width, height)
        .cells()
        .filter(|cell| !holes.contains(cell))
        .collect()
}

fn grid_of(cells: &[IVec2]) -> TileGrid {
    let mut grid = TileGrid::new(1.0);
    for cell in cells {
        grid.set_cell(Layer::Floor, *cell, floor());
    }
    grid
}

fn vertex_sets(polygons: &[NavigationPolygonData]) -> Vec<(bool, BTreeSet<(i32, i32)>)> {
    let mut sets: Vec<(bool, BTreeSet<(i32, i32)>)> = polygons
        .iter()
        .map(|p| (p.is_outer(), p.points.iter().map(|pt| cell_of(*pt)).collect()))
        .collect();
    sets.sort();
    sets
}

fn rotate((x, y): (i32, i32)) -> (i32, i32) {
    (-y, x)
}

// ============================================================
// Outer contours
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_disjoint_rects_trace_to_their_corners(
        sizes in prop::collection::vec((2i32..=10, 2i32..=10), 1..7)
    ) {
        let mut grid = TileGrid::new(1.0);
        let mut expected = Vec::new();
        for (index, (w, h)) in sizes.iter().enumerate() {
            let origin = slot_origin(index);
            grid.fill_rect(Layer::Floor, CellRect::new(origin.x, origin.y, *w, *h), floor());
            let end = origin + IVec2::new(w - 1, h - 1);
            expected.push(vec![
                (origin.x, origin.y),
                (end.x, origin.y),
                (end.x, end.y),
                (origin.x, end.y),
            ]);
        }

        let polygons = generate_navigation_polygons(&grid).unwrap();
        prop_assert_eq!(polygons.len(), sizes.len());
        for (polygon, corners) in polygons.iter().zip(&expected) {
            prop_assert_eq!(polygon.kind, NavigationPolygonType::Outer);
            let traced: Vec<_> = polygon.points.iter().map(|p| cell_of(*p)).collect();
            prop_assert_eq!(&traced, corners);
        }
    }
}

// ============================================================
// Inner contours
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_each_hole_gets_an_inner_polygon(
        width in 7i32..=20,
        height in 7i32..=20,
        mask in prop::collection::vec(any::<bool>(), 36)
    ) {
        let holes = lattice_holes(width, height, &mask);
        let grid = grid_of(&holed_block(width, height, &holes));

        let polygons = generate_navigation_polygons(&grid).unwrap();
        prop_assert_eq!(polygons.len(), 1 + holes.len());
        prop_assert!(polygons[0].is_outer());
        prop_assert_eq!(polygons[0].points.len(), 4);

        // Holes are found in scan order, which is the lattice order
        for (polygon, hole) in polygons[1..].iter().zip(&holes) {
            prop_assert_eq!(polygon.kind, NavigationPolygonType::Inner);
            let traced: Vec<_> = polygon.points.iter().map(|p| cell_of(*p)).collect();
            prop_assert_eq!(
                traced,
                vec![
                    (hole.x - 1, hole.y - 1),
                    (hole.x + 1, hole.y - 1),
                    (hole.x + 1, hole.y + 1),
                    (hole.x - 1, hole.y + 1),
                ]
            );
        }
    }

    #[test]
    fn prop_rotation_rotates_vertex_sets(
        width in 7i32..=16,
        height in 7i32..=16,
        mask in prop::collection::vec(any::<bool>(), 36),
        turns in 1usize..=3
    ) {
        let holes = lattice_holes(width, height, &mask);
        let cells = holed_block(width, height, &holes);
        let original = generate_navigation_polygons(&grid_of(&cells)).unwrap();

        let rotated_cells: Vec<IVec2> = cells
            .iter()
            .map(|c| {
                let mut p = (c.x, c.y);
                for _ in 0..turns {
                    p = rotate(p);
                }
                IVec2::new(p.0, p.1)
            })
            .collect();
        let rotated = generate_navigation_polygons(&grid_of(&rotated_cells)).unwrap();

        let mut expected: Vec<_> = vertex_sets(&original)
            .into_iter()
            .map(|(outer, set)| {
                let set = set
                    .into_iter()
                    .map(|mut p| {
                        for _ in 0..turns {
                            p = rotate(p);
                        }
                        p
                    })
                    .collect::<BTreeSet<_>>();
                (outer, set)
            })
            .collect();
        expected.sort();
        prop_assert_eq!(vertex_sets(&rotated), expected);
    }
}

// ============================================================
// Stamping
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_stamping_is_idempotent(
        sizes in prop::collection::vec((4i32..=10, 4i32..=10), 1..7)
    ) {
        let config = AutoTileSpec::single_row(1).resolve().unwrap();
        let mut graph = DungeonGraph::new();
        let mut ids = Vec::new();
        for (index, (w, h)) in sizes.iter().enumerate() {
            ids.push(graph.add_room(slot_origin(index), IVec2::new(*w, *h)));
        }
        let root = ids[0];
        for child in &ids[1..] {
            graph.attach(root, *child).unwrap();
        }

        let stamper = TileStamper::new(&config);
        let catalog = TemplateCatalog::new();
        let mut first = TileGrid::new(1.0);
        let report = stamper.stamp(&mut first, &graph, &catalog, root).unwrap();
        prop_assert_eq!(report.rooms, sizes.len());

        let mut second = TileGrid::new(1.0);
        stamper.stamp(&mut second, &graph, &catalog, root).unwrap();
        prop_assert_eq!(first.fingerprint(), second.fingerprint());

        stamper.stamp(&mut second, &graph, &catalog, root).unwrap();
        prop_assert_eq!(first.fingerprint(), second.fingerprint());

        // Each bordered room traces to its interior rectangle
        let polygons = generate_navigation_polygons(&first).unwrap();
        prop_assert_eq!(polygons.len(), sizes.len());
        let expected_walkable: usize = sizes.iter().map(|(w, h)| ((w - 2) * (h - 2)) as usize).sum();
        prop_assert_eq!(first.walkable_count(), expected_walkable);
        prop_assert!(first.used_rect().contains(IVec2::ZERO));
    }
}
