//! Boundary-following state machine for one contour.
//!
//! The walker moves cell by cell with a heading. At every cell it tries
//! three directions in a fixed priority derived from the heading (left turn,
//! straight, right turn for outer contours; mirrored for inner ones). Turns
//! emit the current cell center as a polygon vertex; straight moves don't.

use std::collections::HashSet;

use bevy::math::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::NavigationError;
use crate::grid::GridView;

/// Walking direction; numeric order is clockwise on a y-down grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Heading {
    const ORDER: [Heading; 4] = [Heading::Right, Heading::Down, Heading::Left, Heading::Up];

    pub fn offset(self) -> IVec2 {
        match self {
            Heading::Right => IVec2::new(1, 0),
            Heading::Down => IVec2::new(0, 1),
            Heading::Left => IVec2::new(-1, 0),
            Heading::Up => IVec2::new(0, -1),
        }
    }

    pub fn clockwise(self) -> Self {
        Self::ORDER[(self as usize + 1) % 4]
    }

    pub fn counter_clockwise(self) -> Self {
        Self::ORDER[(self as usize + 3) % 4]
    }
}

/// Which side of a walkable region the contour follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContourKind {
    /// Outer boundary, seeded on a cell with nothing walkable above
    Outer,
    /// Boundary around a hole, seeded on a cell with nothing walkable below
    Inner,
}

impl ContourKind {
    /// Candidate headings in the order they are tried
    pub fn priorities(self, heading: Heading) -> [Heading; 3] {
        match self {
            ContourKind::Outer => [heading.counter_clockwise(), heading, heading.clockwise()],
            ContourKind::Inner => [heading.clockwise(), heading, heading.counter_clockwise()],
        }
    }

    /// Offset from the seed to the start (and anchor) cell
    pub fn start_offset(self) -> IVec2 {
        match self {
            ContourKind::Outer => IVec2::ZERO,
            ContourKind::Inner => IVec2::new(-1, 0),
        }
    }
}

/// Cells already walked by some trace of the current pass
#[derive(Debug, Clone, Default)]
pub struct VisitedCells {
    cells: HashSet<IVec2>,
}

impl VisitedCells {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cell a trace passes through; a second claim means two
    /// contours cross, which aborts the pass
    pub fn claim(&mut self, cell: IVec2) -> Result<(), NavigationError> {
        if self.cells.insert(cell) {
            Ok(())
        } else {
            Err(NavigationError::Overlap { cell })
        }
    }

    /// Mark without the overlap check
    pub fn mark(&mut self, cell: IVec2) {
        self.cells.insert(cell);
    }

    pub fn contains(&self, cell: IVec2) -> bool {
        self.cells.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Follow one contour from `seed`.
///
/// Returns `Ok(None)` for a degenerate trace (the walker got stuck before
/// closing). Cells claimed along the way stay claimed either way.
pub fn trace_contour<G: GridView + ?Sized>(
    grid: &G,
    kind: ContourKind,
    seed: IVec2,
    visited: &mut VisitedCells,
) -> Result<Option<Vec<Vec2>>, NavigationError> {
    let start = seed + kind.start_offset();
    let mut points: Vec<Vec2> = Vec::new();
    let mut pos = seed;
    let mut heading = Heading::Right;

    loop {
        let Some(next) = kind
            .priorities(heading)
            .into_iter()
            .find(|candidate| grid.is_walkable(pos + candidate.offset()))
        else {
            return Ok(None);
        };

        if next == heading {
            if points.is_empty() {
                points.push(grid.cell_center(pos + kind.start_offset()));
            }
            if points.len() > 1 && pos == start {
                return Ok(Some(points));
            }
        } else {
            if points.len() > 1 && pos == start {
                return Ok(Some(points));
            }
            points.push(grid.cell_center(pos));
            heading = next;
        }

        visited.claim(pos)?;
        pos += heading.offset();
    }
}
