//! Crossing corridors: two doors joined through a `width` x `width` square.
//!
//! Each door gets one arm (a gallery from its origin to the square). The arm's
//! end cap opens the edge strip of the square it attaches to. The square's
//! floor is laid first; the corner pattern chosen by the unordered door
//! pair then walls off the two closed sides.
//!
//! ```text
//!   N + E (arms attach south and west)
//!
//!   T T T ┐      ┐ = InRt, └ = OutRt
//!   . . . R
//!   . . . R
//!   └ . . R
//! ```

use bevy::math::IVec2;
use tracing::warn;

use super::Brush;
use crate::autotile::TileRole;
use crate::grid::{CellRect, GridMut, Layer};
use crate::room::{DoorDirection, DoorInfo};
use Span::{Lead, Tail};

/// Rectangle of the arm from a door on `direction` wall to the square at `cross`
pub fn arm_rect(direction: DoorDirection, origin: IVec2, cross: IVec2, width: i32) -> CellRect {
    match direction {
        DoorDirection::E => CellRect::new(origin.x, origin.y, cross.x - origin.x, width),
        DoorDirection::W => CellRect::new(
            cross.x + width,
            cross.y,
            origin.x - (cross.x + width),
            width,
        ),
        DoorDirection::S => CellRect::new(origin.x, origin.y, width, cross.y - origin.y),
        DoorDirection::N => CellRect::new(
            cross.x,
            cross.y + width,
            width,
            origin.y - (cross.y + width),
        ),
    }
}

/// Offset or extent inside the square, counted from its near or far edge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    Lead(i32),
    /// `width - n`
    Tail(i32),
}

impl Span {
    pub fn resolve(self, width: i32) -> i32 {
        match self {
            Span::Lead(n) => n,
            Span::Tail(n) => width - n,
        }
    }
}

/// One rectangle of a crossing's wall pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CornerStamp {
    pub layer: Layer,
    pub role: TileRole,
    pub offset: (Span, Span),
    pub size: (Span, Span),
}

impl CornerStamp {
    const fn new(layer: Layer, role: TileRole, offset: (Span, Span), size: (Span, Span)) -> Self {
        Self {
            layer,
            role,
            offset,
            size,
        }
    }

    pub fn rect(&self, cross: IVec2, width: i32) -> CellRect {
        CellRect::new(
            cross.x + self.offset.0.resolve(width),
            cross.y + self.offset.1.resolve(width),
            self.size.0.resolve(width),
            self.size.1.resolve(width),
        )
    }
}

const ONE: (Span, Span) = (Lead(1), Lead(1));

const NORTH_EAST: [CornerStamp; 4] = [
    CornerStamp::new(Layer::Top, TileRole::OutRt, (Lead(0), Tail(1)), ONE),
    CornerStamp::new(Layer::Top, TileRole::InRt, (Tail(1), Lead(0)), ONE),
    CornerStamp::new(Layer::Middle, TileRole::T, (Lead(0), Lead(0)), (Tail(1), Lead(1))),
    CornerStamp::new(Layer::Top, TileRole::R, (Tail(1), Lead(1)), (Lead(1), Tail(1))),
];

const EAST_SOUTH: [CornerStamp; 4] = [
    CornerStamp::new(Layer::Middle, TileRole::OutRb, (Lead(0), Lead(0)), ONE),
    CornerStamp::new(Layer::Top, TileRole::InRb, (Tail(1), Tail(1)), ONE),
    CornerStamp::new(Layer::Top, TileRole::R, (Tail(1), Lead(0)), (Lead(1), Tail(1))),
    CornerStamp::new(Layer::Top, TileRole::B, (Lead(0), Tail(1)), (Tail(1), Lead(1))),
];

const SOUTH_WEST: [CornerStamp; 4] = [
    CornerStamp::new(Layer::Middle, TileRole::OutLb, (Tail(1), Lead(0)), ONE),
    CornerStamp::new(Layer::Top, TileRole::InLb, (Lead(0), Tail(1)), ONE),
    CornerStamp::new(Layer::Top, TileRole::L, (Lead(0), Lead(0)), (Lead(1), Tail(1))),
    CornerStamp::new(Layer::Top, TileRole::B, (Lead(1), Tail(1)), (Tail(1), Lead(1))),
];

const WEST_NORTH: [CornerStamp; 4] = [
    CornerStamp::new(Layer::Top, TileRole::OutLt, (Tail(1), Tail(1)), ONE),
    CornerStamp::new(Layer::Top, TileRole::InLt, (Lead(0), Lead(0)), ONE),
    CornerStamp::new(Layer::Middle, TileRole::T, (Lead(1), Lead(0)), (Tail(1), Lead(1))),
    CornerStamp::new(Layer::Top, TileRole::L, (Lead(0), Lead(1)), (Lead(1), Tail(1))),
];

const VERTICAL: [CornerStamp; 2] = [
    CornerStamp::new(Layer::Top, TileRole::L, (Lead(0), Lead(0)), (Lead(1), Tail(0))),
    CornerStamp::new(Layer::Top, TileRole::R, (Tail(1), Lead(0)), (Lead(1), Tail(0))),
];

const HORIZONTAL: [CornerStamp; 2] = [
    CornerStamp::new(Layer::Middle, TileRole::T, (Lead(0), Lead(0)), (Tail(0), Lead(1))),
    CornerStamp::new(Layer::Top, TileRole::B, (Lead(0), Tail(1)), (Tail(0), Lead(1))),
];

/// Wall layout of a crossing square, named after the two door walls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingShape {
    NorthEast,
    EastSouth,
    SouthWest,
    WestNorth,
    /// N + S: straight north-south pass
    Vertical,
    /// E + W: straight east-west pass
    Horizontal,
}

impl CrossingShape {
    /// Shape for an unordered door pair; `None` when both doors face the same way
    pub fn from_pair(a: DoorDirection, b: DoorDirection) -> Option<Self> {
        use DoorDirection::{E, N, S, W};
        match (a, b) {
            (N, E) | (E, N) => Some(Self::NorthEast),
            (E, S) | (S, E) => Some(Self::EastSouth),
            (S, W) | (W, S) => Some(Self::SouthWest),
            (W, N) | (N, W) => Some(Self::WestNorth),
            (N, S) | (S, N) => Some(Self::Vertical),
            (E, W) | (W, E) => Some(Self::Horizontal),
            _ => None,
        }
    }

    pub fn corner_pattern(self) -> &'static [CornerStamp] {
        match self {
            Self::NorthEast => &NORTH_EAST,
            Self::EastSouth => &EAST_SOUTH,
            Self::SouthWest => &SOUTH_WEST,
            Self::WestNorth => &WEST_NORTH,
            Self::Vertical => &VERTICAL,
            Self::Horizontal => &HORIZONTAL,
        }
    }
}

impl<G: GridMut> Brush<'_, G> {
    /// Both arms, the square floor and its wall pattern
    pub(crate) fn crossing_corridor(
        &mut self,
        door: &DoorInfo,
        other: &DoorInfo,
        cross: IVec2,
        width: i32,
    ) -> Option<CrossingShape> {
        self.fill(
            Layer::Floor,
            TileRole::Ground,
            CellRect::new(cross.x + 1, cross.y + 1, width - 2, width - 2),
        );

        for end in [door, other] {
            let rect = arm_rect(end.direction, end.origin, cross, width);
            self.gallery(end.direction.is_vertical(), rect);
        }

        let shape = CrossingShape::from_pair(door.direction, other.direction);
        match shape {
            Some(shape) => {
                for stamp in shape.corner_pattern() {
                    self.fill(stamp.layer, stamp.role, stamp.rect(cross, width));
                }
            }
            None => warn!(
                room = %door.room,
                connect = %other.room,
                direction = ?door.direction,
                "Crossing doors face the same way, no corner pattern"
            ),
        }
        shape
    }
}
