//! Room/door graph consumed by the tile stamper.
//!
//! The graph generator resolves placement and connectivity; this module only
//! stores the result and checks the invariants the stamper relies on:
//! symmetric door pairs, existing rooms, and a `next` tree without cycles.

pub mod template;

use std::collections::HashSet;
use std::fmt;

use bevy::math::IVec2;
use serde::{Deserialize, Serialize};

use crate::grid::CellRect;

pub use template::{RoomTemplate, TemplateCatalog, TemplateCell, TemplateLibrary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which wall of its room a door sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DoorDirection {
    N,
    E,
    S,
    W,
}

impl DoorDirection {
    pub const ALL: [DoorDirection; 4] = [
        DoorDirection::N,
        DoorDirection::E,
        DoorDirection::S,
        DoorDirection::W,
    ];

    pub fn opposite(self) -> Self {
        match self {
            DoorDirection::N => DoorDirection::S,
            DoorDirection::E => DoorDirection::W,
            DoorDirection::S => DoorDirection::N,
            DoorDirection::W => DoorDirection::E,
        }
    }

    /// N/S doors lead into vertical corridors
    pub fn is_vertical(self) -> bool {
        matches!(self, DoorDirection::N | DoorDirection::S)
    }
}

/// One end of a door pair, as handed to [`DungeonGraph::connect`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorEnd {
    pub room: RoomId,
    pub direction: DoorDirection,
    pub origin: IVec2,
}

impl DoorEnd {
    pub fn new(room: RoomId, direction: DoorDirection, origin: IVec2) -> Self {
        Self {
            room,
            direction,
            origin,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorInfo {
    pub room: RoomId,
    pub direction: DoorDirection,
    /// Cell at the room wall where the corridor starts
    pub origin: IVec2,
    pub connect_room: RoomId,
    /// Index of the paired door in `connect_room`'s door list
    pub connect_door: usize,
    /// Top-left cell of the crossing square when the corridor turns
    #[serde(default)]
    pub cross: Option<IVec2>,
}

impl DoorInfo {
    pub fn has_cross(&self) -> bool {
        self.cross.is_some()
    }
}

/// Reference to a prefabricated room template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSplit {
    pub scene_path: String,
    /// Region of the template scene copied into the room
    pub region: CellRect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: RoomId,
    pub position: IVec2,
    pub size: IVec2,
    #[serde(default)]
    pub split: Option<RoomSplit>,
    #[serde(default)]
    pub doors: Vec<DoorInfo>,
    /// Child rooms, stamped before this one
    #[serde(default)]
    pub next: Vec<RoomId>,
}

impl RoomInfo {
    pub fn new(id: RoomId, position: IVec2, size: IVec2) -> Self {
        Self {
            id,
            position,
            size,
            split: None,
            doors: Vec::new(),
            next: Vec::new(),
        }
    }

    pub fn rect(&self) -> CellRect {
        CellRect {
            position: self.position,
            size: self.size,
        }
    }
}

/// Error type for room graph validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("Room {0} not found")]
    UnknownRoom(RoomId),
    #[error("Room id {0} is used twice")]
    DuplicateRoom(RoomId),
    #[error("Door {door} of room {room} points to missing door {target} of room {connect}")]
    UnknownDoor {
        room: RoomId,
        door: usize,
        connect: RoomId,
        target: usize,
    },
    #[error("Door {door} of room {room} is not paired back by its connected door")]
    AsymmetricDoor { room: RoomId, door: usize },
    #[error("Room {0} is reached twice from the root")]
    NextCycle(RoomId),
    #[error("Room {room} references missing template '{scene_path}'")]
    MissingTemplate { room: RoomId, scene_path: String },
    #[error("Corridor width {0} is below the minimum of 2")]
    CorridorTooNarrow(i32),
}

/// Rooms plus their doors, as resolved by the dungeon generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DungeonGraph {
    rooms: Vec<RoomInfo>,
}

impl DungeonGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rooms(rooms: Vec<RoomInfo>) -> Result<Self, LayoutError> {
        let graph = Self { rooms };
        graph.validate()?;
        Ok(graph)
    }

    pub fn rooms(&self) -> &[RoomInfo] {
        &self.rooms
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomInfo> {
        self.rooms.iter().find(|room| room.id == id)
    }

    fn room_mut(&mut self, id: RoomId) -> Result<&mut RoomInfo, LayoutError> {
        self.rooms
            .iter_mut()
            .find(|room| room.id == id)
            .ok_or(LayoutError::UnknownRoom(id))
    }

    /// One past the largest id; the lowest free id once `u32::MAX` is taken
    fn next_id(&self) -> RoomId {
        let Some(max) = self.rooms.iter().map(|room| room.id.0).max() else {
            return RoomId(0);
        };
        if let Some(id) = max.checked_add(1) {
            return RoomId(id);
        }
        let used: HashSet<u32> = self.rooms.iter().map(|room| room.id.0).collect();
        (0..u32::MAX)
            .find(|id| !used.contains(id))
            .map_or(RoomId(max), RoomId)
    }

    pub fn add_room(&mut self, position: IVec2, size: IVec2) -> RoomId {
        let id = self.next_id();
        self.rooms.push(RoomInfo::new(id, position, size));
        id
    }

    pub fn add_template_room(&mut self, position: IVec2, size: IVec2, split: RoomSplit) -> RoomId {
        let id = self.next_id();
        let mut room = RoomInfo::new(id, position, size);
        room.split = Some(split);
        self.rooms.push(room);
        id
    }

    /// Make `child` part of `parent`'s subtree (stamped before the parent)
    pub fn attach(&mut self, parent: RoomId, child: RoomId) -> Result<(), LayoutError> {
        if self.room(child).is_none() {
            return Err(LayoutError::UnknownRoom(child));
        }
        self.room_mut(parent)?.next.push(child);
        Ok(())
    }

    /// Pair two doors with a straight corridor
    pub fn connect(&mut self, a: DoorEnd, b: DoorEnd) -> Result<(), LayoutError> {
        self.link(a, b, None)
    }

    /// Pair two doors whose corridors meet at the crossing square at `cross`
    pub fn connect_crossing(&mut self, a: DoorEnd, b: DoorEnd, cross: IVec2) -> Result<(), LayoutError> {
        self.link(a, b, Some(cross))
    }

    fn link(&mut self, a: DoorEnd, b: DoorEnd, cross: Option<IVec2>) -> Result<(), LayoutError> {
        if self.room(a.room).is_none() {
            return Err(LayoutError::UnknownRoom(a.room));
        }
        if self.room(b.room).is_none() {
            return Err(LayoutError::UnknownRoom(b.room));
        }

        let a_index = self.room_mut(a.room)?.doors.len();
        let b_index = if a.room == b.room {
            a_index + 1
        } else {
            self.room_mut(b.room)?.doors.len()
        };

        self.room_mut(a.room)?.doors.push(DoorInfo {
            room: a.room,
            direction: a.direction,
            origin: a.origin,
            connect_room: b.room,
            connect_door: b_index,
            cross,
        });
        self.room_mut(b.room)?.doors.push(DoorInfo {
            room: b.room,
            direction: b.direction,
            origin: b.origin,
            connect_room: a.room,
            connect_door: a_index,
            cross,
        });
        Ok(())
    }

    /// The door on the other end of `door`
    pub fn connected_door(&self, door: &DoorInfo) -> Option<&DoorInfo> {
        self.room(door.connect_room)?.doors.get(door.connect_door)
    }

    /// Check ids, `next` references and door pairing
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        for room in &self.rooms {
            if !seen.insert(room.id) {
                return Err(LayoutError::DuplicateRoom(room.id));
            }
        }

        for room in &self.rooms {
            for child in &room.next {
                if !seen.contains(child) {
                    return Err(LayoutError::UnknownRoom(*child));
                }
            }

            for (index, door) in room.doors.iter().enumerate() {
                if door.room != room.id {
                    return Err(LayoutError::AsymmetricDoor {
                        room: room.id,
                        door: index,
                    });
                }
                let other = self
                    .room(door.connect_room)
                    .ok_or(LayoutError::UnknownRoom(door.connect_room))?;
                let back = other
                    .doors
                    .get(door.connect_door)
                    .ok_or(LayoutError::UnknownDoor {
                        room: room.id,
                        door: index,
                        connect: other.id,
                        target: door.connect_door,
                    })?;
                if back.connect_room != room.id
                    || back.connect_door != index
                    || back.cross != door.cross
                {
                    return Err(LayoutError::AsymmetricDoor {
                        room: room.id,
                        door: index,
                    });
                }
            }
        }
        Ok(())
    }

    /// Rooms of `root`'s subtree, children before parents
    pub fn post_order(&self, root: RoomId) -> Result<Vec<RoomId>, LayoutError> {
        let mut order = Vec::new();
        let mut reached = HashSet::new();
        self.collect_post_order(root, &mut reached, &mut order)?;
        Ok(order)
    }

    fn collect_post_order(
        &self,
        id: RoomId,
        reached: &mut HashSet<RoomId>,
        order: &mut Vec<RoomId>,
    ) -> Result<(), LayoutError> {
        if !reached.insert(id) {
            return Err(LayoutError::NextCycle(id));
        }
        let room = self.room(id).ok_or(LayoutError::UnknownRoom(id))?;
        for child in &room.next {
            self.collect_post_order(*child, reached, order)?;
        }
        order.push(id);
        Ok(())
    }
}
