#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Slotfall placement engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems and
//! presentation layers to react to. Placement outcomes travel as
//! [`PlacementReport`] values so an animation layer can replay the already
//! committed result without touching grid state.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of pending group positions held by the queue.
pub const QUEUE_CAPACITY: usize = 3;

/// Largest number of pieces a single group may carry.
pub const MAX_GROUP_PIECES: usize = 4;

/// Number of cardinal slots exposed by every tile.
pub const SLOT_COUNT: usize = 4;

/// Largest number of tiles a configured grid may contain.
pub const MAX_GRID_TILES: u32 = 1 << 16;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid and queue with fresh, empty ones of the given size.
    ConfigureGrid {
        /// Number of tile columns laid out in the grid.
        columns: u32,
        /// Number of tile rows laid out in the grid.
        rows: u32,
    },
    /// Selects the order in which free slots are scanned during a push.
    ConfigurePushRule {
        /// Rule the world should apply to subsequent placements.
        rule: PushRule,
    },
    /// Places a freshly generated group into an empty queue slot.
    FillQueueSlot {
        /// Queue position that should receive the group.
        slot: QueueSlot,
        /// Pieces that compose the new group.
        group: GroupSpec,
    },
    /// Drops the group held by a queue slot onto the target tile.
    PlaceGroup {
        /// Queue position the group is picked up from.
        slot: QueueSlot,
        /// Tile the group was released over.
        target: TileCoord,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that a new grid replaced the previous one.
    GridConfigured {
        /// Number of tile columns in the new grid.
        columns: u32,
        /// Number of tile rows in the new grid.
        rows: u32,
    },
    /// Reports that a grid configuration was refused and the previous grid kept.
    GridRejected {
        /// Requested number of tile columns.
        columns: u32,
        /// Requested number of tile rows.
        rows: u32,
        /// Reason the size was refused.
        reason: GridConfigError,
    },
    /// Announces that a different push rule is active.
    PushRuleChanged {
        /// Rule that became active.
        rule: PushRule,
    },
    /// Confirms that a queue slot received a new group.
    QueueSlotFilled {
        /// Queue position that was filled.
        slot: QueueSlot,
        /// Identifier assigned to the group by the world.
        group: GroupId,
        /// Identifiers assigned to the group's pieces, in group order.
        pieces: Vec<PieceId>,
    },
    /// Reports that a queue fill request was rejected.
    QueueFillRejected {
        /// Queue position named by the request.
        slot: QueueSlot,
        /// Specific reason the fill failed.
        reason: QueueFillError,
    },
    /// Reports the authoritative outcome of a group placement.
    GroupPlaced {
        /// Queue position the group came from.
        slot: QueueSlot,
        /// Per-piece resolution consumed by presentation layers.
        report: PlacementReport,
    },
    /// Reports that a placement request was rejected before any mutation.
    PlacementRejected {
        /// Queue position named by the request.
        slot: QueueSlot,
        /// Tile named by the request.
        target: TileCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a queue slot no longer holds a group.
    QueueSlotEmptied {
        /// Queue position that became empty.
        slot: QueueSlot,
    },
    /// Signals that every queue slot is empty and should be repopulated.
    RefillNeeded,
}

/// One of the four cardinal attachment points on a tile.
///
/// The same value doubles as a piece's facing: a piece facing [`Slot::Up`]
/// flies toward increasing `z` and wants to occupy the `Up` slot where it lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Slot {
    /// Slot index 0, pointing toward increasing `z`.
    Up,
    /// Slot index 1, pointing toward increasing `x`.
    Right,
    /// Slot index 2, pointing toward decreasing `z`.
    Down,
    /// Slot index 3, pointing toward decreasing `x`.
    Left,
}

impl Slot {
    /// All slots in index order.
    pub const ALL: [Slot; SLOT_COUNT] = [Slot::Up, Slot::Right, Slot::Down, Slot::Left];

    /// Zero-based index of the slot within a tile.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Right => 1,
            Self::Down => 2,
            Self::Left => 3,
        }
    }

    /// Resolves a slot from its index, wrapping indices past the last slot.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self::ALL[index % SLOT_COUNT]
    }

    /// Returns the slot reached after `steps` quarter turns clockwise.
    #[must_use]
    pub const fn rotated(self, steps: usize) -> Self {
        Self::from_index(self.index() + steps % SLOT_COUNT)
    }

    /// Grid vector `(dx, dz)` a piece with this facing travels along.
    #[must_use]
    pub const fn offset(self) -> (i64, i64) {
        match self {
            Self::Up => (0, 1),
            Self::Right => (1, 0),
            Self::Down => (0, -1),
            Self::Left => (-1, 0),
        }
    }
}

/// Location of a single tile expressed as `x` (column) and `z` (row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    x: u32,
    z: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(x: u32, z: u32) -> Self {
        Self { x, z }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn z(&self) -> u32 {
        self.z
    }

    /// Coordinate reached after travelling `distance` tiles toward `direction`.
    ///
    /// Returns `None` when the result would leave the non-negative quadrant.
    /// Upper grid bounds are not known here and must be checked by the caller.
    #[must_use]
    pub fn offset(self, direction: Slot, distance: u32) -> Option<TileCoord> {
        let (dx, dz) = direction.offset();
        let x = i64::from(self.x) + dx * i64::from(distance);
        let z = i64::from(self.z) + dz * i64::from(distance);
        Some(TileCoord::new(u32::try_from(x).ok()?, u32::try_from(z).ok()?))
    }
}

/// Unique identifier assigned to a piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(u32);

impl PieceId {
    /// Creates a new piece identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(u32);

impl GroupId {
    /// Creates a new group identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Position within the pending-group queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QueueSlot(u32);

impl QueueSlot {
    /// Creates a new queue position.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the queue position.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Cosmetic colour carried by a piece. Never consulted by resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceColor {
    /// Red material.
    Red,
    /// Green material.
    Green,
    /// Purple material.
    Purple,
    /// Yellow material.
    Yellow,
}

impl PieceColor {
    /// Full palette available to group generators.
    pub const ALL: [PieceColor; 4] = [
        PieceColor::Red,
        PieceColor::Green,
        PieceColor::Purple,
        PieceColor::Yellow,
    ];
}

/// Description of a piece before the world assigns it an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceSpec {
    facing: Slot,
    color: PieceColor,
}

impl PieceSpec {
    /// Creates a new piece description.
    #[must_use]
    pub const fn new(facing: Slot, color: PieceColor) -> Self {
        Self { facing, color }
    }

    /// Direction the piece faces and flies toward.
    #[must_use]
    pub const fn facing(&self) -> Slot {
        self.facing
    }

    /// Cosmetic colour of the piece.
    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }
}

/// Validated description of a group: 1 to 4 pieces with distinct facings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<PieceSpec>", into = "Vec<PieceSpec>")]
pub struct GroupSpec {
    pieces: Vec<PieceSpec>,
}

impl GroupSpec {
    /// Validates and wraps the provided pieces.
    pub fn new(pieces: Vec<PieceSpec>) -> Result<Self, GroupSpecError> {
        if pieces.is_empty() {
            return Err(GroupSpecError::Empty);
        }
        if pieces.len() > MAX_GROUP_PIECES {
            return Err(GroupSpecError::TooManyPieces {
                count: pieces.len(),
            });
        }
        for (index, piece) in pieces.iter().enumerate() {
            if pieces[..index]
                .iter()
                .any(|earlier| earlier.facing == piece.facing)
            {
                return Err(GroupSpecError::DuplicateFacing {
                    facing: piece.facing,
                });
            }
        }
        Ok(Self { pieces })
    }

    /// Pieces in group order.
    #[must_use]
    pub fn pieces(&self) -> &[PieceSpec] {
        &self.pieces
    }

    /// Number of pieces in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Always `false`; validated groups hold at least one piece.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl TryFrom<Vec<PieceSpec>> for GroupSpec {
    type Error = GroupSpecError;

    fn try_from(pieces: Vec<PieceSpec>) -> Result<Self, Self::Error> {
        Self::new(pieces)
    }
}

impl From<GroupSpec> for Vec<PieceSpec> {
    fn from(spec: GroupSpec) -> Self {
        spec.pieces
    }
}

/// Reasons a group description fails validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum GroupSpecError {
    /// The group contains no pieces.
    #[error("group contains no pieces")]
    Empty,
    /// The group contains more pieces than a tile has slots.
    #[error("group contains {count} pieces, at most 4 are allowed")]
    TooManyPieces {
        /// Number of pieces supplied.
        count: usize,
    },
    /// Two pieces share a facing.
    #[error("more than one piece faces {facing:?}")]
    DuplicateFacing {
        /// Facing that appears more than once.
        facing: Slot,
    },
}

/// A piece with an identity, a fixed facing, and its current slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    facing: Slot,
    color: PieceColor,
    slot: Slot,
}

impl Piece {
    /// Creates a piece whose slot starts out equal to its facing.
    #[must_use]
    pub const fn new(id: PieceId, spec: PieceSpec) -> Self {
        Self {
            id,
            facing: spec.facing,
            color: spec.color,
            slot: spec.facing,
        }
    }

    /// Identifier of the piece.
    #[must_use]
    pub const fn id(&self) -> PieceId {
        self.id
    }

    /// Direction the piece faces; never changes.
    #[must_use]
    pub const fn facing(&self) -> Slot {
        self.facing
    }

    /// Cosmetic colour of the piece.
    #[must_use]
    pub const fn color(&self) -> PieceColor {
        self.color
    }

    /// Slot the piece currently occupies (or will occupy once seated).
    #[must_use]
    pub const fn slot(&self) -> Slot {
        self.slot
    }

    /// Records that the piece now sits in `slot`.
    pub fn reseat(&mut self, slot: Slot) {
        self.slot = slot;
    }
}

/// An ordered bundle of pieces that is placed as a unit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceGroup {
    id: GroupId,
    pieces: Vec<Piece>,
}

impl PieceGroup {
    /// Creates a group from already identified pieces.
    #[must_use]
    pub fn new(id: GroupId, pieces: Vec<Piece>) -> Self {
        Self { id, pieces }
    }

    /// Identifier of the group.
    #[must_use]
    pub const fn id(&self) -> GroupId {
        self.id
    }

    /// Pieces in group order.
    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Dissolves the group, yielding its pieces in group order.
    #[must_use]
    pub fn into_pieces(self) -> Vec<Piece> {
        self.pieces
    }
}

/// Order in which free slots are scanned when an occupant must be pushed aside.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PushRule {
    /// Scan slots `Up, Right, Down, Left` regardless of the blocked slot.
    #[default]
    FirstFree,
    /// Scan clockwise, starting with the slot after the blocked one.
    Clockwise,
}

/// Describes an occupant that was moved aside to make room for a new piece.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relocation {
    /// Piece that was moved.
    pub piece: PieceId,
    /// Tile on which the move happened.
    pub tile: TileCoord,
    /// Slot the piece vacated.
    pub from: Slot,
    /// Slot the piece occupies afterwards.
    pub to: Slot,
}

/// Reasons a piece stayed on the tile its group was dropped on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetentionReason {
    /// The landing search found neither a partially filled nor an empty tile.
    NoLandingTile,
    /// The landing tile had no free slot to push its occupant into.
    DestinationFull,
}

/// Final resolution of a single piece within a placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceOutcome {
    /// The piece flew to a landing tile and was seated there.
    Placed {
        /// Piece that was placed.
        piece: PieceId,
        /// Landing tile.
        tile: TileCoord,
        /// Slot the piece occupies on the landing tile.
        slot: Slot,
        /// Occupant pushed aside to free the slot, if any.
        relocation: Option<Relocation>,
    },
    /// The piece stayed on the tile its group was dropped on.
    KeptAtOrigin {
        /// Piece that stayed.
        piece: PieceId,
        /// Tile the group was dropped on.
        origin: TileCoord,
        /// Slot the piece occupies on the origin, or `None` when it is held
        /// there without a slot.
        slot: Option<Slot>,
        /// Occupant pushed aside on the origin, if any.
        relocation: Option<Relocation>,
        /// Why the piece did not fly.
        reason: RetentionReason,
    },
}

impl PieceOutcome {
    /// Piece the outcome describes.
    #[must_use]
    pub const fn piece(&self) -> PieceId {
        match self {
            Self::Placed { piece, .. } | Self::KeptAtOrigin { piece, .. } => *piece,
        }
    }

    /// Tile that owns the piece after resolution.
    #[must_use]
    pub const fn tile(&self) -> TileCoord {
        match self {
            Self::Placed { tile, .. } => *tile,
            Self::KeptAtOrigin { origin, .. } => *origin,
        }
    }

    /// Slot the piece occupies after resolution, if it was seated.
    #[must_use]
    pub const fn slot(&self) -> Option<Slot> {
        match self {
            Self::Placed { slot, .. } => Some(*slot),
            Self::KeptAtOrigin { slot, .. } => *slot,
        }
    }

    /// Occupant pushed aside while seating the piece, if any.
    #[must_use]
    pub const fn relocation(&self) -> Option<Relocation> {
        match self {
            Self::Placed { relocation, .. } | Self::KeptAtOrigin { relocation, .. } => *relocation,
        }
    }

    /// Indicates whether the piece stayed on its origin tile.
    #[must_use]
    pub const fn is_kept(&self) -> bool {
        matches!(self, Self::KeptAtOrigin { .. })
    }
}

/// Ordered per-piece outcome of one group placement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementReport {
    group: GroupId,
    target: TileCoord,
    outcomes: Vec<PieceOutcome>,
}

impl PlacementReport {
    /// Creates a report for the provided group and target.
    #[must_use]
    pub fn new(group: GroupId, target: TileCoord, outcomes: Vec<PieceOutcome>) -> Self {
        Self {
            group,
            target,
            outcomes,
        }
    }

    /// Group that was placed and has now dissolved.
    #[must_use]
    pub const fn group(&self) -> GroupId {
        self.group
    }

    /// Tile the group was dropped on.
    #[must_use]
    pub const fn target(&self) -> TileCoord {
        self.target
    }

    /// Outcomes in the order pieces were stored in the group.
    #[must_use]
    pub fn outcomes(&self) -> &[PieceOutcome] {
        &self.outcomes
    }

    /// Indicates whether any piece stayed on the origin tile.
    #[must_use]
    pub fn any_kept(&self) -> bool {
        self.outcomes.iter().any(PieceOutcome::is_kept)
    }
}

/// Reasons a placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum PlacementError {
    /// The target tile already holds a group or pieces.
    #[error("target tile is occupied")]
    TargetOccupied,
    /// The target tile lies outside the grid.
    #[error("target tile is outside the grid")]
    OutOfBounds,
    /// The queue has no slot with the requested index.
    #[error("queue slot does not exist")]
    UnknownQueueSlot,
    /// The queue slot holds no group to place.
    #[error("queue slot is empty")]
    EmptyQueueSlot,
}

/// Reasons a grid size may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum GridConfigError {
    /// Either dimension is zero.
    #[error("grid must have at least one column and one row")]
    Empty,
    /// The tile count overflows or exceeds [`MAX_GRID_TILES`].
    #[error("grid of {columns}x{rows} tiles exceeds the {max}-tile limit", max = MAX_GRID_TILES)]
    TooLarge {
        /// Requested number of tile columns.
        columns: u32,
        /// Requested number of tile rows.
        rows: u32,
    },
}

/// Reasons a queue fill request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error, Serialize, Deserialize)]
pub enum QueueFillError {
    /// The queue has no slot with the requested index.
    #[error("queue slot does not exist")]
    UnknownSlot,
    /// The queue slot still holds a group.
    #[error("queue slot already holds a group")]
    SlotOccupied,
}
