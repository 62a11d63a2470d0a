//! Dense tile storage with per-tile slot occupancy.

use slotfall_core::{GridConfigError, Piece, Slot, TileCoord, MAX_GRID_TILES, SLOT_COUNT};

/// How many of a tile's slots are taken.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileOccupancy {
    /// No slot is occupied.
    Empty,
    /// Some slots are occupied and at least one is free.
    Partial,
    /// All four slots are occupied.
    Full,
}

/// A grid cell exposing four cardinal slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    coord: TileCoord,
    occupied: bool,
    slots: [Option<Piece>; SLOT_COUNT],
    held: Vec<Piece>,
}

impl Tile {
    fn new(coord: TileCoord) -> Self {
        Self {
            coord,
            occupied: false,
            slots: [None; SLOT_COUNT],
            held: Vec::new(),
        }
    }

    /// Coordinate of the tile within the grid.
    #[must_use]
    pub const fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Indicates whether a group or piece has been committed to the tile.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Piece seated in `slot`, if any.
    #[must_use]
    pub fn occupant(&self, slot: Slot) -> Option<&Piece> {
        self.slots[slot.index()].as_ref()
    }

    /// Reports whether `slot` holds a piece.
    #[must_use]
    pub fn is_slot_occupied(&self, slot: Slot) -> bool {
        self.slots[slot.index()].is_some()
    }

    /// Classifies the tile by slot usage. Held pieces do not count.
    #[must_use]
    pub fn occupancy(&self) -> TileOccupancy {
        match self.slots.iter().filter(|slot| slot.is_some()).count() {
            0 => TileOccupancy::Empty,
            SLOT_COUNT => TileOccupancy::Full,
            _ => TileOccupancy::Partial,
        }
    }

    /// Iterator over seated pieces in slot order.
    pub fn seated(&self) -> impl Iterator<Item = &Piece> {
        self.slots.iter().flatten()
    }

    /// Pieces retained on the tile without a slot.
    #[must_use]
    pub fn held(&self) -> &[Piece] {
        &self.held
    }

    /// Number of pieces owned by the tile, seated or held.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.seated().count() + self.held.len()
    }

    /// Reports whether the tile owns any piece.
    #[must_use]
    pub fn has_pieces(&self) -> bool {
        self.piece_count() > 0
    }

    /// Puts `piece` into `slot`, returning the previous occupant.
    pub(crate) fn seat(&mut self, slot: Slot, piece: Option<Piece>) -> Option<Piece> {
        let piece = piece.map(|mut piece| {
            piece.reseat(slot);
            piece
        });
        std::mem::replace(&mut self.slots[slot.index()], piece)
    }

    pub(crate) fn hold(&mut self, piece: Piece) {
        self.held.push(piece);
        self.occupied = true;
    }

    pub(crate) fn reconcile(&mut self) {
        self.occupied = self.has_pieces();
    }
}

/// Error returned when a slot write names a tile outside the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("tile ({}, {}) is outside the grid", .coord.x(), .coord.z())]
pub struct OutOfBounds {
    /// Coordinate that was rejected.
    pub coord: TileCoord,
    /// Piece that could not be written and is handed back to the caller.
    pub piece: Option<Piece>,
}

const DEFAULT_COLUMNS: u32 = 3;
const DEFAULT_ROWS: u32 = 3;

/// Owns the fixed `columns × rows` tile matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridState {
    columns: u32,
    rows: u32,
    tiles: Vec<Tile>,
}

impl GridState {
    /// Creates a grid with every tile empty and unoccupied.
    ///
    /// Sizes with a zero dimension, or more than [`MAX_GRID_TILES`] tiles, are refused.
    pub fn new(columns: u32, rows: u32) -> Result<Self, GridConfigError> {
        if columns == 0 || rows == 0 {
            return Err(GridConfigError::Empty);
        }
        let tile_count = columns
            .checked_mul(rows)
            .filter(|count| *count <= MAX_GRID_TILES)
            .ok_or(GridConfigError::TooLarge { columns, rows })?;
        Ok(Self::filled(columns, rows, tile_count))
    }

    fn filled(columns: u32, rows: u32, tile_count: u32) -> Self {
        let mut tiles = Vec::with_capacity(tile_count as usize);
        for z in 0..rows {
            for x in 0..columns {
                tiles.push(Tile::new(TileCoord::new(x, z)));
            }
        }
        Self {
            columns,
            rows,
            tiles,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether `coord` lies inside the grid.
    #[must_use]
    pub const fn contains(&self, coord: TileCoord) -> bool {
        coord.x() < self.columns && coord.z() < self.rows
    }

    /// Bounds-checked lookup; `None` outside `[0, columns) × [0, rows)`.
    #[must_use]
    pub fn tile_at(&self, x: u32, z: u32) -> Option<&Tile> {
        self.tile(TileCoord::new(x, z))
    }

    /// Bounds-checked lookup by coordinate.
    #[must_use]
    pub fn tile(&self, coord: TileCoord) -> Option<&Tile> {
        self.index(coord).and_then(|index| self.tiles.get(index))
    }

    pub(crate) fn tile_mut(&mut self, coord: TileCoord) -> Option<&mut Tile> {
        self.index(coord).and_then(|index| self.tiles.get_mut(index))
    }

    /// Iterator over all tiles, row by row starting at `z = 0`.
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Writes `piece` into a slot and returns the previous occupant.
    ///
    /// Performs no validation beyond bounds; callers keep occupancy consistent.
    pub fn set_slot(
        &mut self,
        coord: TileCoord,
        slot: Slot,
        piece: Option<Piece>,
    ) -> Result<Option<Piece>, OutOfBounds> {
        match self.tile_mut(coord) {
            Some(tile) => Ok(tile.seat(slot, piece)),
            None => Err(OutOfBounds { coord, piece }),
        }
    }

    /// Reports whether `slot` on `coord` holds a piece. `false` outside the grid.
    #[must_use]
    pub fn is_slot_occupied(&self, coord: TileCoord, slot: Slot) -> bool {
        self.tile(coord)
            .is_some_and(|tile| tile.is_slot_occupied(slot))
    }

    /// Sets the tile-level occupied flag. Ignored outside the grid.
    pub fn mark_occupied(&mut self, coord: TileCoord, occupied: bool) {
        if let Some(tile) = self.tile_mut(coord) {
            tile.occupied = occupied;
        }
    }

    /// Retains `piece` on the tile without a slot. Hands it back outside the grid.
    pub fn hold(&mut self, coord: TileCoord, piece: Piece) -> Result<(), OutOfBounds> {
        match self.tile_mut(coord) {
            Some(tile) => {
                tile.hold(piece);
                Ok(())
            }
            None => Err(OutOfBounds {
                coord,
                piece: Some(piece),
            }),
        }
    }

    /// Resets the occupied flag of `coord` to whether it owns any piece.
    pub fn reconcile_occupancy(&mut self, coord: TileCoord) {
        if let Some(tile) = self.tile_mut(coord) {
            tile.reconcile();
        }
    }

    /// Total number of pieces owned by tiles.
    #[must_use]
    pub fn piece_count(&self) -> usize {
        self.tiles.iter().map(Tile::piece_count).sum()
    }

    fn index(&self, coord: TileCoord) -> Option<usize> {
        if self.contains(coord) {
            let row = usize::try_from(coord.z()).ok()?;
            let column = usize::try_from(coord.x()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

impl Default for GridState {
    /// An empty 3×3 grid.
    fn default() -> Self {
        Self::filled(DEFAULT_COLUMNS, DEFAULT_ROWS, DEFAULT_COLUMNS * DEFAULT_ROWS)
    }
}
