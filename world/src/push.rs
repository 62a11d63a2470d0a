//! Slot conflict resolution on a destination tile.

use slotfall_core::{Piece, PushRule, Relocation, Slot, TileCoord};

use crate::grid::{GridState, Tile};

/// Result of seating an incoming piece on a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PushOutcome {
    /// The incoming piece now occupies its intended slot.
    Seated {
        /// Occupant moved aside to free the slot, if there was one.
        relocation: Option<Relocation>,
    },
    /// No free slot existed for the occupant; the incoming piece is handed back.
    DestinationFull {
        /// Piece that could not be seated.
        piece: Piece,
    },
}

/// Seats `piece` into `slot` on `coord`, pushing an existing occupant aside.
///
/// The occupant moves to the first free slot in `rule`'s scan order. At most
/// one relocation happens. A tile with no free slot, or a coordinate outside
/// the grid, leaves the grid untouched and returns the piece.
pub fn resolve_push(
    grid: &mut GridState,
    coord: TileCoord,
    slot: Slot,
    piece: Piece,
    rule: PushRule,
) -> PushOutcome {
    let Some(tile) = grid.tile_mut(coord) else {
        return PushOutcome::DestinationFull { piece };
    };

    if !tile.is_slot_occupied(slot) {
        let _ = tile.seat(slot, Some(piece));
        return PushOutcome::Seated { relocation: None };
    }

    let Some(free) = free_slot(tile, slot, rule) else {
        return PushOutcome::DestinationFull { piece };
    };

    let occupant = tile.seat(slot, None);
    let relocation = occupant.map(|occupant| Relocation {
        piece: occupant.id(),
        tile: coord,
        from: slot,
        to: free,
    });
    let _ = tile.seat(free, occupant);
    let _ = tile.seat(slot, Some(piece));

    PushOutcome::Seated { relocation }
}

/// First unoccupied slot in `rule`'s scan order relative to `blocked`.
#[must_use]
pub fn free_slot(tile: &Tile, blocked: Slot, rule: PushRule) -> Option<Slot> {
    scan_order(blocked, rule)
        .into_iter()
        .find(|candidate| !tile.is_slot_occupied(*candidate))
}

fn scan_order(blocked: Slot, rule: PushRule) -> [Slot; 4] {
    match rule {
        PushRule::FirstFree => Slot::ALL,
        PushRule::Clockwise => [
            blocked.rotated(1),
            blocked.rotated(2),
            blocked.rotated(3),
            blocked,
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotfall_core::{PieceColor, PieceId, PieceSpec};

    fn piece(id: u32, facing: Slot) -> Piece {
        Piece::new(PieceId::new(id), PieceSpec::new(facing, PieceColor::Yellow))
    }

    fn occupant_id(grid: &GridState, coord: TileCoord, slot: Slot) -> Option<u32> {
        grid.tile(coord)
            .and_then(|tile| tile.occupant(slot))
            .map(|piece| piece.id().get())
    }

    #[test]
    fn free_slot_is_taken_directly() {
        let mut grid = GridState::new(3, 3).expect("valid grid size");
        let coord = TileCoord::new(1, 1);

        let outcome = resolve_push(
            &mut grid,
            coord,
            Slot::Down,
            piece(1, Slot::Down),
            PushRule::FirstFree,
        );

        assert_eq!(outcome, PushOutcome::Seated { relocation: None });
        assert_eq!(occupant_id(&grid, coord, Slot::Down), Some(1));
    }

    #[test]
    fn occupant_moves_to_first_free_slot() {
        let mut grid = GridState::new(3, 3).expect("valid grid size");
        let coord = TileCoord::new(1, 1);
        let _ = grid
            .set_slot(coord, Slot::Up, Some(piece(1, Slot::Up)))
            .expect("in bounds");

        let outcome = resolve_push(
            &mut grid,
            coord,
            Slot::Up,
            piece(2, Slot::Up),
            PushRule::FirstFree,
        );

        assert_eq!(
            outcome,
            PushOutcome::Seated {
                relocation: Some(Relocation {
                    piece: PieceId::new(1),
                    tile: coord,
                    from: Slot::Up,
                    to: Slot::Right,
                }),
            }
        );
        assert_eq!(occupant_id(&grid, coord, Slot::Up), Some(2));
        assert_eq!(occupant_id(&grid, coord, Slot::Right), Some(1));
        let moved = grid
            .tile(coord)
            .and_then(|tile| tile.occupant(Slot::Right))
            .expect("relocated piece");
        assert_eq!(moved.slot(), Slot::Right);
        assert_eq!(moved.facing(), Slot::Up);
    }

    #[test]
    fn first_free_and_clockwise_disagree() {
        let coord = TileCoord::new(0, 0);
        let mut first_free = GridState::new(1, 1).expect("valid grid size");
        let _ = first_free
            .set_slot(coord, Slot::Down, Some(piece(1, Slot::Down)))
            .expect("in bounds");
        let mut clockwise = first_free.clone();

        let _ = resolve_push(
            &mut first_free,
            coord,
            Slot::Down,
            piece(2, Slot::Down),
            PushRule::FirstFree,
        );
        let _ = resolve_push(
            &mut clockwise,
            coord,
            Slot::Down,
            piece(2, Slot::Down),
            PushRule::Clockwise,
        );

        assert_eq!(occupant_id(&first_free, coord, Slot::Up), Some(1));
        assert_eq!(occupant_id(&clockwise, coord, Slot::Left), Some(1));
        assert_eq!(occupant_id(&first_free, coord, Slot::Down), Some(2));
        assert_eq!(occupant_id(&clockwise, coord, Slot::Down), Some(2));
    }

    #[test]
    fn clockwise_wraps_past_left() {
        let coord = TileCoord::new(0, 0);
        let mut grid = GridState::new(1, 1).expect("valid grid size");
        let _ = grid
            .set_slot(coord, Slot::Left, Some(piece(1, Slot::Left)))
            .expect("in bounds");
        let _ = grid
            .set_slot(coord, Slot::Up, Some(piece(2, Slot::Up)))
            .expect("in bounds");

        let outcome = resolve_push(
            &mut grid,
            coord,
            Slot::Left,
            piece(3, Slot::Left),
            PushRule::Clockwise,
        );

        assert!(matches!(
            outcome,
            PushOutcome::Seated {
                relocation: Some(Relocation { to: Slot::Right, .. })
            }
        ));
    }

    #[test]
    fn full_tile_rejects_incoming_piece() {
        let coord = TileCoord::new(1, 1);
        let mut grid = GridState::new(3, 3).expect("valid grid size");
        for (index, slot) in Slot::ALL.iter().enumerate() {
            let _ = grid
                .set_slot(coord, *slot, Some(piece(index as u32, *slot)))
                .expect("in bounds");
        }
        let before = grid.clone();

        let outcome = resolve_push(
            &mut grid,
            coord,
            Slot::Up,
            piece(9, Slot::Up),
            PushRule::FirstFree,
        );

        assert_eq!(
            outcome,
            PushOutcome::DestinationFull {
                piece: piece(9, Slot::Up)
            }
        );
        assert_eq!(grid, before);
    }

    #[test]
    fn outside_grid_hands_piece_back() {
        let mut grid = GridState::new(2, 2).expect("valid grid size");
        let outcome = resolve_push(
            &mut grid,
            TileCoord::new(5, 5),
            Slot::Up,
            piece(1, Slot::Up),
            PushRule::FirstFree,
        );
        assert!(matches!(outcome, PushOutcome::DestinationFull { .. }));
        assert_eq!(grid.piece_count(), 0);
    }
}
