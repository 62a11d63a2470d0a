//! Directional search for the tile a flying piece lands on.

use slotfall_core::{Slot, TileCoord};

use crate::grid::{GridState, TileOccupancy};

/// Walks from `origin` toward `direction` and picks the landing tile.
///
/// The nearest partially filled tile wins. Without one, the piece travels to
/// the furthest fully empty tile before the boundary. Full tiles are passed
/// over. `origin` itself is never a candidate; `None` means the piece stays.
#[must_use]
pub fn find_landing_tile(
    grid: &GridState,
    origin: TileCoord,
    direction: Slot,
) -> Option<TileCoord> {
    let reach = grid.columns().max(grid.rows());
    let mut furthest_empty = None;

    for distance in 1..reach {
        let Some(coord) = origin.offset(direction, distance) else {
            break;
        };
        let Some(tile) = grid.tile(coord) else {
            break;
        };

        match tile.occupancy() {
            TileOccupancy::Partial => return Some(coord),
            TileOccupancy::Empty => furthest_empty = Some(coord),
            TileOccupancy::Full => {}
        }
    }

    furthest_empty
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotfall_core::{Piece, PieceColor, PieceId, PieceSpec};

    fn fill(grid: &mut GridState, coord: TileCoord, slots: &[Slot]) {
        for (index, slot) in slots.iter().enumerate() {
            let piece = Piece::new(
                PieceId::new(100 + index as u32),
                PieceSpec::new(*slot, PieceColor::Purple),
            );
            let _ = grid
                .set_slot(coord, *slot, Some(piece))
                .expect("in bounds");
        }
    }

    #[test]
    fn empty_path_lands_on_furthest_tile() {
        let grid = GridState::new(3, 3).expect("valid grid size");
        assert_eq!(
            find_landing_tile(&grid, TileCoord::new(1, 1), Slot::Up),
            Some(TileCoord::new(1, 2))
        );

        let wide = GridState::new(5, 1).expect("valid grid size");
        assert_eq!(
            find_landing_tile(&wide, TileCoord::new(0, 0), Slot::Right),
            Some(TileCoord::new(4, 0))
        );
    }

    #[test]
    fn nearest_partial_tile_wins() {
        let mut grid = GridState::new(5, 1).expect("valid grid size");
        fill(&mut grid, TileCoord::new(2, 0), &[Slot::Up]);
        fill(&mut grid, TileCoord::new(3, 0), &[Slot::Down]);

        assert_eq!(
            find_landing_tile(&grid, TileCoord::new(0, 0), Slot::Right),
            Some(TileCoord::new(2, 0))
        );
    }

    #[test]
    fn full_tiles_are_skipped() {
        let mut grid = GridState::new(1, 4).expect("valid grid size");
        fill(&mut grid, TileCoord::new(0, 2), &Slot::ALL);

        assert_eq!(
            find_landing_tile(&grid, TileCoord::new(0, 3), Slot::Down),
            Some(TileCoord::new(0, 0))
        );

        fill(&mut grid, TileCoord::new(0, 1), &[Slot::Left]);
        assert_eq!(
            find_landing_tile(&grid, TileCoord::new(0, 3), Slot::Down),
            Some(TileCoord::new(0, 1))
        );
    }

    #[test]
    fn only_full_tiles_means_no_landing() {
        let mut grid = GridState::new(3, 1).expect("valid grid size");
        fill(&mut grid, TileCoord::new(1, 0), &Slot::ALL);
        fill(&mut grid, TileCoord::new(2, 0), &Slot::ALL);

        assert_eq!(
            find_landing_tile(&grid, TileCoord::new(0, 0), Slot::Right),
            None
        );
    }

    #[test]
    fn outward_direction_at_edge_has_no_landing() {
        let grid = GridState::new(3, 3).expect("valid grid size");
        assert_eq!(find_landing_tile(&grid, TileCoord::new(1, 2), Slot::Up), None);
        assert_eq!(find_landing_tile(&grid, TileCoord::new(0, 1), Slot::Left), None);
        assert_eq!(find_landing_tile(&grid, TileCoord::new(2, 0), Slot::Down), None);
        assert_eq!(find_landing_tile(&grid, TileCoord::new(2, 1), Slot::Right), None);
    }

    #[test]
    fn search_is_repeatable() {
        let mut grid = GridState::new(4, 4).expect("valid grid size");
        fill(&mut grid, TileCoord::new(3, 1), &[Slot::Right, Slot::Up]);

        let first = find_landing_tile(&grid, TileCoord::new(0, 1), Slot::Right);
        let second = find_landing_tile(&grid, TileCoord::new(0, 1), Slot::Right);
        assert_eq!(first, second);
        assert_eq!(first, Some(TileCoord::new(3, 1)));
    }
}
