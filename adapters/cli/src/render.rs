//! Plain-text dump of the grid and queue.

use std::fmt::Write as _;

use slotfall_core::Slot;
use slotfall_world::{query, Tile, World};

const EMPTY_SLOT: char = '.';

fn glyph(slot: Slot) -> char {
    match slot {
        Slot::Up => '^',
        Slot::Right => '>',
        Slot::Down => 'v',
        Slot::Left => '<',
    }
}

fn slot_char(tile: &Tile, slot: Slot) -> char {
    tile.occupant(slot)
        .map_or(EMPTY_SLOT, |piece| glyph(piece.facing()))
}

fn center_char(tile: &Tile) -> char {
    match (tile.held().len(), tile.is_occupied()) {
        (0, true) => '#',
        (0, false) => ' ',
        (held, _) => char::from_digit(held.min(9) as u32, 10).unwrap_or('+'),
    }
}

/// Renders each tile as a 3×3 block, highest row first.
///
/// Slot positions show the facing of their occupant, or `.` when empty.
pub(crate) fn render_grid(world: &World) -> String {
    let (columns, rows) = query::grid_dimensions(world);
    let mut out = String::new();

    for z in (0..rows).rev() {
        let mut lines = [String::new(), String::new(), String::new()];
        for x in 0..columns {
            let Some(tile) = query::tile_at(world, x, z) else {
                continue;
            };
            let _ = write!(lines[0], " {} ", slot_char(tile, Slot::Up));
            let _ = write!(
                lines[1],
                "{}{}{}",
                slot_char(tile, Slot::Left),
                center_char(tile),
                slot_char(tile, Slot::Right)
            );
            let _ = write!(lines[2], " {} ", slot_char(tile, Slot::Down));
        }
        for line in lines {
            out.push_str(line.trim_end());
            out.push('\n');
        }
    }

    out
}

/// Lists each queue slot with the facings of its pending group.
pub(crate) fn render_queue(world: &World) -> String {
    let mut out = String::new();
    for (slot, group) in query::queue(world).positions() {
        let pieces: String = group
            .map(|group| group.pieces().iter().map(|piece| glyph(piece.facing())).collect())
            .unwrap_or_else(|| "-".to_owned());
        let _ = writeln!(out, "[{}] {pieces}", slot.get());
    }
    out
}
