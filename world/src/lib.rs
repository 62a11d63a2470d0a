#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid and queue state for Slotfall.
//!
//! The world owns the [`GridState`] and [`QueueState`] exclusively and mutates
//! them only through [`apply`]. Every command is resolved to completion before
//! `apply` returns, so at most one placement is ever in flight.

pub mod grid;
pub mod landing;
pub mod placement;
pub mod push;
pub mod queue;

use slotfall_core::{
    Command, Event, GroupId, GroupSpec, Piece, PieceGroup, PieceId, QueueSlot, QUEUE_CAPACITY,
};
use tracing::{info, warn};

pub use grid::{GridState, OutOfBounds, Tile, TileOccupancy};
pub use placement::{PlacementController, QueuePlacement, RejectedPlacement};
pub use push::PushOutcome;
pub use queue::QueueState;

/// Represents the authoritative Slotfall session state.
#[derive(Debug)]
pub struct World {
    grid: GridState,
    queue: QueueState,
    controller: PlacementController,
    next_group: u32,
    next_piece: u32,
}

impl World {
    /// Creates a world with a default 3×3 grid and an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            grid: GridState::default(),
            queue: QueueState::new(QUEUE_CAPACITY),
            controller: PlacementController::default(),
            next_group: 0,
            next_piece: 0,
        }
    }

    fn allocate_group(&mut self, spec: &GroupSpec) -> PieceGroup {
        let group_id = GroupId::new(self.next_group);
        self.next_group = self.next_group.wrapping_add(1);

        let pieces = spec
            .pieces()
            .iter()
            .map(|piece_spec| {
                let piece_id = PieceId::new(self.next_piece);
                self.next_piece = self.next_piece.wrapping_add(1);
                Piece::new(piece_id, *piece_spec)
            })
            .collect();
        PieceGroup::new(group_id, pieces)
    }

    fn fill_queue_slot(&mut self, slot: QueueSlot, spec: &GroupSpec, out_events: &mut Vec<Event>) {
        if let Err(reason) = self.queue.ensure_vacant(slot) {
            warn!(slot = slot.get(), %reason, "queue fill rejected");
            out_events.push(Event::QueueFillRejected { slot, reason });
            return;
        }

        let group = self.allocate_group(spec);
        let group_id = group.id();
        let pieces = group.pieces().iter().map(Piece::id).collect();
        match self.queue.fill(slot, group) {
            Ok(()) => out_events.push(Event::QueueSlotFilled {
                slot,
                group: group_id,
                pieces,
            }),
            Err(reason) => out_events.push(Event::QueueFillRejected { slot, reason }),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { columns, rows } => {
            let grid = match GridState::new(columns, rows) {
                Ok(grid) => grid,
                Err(reason) => {
                    warn!(columns, rows, %reason, "grid configuration rejected");
                    out_events.push(Event::GridRejected {
                        columns,
                        rows,
                        reason,
                    });
                    return;
                }
            };
            world.grid = grid;
            world.queue = QueueState::new(QUEUE_CAPACITY);
            info!(columns, rows, "grid configured");
            out_events.push(Event::GridConfigured { columns, rows });
            out_events.push(Event::RefillNeeded);
        }
        Command::ConfigurePushRule { rule } => {
            world.controller.set_rule(rule);
            out_events.push(Event::PushRuleChanged { rule });
        }
        Command::FillQueueSlot { slot, group } => {
            world.fill_queue_slot(slot, &group, out_events);
        }
        Command::PlaceGroup { slot, target } => {
            let World {
                grid,
                queue,
                controller,
                ..
            } = world;
            match controller.place_from_queue(grid, queue, slot, target) {
                Ok(placement) => {
                    info!(
                        group = placement.report.group().get(),
                        x = target.x(),
                        z = target.z(),
                        kept = placement.report.any_kept(),
                        "group placed"
                    );
                    out_events.push(Event::GroupPlaced {
                        slot,
                        report: placement.report,
                    });
                    out_events.push(Event::QueueSlotEmptied { slot });
                    if placement.refill_needed {
                        info!("queue drained, refill requested");
                        out_events.push(Event::RefillNeeded);
                    }
                }
                Err(reason) => {
                    warn!(
                        slot = slot.get(),
                        x = target.x(),
                        z = target.z(),
                        %reason,
                        "placement rejected"
                    );
                    out_events.push(Event::PlacementRejected {
                        slot,
                        target,
                        reason,
                    });
                }
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use slotfall_core::{PushRule, QueueSlot, Slot, TileCoord};

    use super::{landing, GridState, QueueState, Tile, World};

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(world: &World) -> &GridState {
        &world.grid
    }

    /// Provides read-only access to the queue.
    #[must_use]
    pub fn queue(world: &World) -> &QueueState {
        &world.queue
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn grid_dimensions(world: &World) -> (u32, u32) {
        (world.grid.columns(), world.grid.rows())
    }

    /// Tile at `(x, z)`, or `None` outside the grid.
    #[must_use]
    pub fn tile_at(world: &World, x: u32, z: u32) -> Option<&Tile> {
        world.grid.tile_at(x, z)
    }

    /// Reports whether `slot` on `coord` holds a piece.
    #[must_use]
    pub fn is_slot_occupied(world: &World, coord: TileCoord, slot: Slot) -> bool {
        world.grid.is_slot_occupied(coord, slot)
    }

    /// Reports whether a group may currently be dropped on `coord`.
    #[must_use]
    pub fn is_droppable(world: &World, coord: TileCoord) -> bool {
        world.controller.validate(&world.grid, coord).is_ok()
    }

    /// Every tile a group may currently be dropped on, row by row.
    #[must_use]
    pub fn droppable_tiles(world: &World) -> Vec<TileCoord> {
        world
            .grid
            .tiles()
            .map(Tile::coord)
            .filter(|coord| is_droppable(world, *coord))
            .collect()
    }

    /// Tile a piece facing `direction` would land on if released at `origin`.
    #[must_use]
    pub fn landing_tile(world: &World, origin: TileCoord, direction: Slot) -> Option<TileCoord> {
        landing::find_landing_tile(&world.grid, origin, direction)
    }

    /// Queue positions that currently hold no group.
    #[must_use]
    pub fn empty_queue_slots(world: &World) -> Vec<QueueSlot> {
        world.queue.empty_slots()
    }

    /// Number of pieces in the session, on tiles or waiting in the queue.
    #[must_use]
    pub fn piece_count(world: &World) -> usize {
        world.grid.piece_count() + world.queue.piece_count()
    }

    /// Push rule applied to slot conflicts.
    #[must_use]
    pub fn push_rule(world: &World) -> PushRule {
        world.controller.rule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotfall_core::{
        GridConfigError, PieceColor, PieceSpec, PlacementError, PushRule, Slot, TileCoord,
    };

    fn spec(facings: &[Slot]) -> GroupSpec {
        GroupSpec::new(
            facings
                .iter()
                .map(|facing| PieceSpec::new(*facing, PieceColor::Red))
                .collect(),
        )
        .expect("valid group")
    }

    #[test]
    fn configure_grid_resets_state_and_requests_refill() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::ConfigureGrid {
                columns: 5,
                rows: 4,
            },
            &mut events,
        );

        assert_eq!(query::grid_dimensions(&world), (5, 4));
        assert_eq!(
            events,
            vec![
                Event::GridConfigured {
                    columns: 5,
                    rows: 4
                },
                Event::RefillNeeded,
            ]
        );
        assert_eq!(query::empty_queue_slots(&world).len(), QUEUE_CAPACITY);
    }

    #[test]
    fn oversized_grid_is_rejected_and_previous_state_kept() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FillQueueSlot {
                slot: QueueSlot::new(0),
                group: spec(&[Slot::Up]),
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::ConfigureGrid {
                columns: u32::MAX,
                rows: u32::MAX,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ConfigureGrid {
                columns: 0,
                rows: 2,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::GridRejected {
                    columns: u32::MAX,
                    rows: u32::MAX,
                    reason: GridConfigError::TooLarge {
                        columns: u32::MAX,
                        rows: u32::MAX,
                    },
                },
                Event::GridRejected {
                    columns: 0,
                    rows: 2,
                    reason: GridConfigError::Empty,
                },
            ]
        );
        assert_eq!(query::grid_dimensions(&world), (3, 3));
        assert_eq!(query::piece_count(&world), 1);
    }

    #[test]
    fn fill_assigns_sequential_identifiers() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::FillQueueSlot {
                slot: QueueSlot::new(0),
                group: spec(&[Slot::Up, Slot::Left]),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::FillQueueSlot {
                slot: QueueSlot::new(1),
                group: spec(&[Slot::Down]),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::QueueSlotFilled {
                    slot: QueueSlot::new(0),
                    group: GroupId::new(0),
                    pieces: vec![PieceId::new(0), PieceId::new(1)],
                },
                Event::QueueSlotFilled {
                    slot: QueueSlot::new(1),
                    group: GroupId::new(1),
                    pieces: vec![PieceId::new(2)],
                },
            ]
        );
        assert_eq!(query::piece_count(&world), 3);
    }

    #[test]
    fn fill_into_occupied_slot_is_rejected() {
        let mut world = World::new();
        let mut events = Vec::new();
        let command = Command::FillQueueSlot {
            slot: QueueSlot::new(2),
            group: spec(&[Slot::Right]),
        };

        apply(&mut world, command.clone(), &mut events);
        events.clear();
        apply(&mut world, command, &mut events);

        assert_eq!(
            events,
            vec![Event::QueueFillRejected {
                slot: QueueSlot::new(2),
                reason: slotfall_core::QueueFillError::SlotOccupied,
            }]
        );
    }

    #[test]
    fn rejected_placement_reports_reason() {
        let mut world = World::new();
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::PlaceGroup {
                slot: QueueSlot::new(0),
                target: TileCoord::new(0, 0),
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::PlacementRejected {
                slot: QueueSlot::new(0),
                target: TileCoord::new(0, 0),
                reason: PlacementError::EmptyQueueSlot,
            }]
        );
    }

    #[test]
    fn push_rule_is_configurable() {
        let mut world = World::new();
        let mut events = Vec::new();
        assert_eq!(query::push_rule(&world), PushRule::FirstFree);

        apply(
            &mut world,
            Command::ConfigurePushRule {
                rule: PushRule::Clockwise,
            },
            &mut events,
        );

        assert_eq!(query::push_rule(&world), PushRule::Clockwise);
        assert_eq!(
            events,
            vec![Event::PushRuleChanged {
                rule: PushRule::Clockwise
            }]
        );
    }
}
