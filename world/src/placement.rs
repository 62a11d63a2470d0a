//! Orchestrates a full group placement across landing and push resolution.

use slotfall_core::{
    Piece, PieceGroup, PieceOutcome, PlacementError, PlacementReport, PushRule, QueueSlot,
    RetentionReason, TileCoord,
};
use tracing::{debug, warn};

use crate::{
    grid::GridState,
    landing::find_landing_tile,
    push::{resolve_push, PushOutcome},
    queue::QueueState,
};

/// A placement that was refused before touching the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RejectedPlacement {
    /// Why the placement was refused.
    pub error: PlacementError,
    /// The group, returned unchanged to the caller.
    pub group: PieceGroup,
}

/// Outcome of placing a group picked up from the queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuePlacement {
    /// Per-piece resolution of the group.
    pub report: PlacementReport,
    /// Whether every queue slot is empty after the group left.
    pub refill_needed: bool,
}

/// Resolves placement commands against a grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlacementController {
    rule: PushRule,
}

impl PlacementController {
    /// Creates a controller that relocates occupants using `rule`.
    #[must_use]
    pub const fn new(rule: PushRule) -> Self {
        Self { rule }
    }

    /// Push rule applied to slot conflicts.
    #[must_use]
    pub const fn rule(&self) -> PushRule {
        self.rule
    }

    /// Replaces the push rule used for subsequent placements.
    pub fn set_rule(&mut self, rule: PushRule) {
        self.rule = rule;
    }

    /// Checks that `target` can accept a whole group.
    pub fn validate(&self, grid: &GridState, target: TileCoord) -> Result<(), PlacementError> {
        let tile = grid.tile(target).ok_or(PlacementError::OutOfBounds)?;
        if tile.is_occupied() || tile.has_pieces() {
            return Err(PlacementError::TargetOccupied);
        }
        Ok(())
    }

    /// Places `group` on `target` and resolves every piece in group order.
    ///
    /// A rejected target leaves the grid untouched and hands the group back.
    /// Otherwise each piece either lands and is seated, or stays on `target`.
    pub fn place(
        &self,
        grid: &mut GridState,
        group: PieceGroup,
        target: TileCoord,
    ) -> Result<PlacementReport, RejectedPlacement> {
        if let Err(error) = self.validate(grid, target) {
            return Err(RejectedPlacement { error, group });
        }

        let group_id = group.id();
        grid.mark_occupied(target, true);

        let mut touched = vec![target];
        let mut outcomes = Vec::with_capacity(group.pieces().len());
        for piece in group.into_pieces() {
            let outcome = self.resolve_piece(grid, piece, target);
            debug!(
                piece = outcome.piece().get(),
                x = outcome.tile().x(),
                z = outcome.tile().z(),
                slot = ?outcome.slot(),
                kept = outcome.is_kept(),
                "piece resolved"
            );
            if !touched.contains(&outcome.tile()) {
                touched.push(outcome.tile());
            }
            outcomes.push(outcome);
        }

        for coord in touched {
            grid.reconcile_occupancy(coord);
        }

        Ok(PlacementReport::new(group_id, target, outcomes))
    }

    /// Picks up the group in `slot` and places it on `target`.
    ///
    /// Nothing changes when the command is rejected. An accepted placement
    /// always consumes the group, so the queue slot ends up empty.
    pub fn place_from_queue(
        &self,
        grid: &mut GridState,
        queue: &mut QueueState,
        slot: QueueSlot,
        target: TileCoord,
    ) -> Result<QueuePlacement, PlacementError> {
        if queue.group(slot).is_none() {
            return Err(if queue.is_empty_slot(slot) {
                PlacementError::EmptyQueueSlot
            } else {
                PlacementError::UnknownQueueSlot
            });
        }
        self.validate(grid, target)?;

        let group = queue.take(slot)?;
        let report = self
            .place(grid, group, target)
            .map_err(|rejected| rejected.error)?;

        Ok(QueuePlacement {
            report,
            refill_needed: queue.all_empty(),
        })
    }

    fn resolve_piece(&self, grid: &mut GridState, piece: Piece, origin: TileCoord) -> PieceOutcome {
        let landing = find_landing_tile(grid, origin, piece.facing());
        self.settle(grid, piece, origin, landing)
    }

    /// Seats `piece` on `landing`, or keeps it on `origin` when there is no
    /// landing tile or the landing tile has no room.
    fn settle(
        &self,
        grid: &mut GridState,
        piece: Piece,
        origin: TileCoord,
        landing: Option<TileCoord>,
    ) -> PieceOutcome {
        let facing = piece.facing();
        let id = piece.id();

        let Some(landing) = landing else {
            return self.keep_at_origin(grid, piece, origin, RetentionReason::NoLandingTile);
        };

        match resolve_push(grid, landing, facing, piece, self.rule) {
            PushOutcome::Seated { relocation } => PieceOutcome::Placed {
                piece: id,
                tile: landing,
                slot: facing,
                relocation,
            },
            PushOutcome::DestinationFull { piece } => {
                warn!(
                    x = landing.x(),
                    z = landing.z(),
                    "all slots full, piece stays on its origin"
                );
                self.keep_at_origin(grid, piece, origin, RetentionReason::DestinationFull)
            }
        }
    }

    fn keep_at_origin(
        &self,
        grid: &mut GridState,
        piece: Piece,
        origin: TileCoord,
        reason: RetentionReason,
    ) -> PieceOutcome {
        let id = piece.id();
        let facing = piece.facing();
        grid.mark_occupied(origin, true);

        match resolve_push(grid, origin, facing, piece, self.rule) {
            PushOutcome::Seated { relocation } => PieceOutcome::KeptAtOrigin {
                piece: id,
                origin,
                slot: Some(facing),
                relocation,
                reason,
            },
            PushOutcome::DestinationFull { piece } => {
                if let Err(error) = grid.hold(origin, piece) {
                    warn!(%error, "origin vanished while holding a piece");
                }
                PieceOutcome::KeptAtOrigin {
                    piece: id,
                    origin,
                    slot: None,
                    relocation: None,
                    reason,
                }
            }
        }
    }
}
