//! Parsing of scripted placement moves such as `0@1,2`.

use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use slotfall_core::{Command, QueueSlot, TileCoord};

/// Drop the group in queue slot `slot` on tile `(x, z)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Move {
    pub(crate) slot: QueueSlot,
    pub(crate) target: TileCoord,
}

impl Move {
    pub(crate) fn into_command(self) -> Command {
        Command::PlaceGroup {
            slot: self.slot,
            target: self.target,
        }
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        let (slot, coord) = value
            .trim()
            .split_once('@')
            .ok_or_else(|| anyhow!("move `{value}` must look like `slot@x,z`"))?;
        let (x, z) = coord
            .split_once(',')
            .ok_or_else(|| anyhow!("tile `{coord}` must look like `x,z`"))?;

        let slot = slot
            .trim()
            .parse()
            .with_context(|| format!("invalid queue slot in move `{value}`"))?;
        let x = x
            .trim()
            .parse()
            .with_context(|| format!("invalid x coordinate in move `{value}`"))?;
        let z = z
            .trim()
            .parse()
            .with_context(|| format!("invalid z coordinate in move `{value}`"))?;

        Ok(Self {
            slot: QueueSlot::new(slot),
            target: TileCoord::new(x, z),
        })
    }
}

/// Parses a whitespace separated list of moves.
pub(crate) fn parse_moves(script: &str) -> Result<Vec<Move>> {
    script.split_whitespace().map(Move::from_str).collect()
}
