#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays slotfall sessions and dumps the board.

mod render;
mod script;

use anyhow::{ensure, Result};
use clap::{Parser, ValueEnum};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use slotfall_core::{Command, Event, PushRule, QueueSlot, MAX_GRID_TILES};
use slotfall_system_refill::{Config, Refill};
use slotfall_world::{self as world, query, World};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::script::Move;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PushRuleArg {
    FirstFree,
    Clockwise,
}

impl From<PushRuleArg> for PushRule {
    fn from(value: PushRuleArg) -> Self {
        match value {
            PushRuleArg::FirstFree => Self::FirstFree,
            PushRuleArg::Clockwise => Self::Clockwise,
        }
    }
}

/// Command-line arguments for a slotfall session.
#[derive(Debug, Parser)]
#[command(name = "slotfall", about = "Drop piece groups onto a slotted grid")]
struct Args {
    /// Number of grid columns.
    #[arg(long, default_value_t = 3)]
    columns: u32,
    /// Number of grid rows.
    #[arg(long, default_value_t = 3)]
    rows: u32,
    /// Seed for the refill generator and autoplay.
    #[arg(long, default_value_t = 0x5107_fa11)]
    seed: u64,
    /// How occupied destination slots are resolved.
    #[arg(long, value_enum, default_value_t = PushRuleArg::FirstFree)]
    push_rule: PushRuleArg,
    /// Smallest generated group.
    #[arg(long, default_value_t = 1)]
    min_pieces: usize,
    /// Largest generated group.
    #[arg(long, default_value_t = 4)]
    max_pieces: usize,
    /// Scripted moves such as "0@1,1 2@0,2".
    #[arg(long)]
    moves: Option<String>,
    /// Plays this many random moves after the script.
    #[arg(long, default_value_t = 0)]
    autoplay: u32,
}

struct Session {
    world: World,
    refill: Refill,
}

impl Session {
    fn new(args: &Args) -> Self {
        let config = Config::new(args.seed).with_piece_range(args.min_pieces, args.max_pieces);
        Self {
            world: World::new(),
            refill: Refill::new(config),
        }
    }

    /// Applies a command and feeds resulting events to the refill system until it settles.
    fn run(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);

        while !events.is_empty() {
            for event in &events {
                report(event);
            }

            let empty_slots = query::empty_queue_slots(&self.world);
            let mut commands = Vec::new();
            self.refill.handle(&events, &empty_slots, &mut commands);
            if commands.is_empty() {
                break;
            }

            events.clear();
            for command in commands {
                world::apply(&mut self.world, command, &mut events);
            }
        }
    }

    fn autoplay_move(&self, rng: &mut ChaCha8Rng) -> Option<Move> {
        let slots: Vec<QueueSlot> = query::queue(&self.world)
            .positions()
            .filter_map(|(slot, group)| group.map(|_| slot))
            .collect();
        let targets = query::droppable_tiles(&self.world);

        let slot = *slots.choose(rng)?;
        let target = *targets.choose(rng)?;
        Some(Move { slot, target })
    }
}

fn report(event: &Event) {
    match event {
        Event::GroupPlaced { slot, report } => {
            info!(
                slot = slot.get(),
                target = ?report.target(),
                kept = report.any_kept(),
                "group placed"
            );
        }
        Event::PlacementRejected {
            slot,
            target,
            reason,
        } => warn!(slot = slot.get(), ?target, %reason, "placement rejected"),
        other => debug!(?other, "event"),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Entry point for the slotfall command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    ensure!(
        args.columns > 0 && args.rows > 0,
        "grid must have at least one column and one row"
    );
    ensure!(
        args.columns
            .checked_mul(args.rows)
            .is_some_and(|tiles| tiles <= MAX_GRID_TILES),
        "grid of {}x{} tiles exceeds the {}-tile limit",
        args.columns,
        args.rows,
        MAX_GRID_TILES
    );

    let moves = args
        .moves
        .as_deref()
        .map(script::parse_moves)
        .transpose()?
        .unwrap_or_default();

    let mut session = Session::new(&args);
    session.run(Command::ConfigurePushRule {
        rule: args.push_rule.into(),
    });
    session.run(Command::ConfigureGrid {
        columns: args.columns,
        rows: args.rows,
    });

    for step in moves {
        session.run(step.into_command());
    }

    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    for turn in 0..args.autoplay {
        let Some(step) = session.autoplay_move(&mut rng) else {
            info!(turn, "no droppable tile left, stopping autoplay");
            break;
        };
        session.run(step.into_command());
    }

    print!("{}", render::render_grid(&session.world));
    println!();
    print!("{}", render::render_queue(&session.world));
    Ok(())
}
