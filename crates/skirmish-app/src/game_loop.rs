//! Fixed-rate game loop for the headless runner.
//!
//! Feeds scripted commands into the engine at their scheduled tick, advances
//! the simulation, and optionally paces ticks against the wall clock.

use std::time::{Duration, Instant};

use tracing::info;

use skirmish_core::enums::Team;
use skirmish_core::state::ArenaSnapshot;
use skirmish_sim::scenario::Scenario;
use skirmish_sim::SimulationEngine;

#[derive(Debug, Clone, Copy)]
pub struct LoopOptions {
    /// Number of ticks to run.
    pub ticks: u64,
    /// Sleep between ticks so the run lasts as long as it simulates.
    pub realtime: bool,
}

/// Run the loop and return the final snapshot.
pub fn run(engine: &mut SimulationEngine, scenario: &Scenario, options: LoopOptions) -> ArenaSnapshot {
    let tick_rate = u64::from(engine.config().tick_rate.max(1));
    let tick_duration = Duration::from_nanos(1_000_000_000 / tick_rate);
    let mut next_tick_time = Instant::now();
    let mut snapshot = ArenaSnapshot::default();

    for _ in 0..options.ticks {
        // 1. Queue whatever the script schedules before this tick
        engine.queue_commands(scenario.commands_at(engine.time().tick).cloned());

        // 2. Advance one tick
        snapshot = engine.tick();

        // 3. Once per simulated second, log a summary
        if snapshot.time.tick % tick_rate == 0 {
            log_summary(&snapshot);
        }

        // 4. Sleep until next tick
        if options.realtime {
            next_tick_time += tick_duration;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > tick_duration * 2 {
                // Too far behind, reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    }

    snapshot
}

fn log_summary(snapshot: &ArenaSnapshot) {
    let crystals = |team: Team| snapshot.team(team).map_or(0.0, |t| t.crystals_total);
    info!(
        tick = snapshot.time.tick,
        viewing = %snapshot.viewing_team,
        entities = snapshot.entities.len(),
        visible = snapshot.visible_handles().count(),
        red_crystals = crystals(Team::Red),
        blue_crystals = crystals(Team::Blue),
        "tick summary"
    );
}
