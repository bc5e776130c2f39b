//! Tick orchestrator: owns the grid, factory, randomness stream and event
//! bus, and advances the whole world one deterministic tick at a time.

use crate::cell::{CellKind, Organic};
use crate::context::UpdateContext;
use crate::events::{EventBus, GameEvent};
use crate::factory::CellFactory;
use crate::genome::Genome;
use crate::grid::Grid;
use crate::organism;
use primordia_core::{CellId, Direction, Error, GameConfig, Position, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::HashSet;
use tracing::{debug, info};

/// Energy of organisms seeded at construction, below the division
/// threshold so the first generations have to feed before multiplying.
const INITIAL_ENERGY: i32 = 50;

/// Attempts at placing one seeded organism before giving up.
const SPAWN_ATTEMPTS: usize = 100;

/// Ticks between population metric snapshots in the log.
const METRICS_INTERVAL: u64 = 100;

pub struct Game {
    config: GameConfig,
    grid: Grid,
    factory: CellFactory,
    rng: ChaCha8Rng,
    step: u64,
    events: EventBus,
}

impl Game {
    /// Build a world from a validated configuration and seed the initial
    /// population at random empty positions.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut factory = CellFactory::new();
        let mut grid = Grid::new(config.width, config.height, config.loop_mode);

        for lineage in 0..config.population {
            Self::spawn_organism(&mut grid, &mut factory, &mut rng, lineage as u64)?;
        }

        // Construction is not a tick; nobody is subscribed yet.
        grid.take_events();

        info!(
            width = config.width,
            height = config.height,
            loop_mode = ?config.loop_mode,
            population = config.population,
            seed = config.seed,
            "world created"
        );

        Ok(Self {
            config,
            grid,
            factory,
            rng,
            step: 0,
            events: EventBus::new(),
        })
    }

    fn spawn_organism(
        grid: &mut Grid,
        factory: &mut CellFactory,
        rng: &mut ChaCha8Rng,
        lineage: u64,
    ) -> Result<()> {
        let mut found = None;
        for _ in 0..SPAWN_ATTEMPTS {
            let pos = Position::new(
                rng.gen_range(0..grid.width()),
                rng.gen_range(0..grid.height()),
            );
            if grid.get(pos).is_empty() {
                found = Some(pos);
                break;
            }
        }

        // Dense worlds defeat random probing; fall back to the first free
        // slot in canonical order.
        let pos = found
            .or_else(|| grid.positions().find(|p| grid.get(*p).is_empty()))
            .ok_or_else(|| Error::InvalidState("no empty cell left to spawn into".to_string()))?;

        let genome = Genome::random(rng);
        let direction = Direction::random(rng);
        let cell = factory.create_organism(genome, direction, INITIAL_ENERGY, lineage);
        grid.insert(pos, cell);
        Ok(())
    }

    /// Advance one discrete tick: plant generation, the per-cell update pass
    /// in canonical order, step increment, event publication.
    pub fn update(&mut self) {
        self.generate_plants();

        // An organism that moved ahead of the scan cursor must not act a
        // second time within the same pass.
        let mut updated: HashSet<CellId> = HashSet::new();

        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                let pos = Position::new(x, y);
                let cell = self.grid.get(pos);
                if cell.is_static() {
                    continue;
                }
                if let Some(id) = cell.id() {
                    if !updated.insert(id) {
                        continue;
                    }
                }

                let kind = cell.kind();
                let mut ctx = UpdateContext {
                    grid: &mut self.grid,
                    factory: &mut self.factory,
                    rng: &mut self.rng,
                    pos,
                };

                match kind {
                    CellKind::Organism => organism::update(&mut ctx),
                    CellKind::Organic => Organic::update(&mut ctx),
                    CellKind::Empty | CellKind::Wall | CellKind::Plant => {}
                }
            }
        }

        self.step += 1;

        for event in self.grid.take_events() {
            self.events.publish(&event);
        }
        self.events.publish(&GameEvent::StepCompleted { step: self.step });

        if self.step % METRICS_INTERVAL == 0 {
            self.emit_population_metrics();
        }
    }

    /// Stochastic plant seeding. The per-cell probability is computed once
    /// from start-of-tick counts; cells converted earlier in the scan are
    /// not reconsidered because they no longer read as empty.
    fn generate_plants(&mut self) {
        let count_empty = self.grid.count_empty();
        if count_empty == 0 {
            return;
        }

        let total = self.config.total_cells() as f64;
        let chance =
            count_empty as f64 / total / 100.0 * (self.config.plant_spawn_rate / 10.0);

        for x in 0..self.grid.width() {
            for y in 0..self.grid.height() {
                let pos = Position::new(x, y);
                if self.grid.get(pos).is_empty() && self.rng.gen::<f64>() < chance {
                    let plant = self.factory.create_plant();
                    self.grid.insert(pos, plant);
                }
            }
        }
    }

    fn emit_population_metrics(&self) {
        let mut organisms = 0usize;
        let mut plants = 0usize;
        let mut organics = 0usize;
        let mut total_energy = 0i64;

        for (_, cell) in self.grid.iter() {
            match cell.kind() {
                CellKind::Organism => {
                    organisms += 1;
                    if let crate::cell::Cell::Organism(o) = cell {
                        total_energy += o.energy as i64;
                    }
                }
                CellKind::Plant => plants += 1,
                CellKind::Organic => organics += 1,
                _ => {}
            }
        }

        let avg_energy = if organisms > 0 {
            total_energy / organisms as i64
        } else {
            0
        };

        debug!(
            step = self.step,
            organisms,
            plants,
            organics,
            avg_energy,
            "population snapshot"
        );
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn step(&self) -> u64 {
        self.step
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Register an event subscriber. Subscribers receive `CellInserted` and
    /// `CellDeleted` in operation order after each pass, then a single
    /// `StepCompleted`.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&GameEvent) + 'static) {
        self.events.subscribe(subscriber);
    }
}
