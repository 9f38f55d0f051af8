//! The zoo: owns the grid and drives the turn loop.

use crate::collaborators::{EntitySnapshot, Persistence, Renderer};
use crate::entity::{Animal, Dirt, Occupant, Plant, Water};
use crate::grid::Grid;
use crate::lifecycle::{LifeEnded, PendingTile, TurnOutcome};
use crate::weather::Weather;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info, instrument, warn};
use zoo_core::{Census, EntityId, Error, LifeTally, Position, Result, SimConfig, ZooId};

/// Builds a [`Zoo`] with optional collaborators attached
pub struct ZooBuilder {
    config: SimConfig,
    persistence: Option<Box<dyn Persistence>>,
    renderer: Option<Box<dyn Renderer>>,
}

impl ZooBuilder {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            persistence: None,
            renderer: None,
        }
    }

    pub fn with_persistence(mut self, store: impl Persistence + 'static) -> Self {
        self.persistence = Some(Box::new(store));
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn build(self) -> Result<Zoo> {
        let mut zoo = Zoo::new(self.config)?;
        zoo.persistence = self.persistence;
        zoo.renderer = self.renderer;
        zoo.save_all();
        Ok(zoo)
    }
}

/// Counts for a single turn
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u64,
    pub acted: u32,
    pub births: u32,
    pub deaths: Vec<LifeEnded>,
    pub decomposed: u32,
}

impl TurnReport {
    fn record(&mut self, outcome: TurnOutcome) {
        self.acted += 1;
        match outcome {
            TurnOutcome::Continued => {}
            TurnOutcome::Died(ended) => self.deaths.push(ended),
            TurnOutcome::Reproduced(_) => self.births += 1,
            TurnOutcome::Decomposed => self.decomposed += 1,
        }
    }
}

/// Results from a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub zoo_id: ZooId,
    pub turns: u64,
    pub census: Census,
    pub tally: LifeTally,
    /// No animal was left when the run stopped
    pub extinct: bool,
}

pub struct Zoo {
    pub(crate) id: ZooId,
    pub(crate) grid: Grid,
    /// Displaced tile content waiting for its cell to clear
    pub(crate) pending: Vec<PendingTile>,
    pub(crate) weather: Weather,
    pub(crate) full: bool,
    pub(crate) elapsed_turns: u64,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha8Rng,
    pub(crate) tally: LifeTally,
    /// Entities that already acted, or were created, during the current pass
    pub(crate) acted: HashSet<EntityId>,
    /// Lives ended by another animal's turn, drained into the turn report
    pub(crate) casualties: Vec<LifeEnded>,
    persistence: Option<Box<dyn Persistence>>,
    renderer: Option<Box<dyn Renderer>>,
}

impl Zoo {
    /// Validate `config` and populate a fresh grid from it
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let mut zoo = Self::bare(config);
        zoo.populate()?;
        info!(
            event = "zoo_created",
            zoo_id = %zoo.id,
            height = zoo.grid.height,
            width = zoo.grid.width,
            animals = zoo.grid.count_animals(),
            seed = zoo.config.seed,
            "Zoo created"
        );
        Ok(zoo)
    }

    /// A zoo with an empty grid and default rules. Cells are filled on the
    /// first turn.
    pub fn empty(height: i32, width: i32, seed: u64) -> Self {
        let mut config = SimConfig {
            seed,
            ..SimConfig::default()
        };
        config.world.height = height;
        config.world.width = width;
        config.population.animal_count = 0;
        Self::bare(config)
    }

    fn bare(config: SimConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let id = ZooId::from_rng(&mut rng);
        Self {
            id,
            grid: Grid::new(config.world.height, config.world.width),
            pending: Vec::new(),
            weather: Weather::dry(),
            full: false,
            elapsed_turns: 0,
            config,
            rng,
            tally: LifeTally::new(),
            acted: HashSet::new(),
            casualties: Vec::new(),
            persistence: None,
            renderer: None,
        }
    }

    /// Animals on random cells, everything else drawn from the tile weights
    fn populate(&mut self) -> Result<()> {
        let population = self.config.population.clone();
        let mut cells = self.grid.positions();
        cells.shuffle(&mut self.rng);

        for pos in cells.iter().take(population.animal_count) {
            let Some(species) = population.animals.choose(&mut self.rng).copied() else {
                return Err(Error::InvalidConfiguration(
                    "no species to populate from".to_string(),
                ));
            };
            let animal = Animal::new(species, *pos, &mut self.rng);
            self.place(*pos, Occupant::Animal(animal));
        }

        let weights = &population.tile_weights;
        let tiles = WeightedIndex::new([weights.dirt, weights.water, weights.plant])
            .map_err(|e| Error::InvalidConfiguration(format!("tile weights: {e}")))?;
        for pos in self.grid.positions() {
            if self.grid.get(pos).is_some() {
                continue;
            }
            let occupant = match tiles.sample(&mut self.rng) {
                0 => Occupant::Dirt(Dirt::default()),
                1 => Occupant::Water(Water::new(population.initial_water_size)),
                _ => match population.plants.choose(&mut self.rng) {
                    Some(kind) => Occupant::Plant(Plant::new(*kind, pos, &mut self.rng)),
                    None => Occupant::Dirt(Dirt::default()),
                },
            };
            self.place(pos, occupant);
        }
        Ok(())
    }

    pub fn id(&self) -> ZooId {
        self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn elapsed_turns(&self) -> u64 {
        self.elapsed_turns
    }

    pub fn weather(&self) -> Weather {
        self.weather
    }

    pub fn tally(&self) -> &LifeTally {
        &self.tally
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn pending(&self) -> &[PendingTile] {
        &self.pending
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn animal_count(&self) -> usize {
        self.grid.count_animals()
    }

    /// Put `occupant` at `pos` unconditionally, returning what was there.
    /// Out-of-bounds positions are ignored.
    pub fn place(&mut self, pos: Position, mut occupant: Occupant) -> Option<Occupant> {
        match &mut occupant {
            Occupant::Animal(a) => a.position = pos,
            Occupant::Plant(p) => p.position = pos,
            Occupant::Corpse(c) => c.position = pos,
            Occupant::Water(_) | Occupant::Dirt(_) => {}
        }
        self.grid.set(pos, occupant).ok().flatten()
    }

    /// Recompute and return the capacity flag
    pub fn check_full(&mut self) -> bool {
        self.full = self.grid.is_full();
        self.full
    }

    fn add_organism(&mut self, pos: Position, occupant: Occupant) -> bool {
        if self.check_full() || !self.grid.is_free(pos) {
            debug!(position = %pos, kind = occupant.name(), "No room to add");
            return false;
        }
        self.place(pos, occupant);
        self.save_at(pos);
        true
    }

    /// Add an animal at its own position. A no-op returning false when the
    /// zoo is full or the cell is taken.
    pub fn add_animal(&mut self, animal: Animal) -> bool {
        let pos = animal.position;
        self.add_organism(pos, Occupant::Animal(animal))
    }

    pub fn add_plant(&mut self, plant: Plant) -> bool {
        let pos = plant.position;
        self.add_organism(pos, Occupant::Plant(plant))
    }

    pub fn add_water(&mut self, pos: Position, size: i32) -> bool {
        self.add_organism(pos, Occupant::Water(Water::new(size)))
    }

    /// Run one full turn
    pub fn step(&mut self) -> TurnReport {
        let turn = self.elapsed_turns;
        self.acted.clear();
        self.casualties.clear();

        self.reconcile_pending();
        self.resolve_weather();
        self.fill_blanks();
        self.apply_rain();
        self.check_full();
        self.render_frame();

        let mut report = TurnReport {
            turn,
            ..TurnReport::default()
        };
        for pos in self.grid.positions() {
            let Some(occupant) = self.grid.get(pos) else {
                continue;
            };
            match occupant.id() {
                Some(id) if !self.acted.contains(&id) => {}
                _ => continue,
            }
            let outcome = match occupant {
                Occupant::Animal(_) => self.animal_turn(pos),
                Occupant::Plant(_) => self.plant_turn(pos),
                Occupant::Corpse(_) => self.corpse_turn(pos),
                Occupant::Water(_) | Occupant::Dirt(_) => continue,
            };
            report.record(outcome);
            report.deaths.append(&mut self.casualties);
        }

        self.elapsed_turns += 1;
        self.save_all();

        info!(
            event = "turn_completed",
            turn,
            acted = report.acted,
            births = report.births,
            deaths = report.deaths.len(),
            decomposed = report.decomposed,
            animals = self.grid.count_animals(),
            raining = self.weather.is_raining,
            "Turn {} complete",
            turn
        );
        report
    }

    /// Run until no animal is left or `max_turns` is reached
    #[instrument(skip(self), fields(zoo_id = %self.id, max_turns = self.config.max_turns))]
    pub fn run(&mut self) -> SimulationResult {
        info!(
            event = "simulation_started",
            animals = self.grid.count_animals(),
            "Starting simulation"
        );

        loop {
            if self.grid.count_animals() == 0 {
                break;
            }
            if self.config.max_turns > 0 && self.elapsed_turns >= self.config.max_turns {
                break;
            }
            self.step();

            let interval = self.config.census_interval;
            if interval > 0 && self.elapsed_turns % interval == 0 {
                self.log_census();
            }
        }

        let result = self.collect_results();
        info!(
            event = "simulation_finished",
            turns = result.turns,
            extinct = result.extinct,
            births = result.tally.animal_births,
            deaths = result.tally.total_animal_deaths(),
            "🏁 Simulation finished after {} turns",
            result.turns
        );
        result
    }

    /// Count everything on the grid right now
    pub fn census(&self) -> Census {
        let mut census = Census::new(self.elapsed_turns);
        for pos in self.grid.positions() {
            match self.grid.get(pos) {
                Some(Occupant::Animal(a)) => census.record_animal(a.species),
                Some(Occupant::Plant(p)) => census.record_plant(p.kind),
                Some(Occupant::Corpse(_)) => census.corpses += 1,
                Some(Occupant::Water(w)) => {
                    census.water_tiles += 1;
                    census.water_volume += i64::from(w.size);
                }
                Some(Occupant::Dirt(_)) => census.dirt_tiles += 1,
                None => census.empty_tiles += 1,
            }
        }
        census
    }

    fn log_census(&self) {
        let census = self.census();
        info!(
            event = "population_snapshot",
            turn = census.turn,
            animals = census.total_animals(),
            plants = census.total_plants(),
            corpses = census.corpses,
            water_tiles = census.water_tiles,
            by_species = ?census.animals,
            "Population snapshot"
        );
    }

    fn collect_results(&self) -> SimulationResult {
        let census = self.census();
        SimulationResult {
            zoo_id: self.id,
            turns: self.elapsed_turns,
            extinct: census.total_animals() == 0,
            census,
            tally: self.tally.clone(),
        }
    }

    fn render_frame(&mut self) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if let Err(err) = renderer.render(&self.grid, self.elapsed_turns) {
            warn!(error = %err, turn = self.elapsed_turns, "Render failed");
        }
    }

    /// Persist one occupant. Failures are logged and otherwise ignored.
    pub(crate) fn save_snapshot(&mut self, pos: Position, occupant: &Occupant) {
        let Some(store) = self.persistence.as_mut() else {
            return;
        };
        let Some(snapshot) = EntitySnapshot::new(self.id, self.elapsed_turns, pos, occupant.clone())
        else {
            return;
        };
        if let Err(err) = store.save(&snapshot) {
            warn!(error = %err, entity_id = %snapshot.id, "Failed to save entity");
        }
    }

    pub(crate) fn save_at(&mut self, pos: Position) {
        if self.persistence.is_none() {
            return;
        }
        if let Some(occupant) = self.grid.get(pos).cloned() {
            self.save_snapshot(pos, &occupant);
        }
    }

    /// End-of-turn checkpoint of every organism on the grid
    pub(crate) fn save_all(&mut self) {
        let Some(store) = self.persistence.as_mut() else {
            return;
        };
        let mut failures = 0u32;
        for (pos, occupant) in self.grid.iter() {
            let Some(snapshot) =
                EntitySnapshot::new(self.id, self.elapsed_turns, pos, occupant.clone())
            else {
                continue;
            };
            if let Err(err) = store.save(&snapshot) {
                failures += 1;
                debug!(error = %err, entity_id = %snapshot.id, "Failed to save entity");
            }
        }
        if failures > 0 {
            warn!(failures, turn = self.elapsed_turns, "Some entities were not saved");
        }
    }
}
