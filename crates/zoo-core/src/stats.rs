//! Population statistics tracking.

use crate::types::{CauseOfDeath, PlantKind, Species};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Head count of everything on the grid at one moment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    pub turn: u64,
    pub animals: BTreeMap<Species, u32>,
    pub plants: BTreeMap<PlantKind, u32>,
    pub corpses: u32,
    pub water_tiles: u32,
    /// Total remaining volume across all puddles
    pub water_volume: i64,
    pub dirt_tiles: u32,
    pub empty_tiles: u32,
}

impl Census {
    pub fn new(turn: u64) -> Self {
        Self {
            turn,
            ..Self::default()
        }
    }

    pub fn record_animal(&mut self, species: Species) {
        *self.animals.entry(species).or_insert(0) += 1;
    }

    pub fn record_plant(&mut self, kind: PlantKind) {
        *self.plants.entry(kind).or_insert(0) += 1;
    }

    pub fn total_animals(&self) -> u32 {
        self.animals.values().sum()
    }

    pub fn total_plants(&self) -> u32 {
        self.plants.values().sum()
    }
}

/// Running totals of births and deaths over a whole run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifeTally {
    pub animal_births: u64,
    pub plant_births: u64,
    pub deaths: BTreeMap<CauseOfDeath, u64>,
    pub plant_deaths: u64,
    pub corpses_placed: u64,
    /// Corpses lost because their cell was taken before they could be placed
    pub corpses_dropped: u64,
    pub corpses_decomposed: u64,
    pub corpses_eaten: u64,
    pub plants_eaten: u64,
}

impl LifeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_death(&mut self, cause: CauseOfDeath) {
        *self.deaths.entry(cause).or_insert(0) += 1;
    }

    pub fn total_animal_deaths(&self) -> u64 {
        self.deaths.values().sum()
    }
}
