//! Configuration types for the simulation.

use crate::error::{Error, Result};
use crate::types::{PlantKind, Species};
use serde::{Deserialize, Serialize};

/// Grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Number of rows
    pub height: i32,
    /// Number of columns
    pub width: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            height: 20,
            width: 30,
        }
    }
}

/// Relative weights for the non-animal content of the initial grid
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TileWeights {
    pub dirt: f64,
    pub water: f64,
    pub plant: f64,
}

impl Default for TileWeights {
    fn default() -> Self {
        Self {
            dirt: 0.6,
            water: 0.1,
            plant: 0.3,
        }
    }
}

/// Initial population composition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    /// Species drawn uniformly for each starting animal
    pub animals: Vec<Species>,
    /// Number of starting animals
    pub animal_count: usize,
    /// Plant kinds drawn uniformly for plant tiles
    pub plants: Vec<PlantKind>,
    pub tile_weights: TileWeights,
    /// Volume of every starting puddle
    pub initial_water_size: i32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            animals: vec![
                Species::Elephant,
                Species::Giraffe,
                Species::Hyena,
                Species::Lion,
                Species::Rhino,
                Species::Zebra,
            ],
            animal_count: 24,
            plants: vec![PlantKind::Bush, PlantKind::Grass, PlantKind::Tree],
            tile_weights: TileWeights::default(),
            initial_water_size: 20,
        }
    }
}

/// Rain parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Chance that it rains on a given turn
    pub rain_chance: f64,
    /// Chance that an empty cell fills with a puddle instead of dirt while raining
    pub puddle_chance: f64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            rain_chance: 0.2,
            puddle_chance: 0.1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlantConfig {
    /// Chance per turn that a plant gains one size
    pub growth_chance: f64,
    /// Chance per turn that a plant seeds an adjacent free cell
    pub spread_chance: f64,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            growth_chance: 0.01,
            spread_chance: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetabolismConfig {
    /// Hunger and thirst drained from every animal at the start of its turn
    pub basal_cost: i32,
}

/// Full simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Random seed for reproducibility
    pub seed: u64,
    /// Turn cap for `run`; 0 runs until no animal is left
    pub max_turns: u64,
    /// Turns between population census log lines
    pub census_interval: u64,
    pub world: WorldConfig,
    pub population: PopulationConfig,
    pub weather: WeatherConfig,
    pub plants: PlantConfig,
    pub metabolism: MetabolismConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_turns: 1_000,
            census_interval: 50,
            world: WorldConfig::default(),
            population: PopulationConfig::default(),
            weather: WeatherConfig::default(),
            plants: PlantConfig::default(),
            metabolism: MetabolismConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the turn loop cannot start from
    pub fn validate(&self) -> Result<()> {
        if self.world.height <= 0 || self.world.width <= 0 {
            return Err(Error::InvalidConfiguration(format!(
                "grid must have positive dimensions, got {}x{}",
                self.world.height, self.world.width
            )));
        }

        let Some(cells) = self.world.height.checked_mul(self.world.width) else {
            return Err(Error::InvalidConfiguration(format!(
                "grid of {}x{} cells is too large",
                self.world.height, self.world.width
            )));
        };
        let cells = cells as usize;
        if self.population.animal_count > cells {
            return Err(Error::InvalidConfiguration(format!(
                "{} animals do not fit on {} cells",
                self.population.animal_count, cells
            )));
        }
        if self.population.animal_count > 0 && self.population.animals.is_empty() {
            return Err(Error::InvalidConfiguration(
                "animal_count is set but no species are listed".to_string(),
            ));
        }

        let weights = &self.population.tile_weights;
        for (name, weight) in [
            ("dirt", weights.dirt),
            ("water", weights.water),
            ("plant", weights.plant),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "tile weight {name} must be a non-negative number"
                )));
            }
        }
        if weights.dirt + weights.water + weights.plant <= 0.0 {
            return Err(Error::InvalidConfiguration(
                "at least one tile weight must be positive".to_string(),
            ));
        }
        if weights.plant > 0.0 && self.population.plants.is_empty() {
            return Err(Error::InvalidConfiguration(
                "plant tiles are weighted but no plant kinds are listed".to_string(),
            ));
        }
        if self.population.initial_water_size <= 0 {
            return Err(Error::InvalidConfiguration(
                "initial_water_size must be positive".to_string(),
            ));
        }

        for (name, p) in [
            ("weather.rain_chance", self.weather.rain_chance),
            ("weather.puddle_chance", self.weather.puddle_chance),
            ("plants.growth_chance", self.plants.growth_chance),
            ("plants.spread_chance", self.plants.spread_chance),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must be within 0..=1, got {p}"
                )));
            }
        }

        if self.metabolism.basal_cost < 0 {
            return Err(Error::InvalidConfiguration(
                "metabolism.basal_cost cannot be negative".to_string(),
            ));
        }

        Ok(())
    }
}
