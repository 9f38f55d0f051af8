//! Rain and its effect on the terrain.

use crate::entity::{Dirt, Occupant, Water};
use crate::zoo::Zoo;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use zoo_core::{PlantKind, RainIntensity};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weather {
    pub is_raining: bool,
    pub intensity: Option<RainIntensity>,
}

impl Weather {
    pub fn dry() -> Self {
        Self::default()
    }

    pub fn raining(intensity: RainIntensity) -> Self {
        Self {
            is_raining: true,
            intensity: Some(intensity),
        }
    }
}

/// Weighted draw over the literal intensity weights
pub fn draw_intensity<R: Rng + ?Sized>(rng: &mut R) -> RainIntensity {
    let intensities = RainIntensity::all();
    match WeightedIndex::new(intensities.iter().map(RainIntensity::weight)) {
        Ok(dist) => intensities[dist.sample(rng)],
        Err(_) => RainIntensity::Moderate,
    }
}

/// Content for a cell left empty at the end of reconciliation
pub fn fill_cell<R: Rng + ?Sized>(weather: Weather, puddle_chance: f64, rng: &mut R) -> Occupant {
    if let Some(intensity) = weather.intensity.filter(|_| weather.is_raining) {
        if rng.gen_bool(puddle_chance) {
            let size = rng.gen_range(1..=intensity.puddle_max());
            return Occupant::Water(Water::new(size));
        }
    }
    Occupant::Dirt(Dirt::default())
}

/// Apply one turn of rain to a tile. Each tile rolls its own coin.
pub fn rain_on<R: Rng + ?Sized>(occupant: &mut Occupant, intensity: RainIntensity, rng: &mut R) {
    use RainIntensity::*;

    match occupant {
        Occupant::Dirt(dirt) => match intensity {
            Torrential => *occupant = Occupant::Water(Water::new(75)),
            Heavy => {
                if rng.gen_bool(0.5) {
                    *occupant = Occupant::Water(Water::new(10));
                }
            }
            Moderate => {
                if rng.gen_bool(0.5) {
                    dirt.nutrients += 1;
                }
            }
            Mist => {}
        },
        Occupant::Water(water) => {
            let gain = match intensity {
                Torrential => 10,
                Heavy => 5,
                Moderate | Mist => 1,
            };
            if rng.gen_bool(0.5) {
                water.size += gain;
            }
        }
        Occupant::Plant(plant) if plant.kind == PlantKind::Grass => {
            if !rng.gen_bool(0.5) {
                return;
            }
            match intensity {
                Torrential => *occupant = Occupant::Water(Water::new(25)),
                Heavy => plant.size += 2,
                Moderate | Mist => plant.size += 1,
            }
        }
        _ => {}
    }
}

impl Zoo {
    pub(crate) fn resolve_weather(&mut self) {
        self.weather = if self.rng.gen_bool(self.config.weather.rain_chance) {
            Weather::raining(draw_intensity(&mut self.rng))
        } else {
            Weather::dry()
        };
        debug!(
            raining = self.weather.is_raining,
            intensity = ?self.weather.intensity,
            turn = self.elapsed_turns,
            "Weather resolved"
        );
    }

    /// Give every empty cell dirt or, under rain, possibly a puddle
    pub(crate) fn fill_blanks(&mut self) {
        let puddle_chance = self.config.weather.puddle_chance;
        for pos in self.grid.positions() {
            if self.grid.get(pos).is_some() {
                continue;
            }
            let content = fill_cell(self.weather, puddle_chance, &mut self.rng);
            // positions() only yields in-bounds cells
            let _ = self.grid.set(pos, content);
        }
    }

    pub(crate) fn apply_rain(&mut self) {
        let Some(intensity) = self.weather.intensity.filter(|_| self.weather.is_raining) else {
            return;
        };
        for pos in self.grid.positions() {
            if let Some(occupant) = self.grid.get_mut(pos) {
                rain_on(occupant, intensity, &mut self.rng);
            }
        }
    }
}
