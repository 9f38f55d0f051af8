//! Occupants of grid cells: animals, plants, corpses, water and dirt.

use crate::species::{plant_profile, profile, PlantProfile, SpeciesProfile};
use rand::Rng;
use serde::{Deserialize, Serialize};
use zoo_core::{CauseOfDeath, EntityId, FoodTag, Gender, Motive, PlantKind, Position, Species};

pub const DEFAULT_RESERVE: i32 = 50;
pub const DEFAULT_MAX_RESERVE: i32 = 100;

/// A needs-driven animal.
///
/// Hunger, thirst and energy are reserves: higher means better fed, rested or
/// watered. Any of them reaching zero is fatal. Virility reaching zero only
/// stops reproduction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animal {
    pub id: EntityId,
    pub species: Species,
    pub gender: Gender,
    pub position: Position,
    pub strength: i32,
    pub speed: i32,
    pub size: i32,
    pub hunger: i32,
    pub thirst: i32,
    pub energy: i32,
    pub virility: i32,
    pub max_hunger: i32,
    pub max_thirst: i32,
    pub max_energy: i32,
    pub max_virility: i32,
    pub age: u64,
    pub max_age: u64,
    pub birth_turn: u64,
    pub motive: Motive,
    pub sleep_counter: i32,
    pub is_alive: bool,
    pub cause_of_death: Option<CauseOfDeath>,
}

impl Animal {
    pub fn new<R: Rng + ?Sized>(species: Species, position: Position, rng: &mut R) -> Self {
        let p = profile(species);
        Self {
            id: EntityId::from_rng(rng),
            species,
            gender: Gender::random(rng),
            position,
            strength: p.strength,
            speed: p.speed,
            size: p.size,
            hunger: DEFAULT_RESERVE,
            thirst: DEFAULT_RESERVE,
            energy: DEFAULT_RESERVE,
            virility: DEFAULT_RESERVE,
            max_hunger: DEFAULT_MAX_RESERVE,
            max_thirst: DEFAULT_MAX_RESERVE,
            max_energy: DEFAULT_MAX_RESERVE,
            max_virility: DEFAULT_MAX_RESERVE,
            age: 0,
            max_age: p.max_age,
            birth_turn: 0,
            motive: Motive::Mate,
            sleep_counter: 0,
            is_alive: true,
            cause_of_death: None,
        }
    }

    /// Child of two parents. Traits are the parents' averages.
    pub fn offspring<R: Rng + ?Sized>(
        parent: &Animal,
        partner: &Animal,
        position: Position,
        turn: u64,
        rng: &mut R,
    ) -> Self {
        let mut baby = Animal::new(parent.species, position, rng);
        baby.size = (parent.size + partner.size) / 2;
        baby.strength = (parent.strength + partner.strength) / 2;
        baby.speed = (parent.speed + partner.speed) / 2;
        baby.virility = ((parent.virility + partner.virility) / 2).min(baby.max_virility);
        baby.energy = ((parent.max_energy as f64 * 0.4 + partner.max_energy as f64 * 0.4) as i32)
            .min(baby.max_energy);
        baby.hunger = baby.max_hunger / 2;
        baby.thirst = baby.max_thirst / 2;
        baby.birth_turn = turn;
        baby.age = 0;
        baby
    }

    pub fn profile(&self) -> &'static SpeciesProfile {
        profile(self.species)
    }

    pub fn name(&self) -> &'static str {
        self.species.name()
    }

    /// Radius of the square an animal can see and reach food or water in
    pub fn sensing_radius(&self) -> i32 {
        self.speed.max(1)
    }

    /// First vital that has failed, if any. Age is checked before reserves.
    pub fn failing_vital(&self) -> Option<CauseOfDeath> {
        if self.age > self.max_age {
            Some(CauseOfDeath::NaturalCauses)
        } else if self.thirst <= 0 {
            Some(CauseOfDeath::Dehydration)
        } else if self.hunger <= 0 {
            Some(CauseOfDeath::Starvation)
        } else if self.energy <= 0 {
            Some(CauseOfDeath::Exhaustion)
        } else {
            None
        }
    }

    /// Re-evaluate liveness. A dead animal stays dead.
    pub fn liveness_check(&mut self) -> bool {
        if !self.is_alive {
            return false;
        }
        if let Some(cause) = self.failing_vital() {
            self.kill(cause);
        }
        self.is_alive
    }

    /// Mark the animal dead. The first recorded cause wins.
    pub fn kill(&mut self, cause: CauseOfDeath) {
        self.is_alive = false;
        if self.cause_of_death.is_none() {
            self.cause_of_death = Some(cause);
        }
    }

    pub fn gain_hunger(&mut self, amount: i32) {
        self.hunger = (self.hunger + amount).min(self.max_hunger);
    }

    pub fn gain_thirst(&mut self, amount: i32) {
        self.thirst = (self.thirst + amount).min(self.max_thirst);
    }

    pub fn gain_energy(&mut self, amount: i32) {
        self.energy = (self.energy + amount).min(self.max_energy);
    }

    pub fn gain_virility(&mut self, amount: i32) {
        self.virility = (self.virility + amount).clamp(0, self.max_virility);
    }

    /// Metabolic cost of one step. Reserves bottom out at zero, which the
    /// next liveness check treats as fatal.
    pub fn spend_movement(&mut self) {
        self.energy = (self.energy - 1).max(0);
        self.hunger = (self.hunger - 1).max(0);
        self.thirst = (self.thirst - 1).max(0);
    }

    /// Stats creep up after a meal
    pub fn grow<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.strength += rng.gen_range(0..=1);
        self.speed += rng.gen_range(0..=1);
        self.size += rng.gen_range(0..=1);
        let energy = rng.gen_range(0..=1);
        self.gain_energy(energy);
        let virility = rng.gen_range(0..=1);
        self.gain_virility(virility);
    }

    pub fn has_mating_energy(&self) -> bool {
        self.energy as f64 >= self.max_energy as f64 * 0.8
    }

    pub fn food_tag(&self) -> FoodTag {
        FoodTag::Animal(self.species)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plant {
    pub id: EntityId,
    pub kind: PlantKind,
    pub position: Position,
    pub size: i32,
    pub age: u64,
    pub max_age: u64,
    pub nutrition: i32,
    pub birth_turn: u64,
    pub is_alive: bool,
}

impl Plant {
    pub fn new<R: Rng + ?Sized>(kind: PlantKind, position: Position, rng: &mut R) -> Self {
        let p = plant_profile(kind);
        Self {
            id: EntityId::from_rng(rng),
            kind,
            position,
            size: p.size,
            age: 0,
            max_age: p.max_age,
            nutrition: p.nutrition,
            birth_turn: 0,
            is_alive: true,
        }
    }

    pub fn profile(&self) -> &'static PlantProfile {
        plant_profile(self.kind)
    }

    pub fn is_too_old(&self) -> bool {
        self.age >= self.max_age
    }
}

/// Decaying remains of an animal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Corpse {
    pub id: EntityId,
    /// Id the animal had while alive
    pub former: EntityId,
    pub species: Species,
    pub position: Position,
    pub size: i32,
    pub nutrients: i32,
}

impl Corpse {
    pub fn from_animal(animal: &Animal, id: EntityId) -> Self {
        Self {
            id,
            former: animal.id,
            species: animal.species,
            position: animal.position,
            size: animal.size,
            nutrients: animal.size + animal.virility,
        }
    }

    /// One turn of decay. Returns true once nothing is left.
    pub fn decompose(&mut self) -> bool {
        self.size -= 1;
        self.nutrients = (self.nutrients - 1).max(0);
        self.size <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Water {
    pub size: i32,
}

impl Water {
    pub fn new(size: i32) -> Self {
        Self { size }
    }
}

/// Filler for cells with nothing else on them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dirt {
    pub size: i32,
    pub nutrients: i32,
}

impl Default for Dirt {
    fn default() -> Self {
        Self {
            size: 1,
            nutrients: 0,
        }
    }
}

/// Visual category used by renderers and asset providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualKind {
    Animal(Species),
    Plant(PlantKind),
    Corpse,
    Water,
    Dirt,
    Empty,
}

/// Content of one grid cell
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Occupant {
    Animal(Animal),
    Plant(Plant),
    Corpse(Corpse),
    Water(Water),
    Dirt(Dirt),
}

impl Occupant {
    pub fn id(&self) -> Option<EntityId> {
        match self {
            Occupant::Animal(a) => Some(a.id),
            Occupant::Plant(p) => Some(p.id),
            Occupant::Corpse(c) => Some(c.id),
            Occupant::Water(_) | Occupant::Dirt(_) => None,
        }
    }

    pub fn size(&self) -> i32 {
        match self {
            Occupant::Animal(a) => a.size,
            Occupant::Plant(p) => p.size,
            Occupant::Corpse(c) => c.size,
            Occupant::Water(w) => w.size,
            Occupant::Dirt(d) => d.size,
        }
    }

    /// Dirt is filler; it counts as free space for placement and capacity
    pub fn is_vacant(&self) -> bool {
        matches!(self, Occupant::Dirt(_))
    }

    pub fn is_animal(&self) -> bool {
        matches!(self, Occupant::Animal(_))
    }

    pub fn as_animal(&self) -> Option<&Animal> {
        match self {
            Occupant::Animal(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_animal_mut(&mut self) -> Option<&mut Animal> {
        match self {
            Occupant::Animal(a) => Some(a),
            _ => None,
        }
    }

    pub fn food_tag(&self) -> Option<FoodTag> {
        match self {
            Occupant::Animal(a) => Some(a.food_tag()),
            Occupant::Plant(p) => Some(FoodTag::Plant(p.kind)),
            Occupant::Corpse(_) => Some(FoodTag::Corpse),
            Occupant::Water(_) | Occupant::Dirt(_) => None,
        }
    }

    pub fn visual_kind(&self) -> VisualKind {
        match self {
            Occupant::Animal(a) => VisualKind::Animal(a.species),
            Occupant::Plant(p) => VisualKind::Plant(p.kind),
            Occupant::Corpse(_) => VisualKind::Corpse,
            Occupant::Water(_) => VisualKind::Water,
            Occupant::Dirt(_) => VisualKind::Dirt,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Occupant::Animal(a) => a.name(),
            Occupant::Plant(p) => p.kind.name(),
            Occupant::Corpse(_) => "Corpse",
            Occupant::Water(_) => "Water",
            Occupant::Dirt(_) => "Dirt",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(1)
    }

    #[test]
    fn test_animal_takes_species_stats() {
        let lion = Animal::new(Species::Lion, Position::new(0, 0), &mut rng());
        assert_eq!(lion.strength, 5);
        assert_eq!(lion.size, 5);
        assert_eq!(lion.hunger, DEFAULT_RESERVE);
        assert!(lion.is_alive);
    }

    #[test]
    fn test_liveness_is_monotonic() {
        let mut zebra = Animal::new(Species::Zebra, Position::new(0, 0), &mut rng());
        zebra.thirst = 0;
        assert!(!zebra.liveness_check());
        assert_eq!(zebra.cause_of_death, Some(CauseOfDeath::Dehydration));

        zebra.thirst = 50;
        assert!(!zebra.liveness_check());
        assert!(!zebra.is_alive);
    }

    #[test]
    fn test_old_age_reported_first() {
        let mut zebra = Animal::new(Species::Zebra, Position::new(0, 0), &mut rng());
        zebra.age = zebra.max_age + 1;
        zebra.hunger = 0;
        assert_eq!(zebra.failing_vital(), Some(CauseOfDeath::NaturalCauses));
    }

    #[test]
    fn test_virility_zero_is_not_fatal() {
        let mut zebra = Animal::new(Species::Zebra, Position::new(0, 0), &mut rng());
        zebra.virility = 0;
        assert!(zebra.liveness_check());
    }

    #[test]
    fn test_gains_are_capped() {
        let mut zebra = Animal::new(Species::Zebra, Position::new(0, 0), &mut rng());
        zebra.gain_hunger(500);
        zebra.gain_thirst(500);
        zebra.gain_energy(500);
        assert_eq!(zebra.hunger, zebra.max_hunger);
        assert_eq!(zebra.thirst, zebra.max_thirst);
        assert_eq!(zebra.energy, zebra.max_energy);
    }

    #[test]
    fn test_offspring_averages_parents() {
        let mut r = rng();
        let mut a = Animal::new(Species::Rhino, Position::new(0, 0), &mut r);
        let mut b = Animal::new(Species::Rhino, Position::new(0, 1), &mut r);
        a.strength = 8;
        b.strength = 5;
        a.size = 7;
        b.size = 9;
        a.virility = 40;
        b.virility = 20;

        let baby = Animal::offspring(&a, &b, Position::new(1, 1), 12, &mut r);
        assert_eq!(baby.strength, 6);
        assert_eq!(baby.size, 8);
        assert_eq!(baby.virility, 30);
        assert_eq!(baby.energy, 80);
        assert_eq!(baby.hunger, 50);
        assert_eq!(baby.birth_turn, 12);
        assert_eq!(baby.position, Position::new(1, 1));
    }

    #[test]
    fn test_corpse_nutrients_from_size_and_virility() {
        let mut r = rng();
        let mut hyena = Animal::new(Species::Hyena, Position::new(2, 2), &mut r);
        hyena.virility = 10;
        let mut corpse = Corpse::from_animal(&hyena, EntityId::from_rng(&mut r));
        assert_eq!(corpse.nutrients, 13);
        assert_eq!(corpse.size, 3);
        assert_eq!(corpse.former, hyena.id);

        assert!(!corpse.decompose());
        assert!(!corpse.decompose());
        assert!(corpse.decompose());
        assert_eq!(corpse.nutrients, 10);
    }

    #[test]
    fn test_dirt_is_vacant() {
        assert!(Occupant::Dirt(Dirt::default()).is_vacant());
        assert!(!Occupant::Water(Water::new(3)).is_vacant());
    }
}
