//! Species stat tables and diet compatibility.
//!
//! Every behavioral difference between animals comes from the profile looked
//! up here: the role picks the strategy in [`crate::behavior`], the edible set
//! decides what the food search and `eat` accept.

use zoo_core::{FoodTag, PlantKind, Species};

/// What class of food a species can digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diet {
    Carnivore,
    Herbivore,
    Omnivore,
}

impl Diet {
    pub fn permits(&self, tag: FoodTag) -> bool {
        match self {
            Diet::Carnivore => matches!(tag, FoodTag::Animal(_) | FoodTag::Corpse),
            Diet::Herbivore => matches!(tag, FoodTag::Plant(_)),
            Diet::Omnivore => true,
        }
    }
}

/// Behavioral role layered on top of the diet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Plain needs-driven animal
    Forager,
    /// Hunts non-predators instead of searching for food
    Predator,
    /// Runs from predators before acting
    Prey,
    /// Searches for corpses
    Scavenger,
}

#[derive(Debug)]
pub struct SpeciesProfile {
    pub species: Species,
    pub diet: Diet,
    pub role: Role,
    pub strength: i32,
    pub speed: i32,
    pub size: i32,
    pub max_age: u64,
    pub favorite_food: FoodTag,
    pub edible: &'static [FoodTag],
    pub glyph: &'static str,
}

impl SpeciesProfile {
    /// The diet class bounds what the edible set may offer
    pub fn can_eat(&self, tag: FoodTag) -> bool {
        self.diet.permits(tag) && self.edible.contains(&tag)
    }

    pub fn is_favorite(&self, tag: FoodTag) -> bool {
        self.favorite_food == tag
    }
}

const YEAR: u64 = 365;

static PROFILES: [SpeciesProfile; 7] = [
    SpeciesProfile {
        species: Species::Lion,
        diet: Diet::Carnivore,
        role: Role::Predator,
        strength: 5,
        speed: 1,
        size: 5,
        max_age: 10 * YEAR,
        favorite_food: FoodTag::Animal(Species::Zebra),
        edible: &[
            FoodTag::Animal(Species::Zebra),
            FoodTag::Animal(Species::Giraffe),
            FoodTag::Animal(Species::Baboon),
            FoodTag::Animal(Species::Hyena),
            FoodTag::Animal(Species::Rhino),
            FoodTag::Animal(Species::Elephant),
            FoodTag::Corpse,
        ],
        glyph: "🦁",
    },
    SpeciesProfile {
        species: Species::Zebra,
        diet: Diet::Herbivore,
        role: Role::Prey,
        strength: 1,
        speed: 5,
        size: 3,
        max_age: 10 * YEAR,
        favorite_food: FoodTag::Plant(PlantKind::Grass),
        edible: &[
            FoodTag::Plant(PlantKind::Grass),
            FoodTag::Plant(PlantKind::Bush),
        ],
        glyph: "🦓",
    },
    SpeciesProfile {
        species: Species::Elephant,
        diet: Diet::Herbivore,
        role: Role::Forager,
        strength: 10,
        speed: 1,
        size: 10,
        max_age: 30 * YEAR,
        favorite_food: FoodTag::Plant(PlantKind::Tree),
        edible: &[
            FoodTag::Plant(PlantKind::Tree),
            FoodTag::Plant(PlantKind::Bush),
            FoodTag::Plant(PlantKind::Grass),
        ],
        glyph: "🐘",
    },
    SpeciesProfile {
        species: Species::Hyena,
        diet: Diet::Carnivore,
        role: Role::Scavenger,
        strength: 3,
        speed: 1,
        size: 3,
        max_age: 10 * YEAR,
        favorite_food: FoodTag::Corpse,
        edible: &[FoodTag::Corpse],
        glyph: "🦡",
    },
    SpeciesProfile {
        species: Species::Giraffe,
        diet: Diet::Herbivore,
        role: Role::Prey,
        strength: 1,
        speed: 3,
        size: 5,
        max_age: 10 * YEAR,
        favorite_food: FoodTag::Plant(PlantKind::Tree),
        edible: &[
            FoodTag::Plant(PlantKind::Tree),
            FoodTag::Plant(PlantKind::Bush),
        ],
        glyph: "🦒",
    },
    SpeciesProfile {
        species: Species::Rhino,
        diet: Diet::Herbivore,
        role: Role::Forager,
        strength: 7,
        speed: 1,
        size: 7,
        max_age: 10 * YEAR,
        favorite_food: FoodTag::Plant(PlantKind::Bush),
        edible: &[
            FoodTag::Plant(PlantKind::Bush),
            FoodTag::Plant(PlantKind::Grass),
        ],
        glyph: "🦏",
    },
    SpeciesProfile {
        species: Species::Baboon,
        diet: Diet::Omnivore,
        role: Role::Forager,
        strength: 2,
        speed: 2,
        size: 2,
        max_age: 10 * YEAR,
        favorite_food: FoodTag::Plant(PlantKind::Bush),
        edible: &[
            FoodTag::Plant(PlantKind::Bush),
            FoodTag::Plant(PlantKind::Grass),
            FoodTag::Corpse,
        ],
        glyph: "🐒",
    },
];

pub fn profile(species: Species) -> &'static SpeciesProfile {
    match species {
        Species::Lion => &PROFILES[0],
        Species::Zebra => &PROFILES[1],
        Species::Elephant => &PROFILES[2],
        Species::Hyena => &PROFILES[3],
        Species::Giraffe => &PROFILES[4],
        Species::Rhino => &PROFILES[5],
        Species::Baboon => &PROFILES[6],
    }
}

/// Fixed traits of every plant kind
#[derive(Debug)]
pub struct PlantProfile {
    pub kind: PlantKind,
    pub size: i32,
    pub nutrition: i32,
    pub max_age: u64,
    pub glyph: &'static str,
}

static PLANTS: [PlantProfile; 3] = [
    PlantProfile {
        kind: PlantKind::Grass,
        size: 1,
        nutrition: 1,
        max_age: 15 * YEAR,
        glyph: "🌾",
    },
    PlantProfile {
        kind: PlantKind::Bush,
        size: 1,
        nutrition: 1,
        max_age: 15 * YEAR,
        glyph: "🌿",
    },
    PlantProfile {
        kind: PlantKind::Tree,
        size: 1,
        nutrition: 1,
        max_age: 15 * YEAR,
        glyph: "🌳",
    },
];

pub fn plant_profile(kind: PlantKind) -> &'static PlantProfile {
    match kind {
        PlantKind::Grass => &PLANTS[0],
        PlantKind::Bush => &PLANTS[1],
        PlantKind::Tree => &PLANTS[2],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_match_their_species() {
        for species in Species::all() {
            assert_eq!(profile(species).species, species);
        }
        for kind in [PlantKind::Grass, PlantKind::Bush, PlantKind::Tree] {
            assert_eq!(plant_profile(kind).kind, kind);
        }
    }

    #[test]
    fn test_edible_sets_respect_diet() {
        for species in Species::all() {
            let p = profile(species);
            assert!(p.can_eat(p.favorite_food), "{species} cannot eat its favorite");
            for tag in p.edible {
                assert!(p.diet.permits(*tag), "{species} diet forbids {tag:?}");
            }
        }
    }

    #[test]
    fn test_predators_never_eat_predators() {
        for species in Species::all() {
            let p = profile(species);
            if p.role != Role::Predator {
                continue;
            }
            for tag in p.edible {
                if let FoodTag::Animal(target) = tag {
                    assert_ne!(profile(*target).role, Role::Predator);
                }
            }
        }
    }

    #[test]
    fn test_scavengers_eat_corpses() {
        let hyena = profile(Species::Hyena);
        assert_eq!(hyena.role, Role::Scavenger);
        assert_eq!(hyena.edible, &[FoodTag::Corpse]);
    }

    #[test]
    fn test_diet_gates_edible_set() {
        static MISLISTED: SpeciesProfile = SpeciesProfile {
            species: Species::Zebra,
            diet: Diet::Herbivore,
            role: Role::Prey,
            strength: 1,
            speed: 1,
            size: 1,
            max_age: 1,
            favorite_food: FoodTag::Plant(PlantKind::Grass),
            edible: &[FoodTag::Plant(PlantKind::Grass), FoodTag::Corpse],
            glyph: "🦓",
        };
        assert!(MISLISTED.can_eat(FoodTag::Plant(PlantKind::Grass)));
        assert!(!MISLISTED.can_eat(FoodTag::Corpse));
    }

    #[test]
    fn test_omnivore_permits_everything() {
        assert!(Diet::Omnivore.permits(FoodTag::Corpse));
        assert!(Diet::Omnivore.permits(FoodTag::Plant(PlantKind::Tree)));
        assert!(!Diet::Herbivore.permits(FoodTag::Corpse));
        assert!(!Diet::Carnivore.permits(FoodTag::Plant(PlantKind::Grass)));
    }
}
