//! Role strategies.
//!
//! Each role answers two questions for its animals: is there a threat to get
//! away from before acting, and where is the next meal. Everything else in the
//! turn is shared.

use crate::actions::can_enter;
use crate::entity::{Animal, Occupant};
use crate::grid::Grid;
use crate::species::{profile, Role};
use zoo_core::{Direction, FoodTag, Position};

pub trait Behavior: Send + Sync {
    /// Step to take away from danger before the motive is chosen
    fn evade(&self, _grid: &Grid, _animal: &Animal) -> Option<Direction> {
        None
    }

    /// Position of the food this animal goes after, if any is in sight
    fn find_food(&self, grid: &Grid, animal: &Animal) -> Option<Position>;
}

/// Plain food search: passive food (plants, corpses) the species can digest.
/// Favorite food first, then the nearest, then the smallest.
pub struct Forager;

/// Hunts animals of any non-predator species it can eat, falling back to
/// corpses.
pub struct Hunter;

/// Forages like a [`Forager`] but flees predators first.
pub struct Grazer;

/// Looks only for corpses.
pub struct Scavenger;

static FORAGER: Forager = Forager;
static HUNTER: Hunter = Hunter;
static GRAZER: Grazer = Grazer;
static SCAVENGER: Scavenger = Scavenger;

pub fn behavior_for(role: Role) -> &'static dyn Behavior {
    match role {
        Role::Forager => &FORAGER,
        Role::Predator => &HUNTER,
        Role::Prey => &GRAZER,
        Role::Scavenger => &SCAVENGER,
    }
}

fn is_predator(occupant: &Occupant) -> bool {
    occupant
        .as_animal()
        .map_or(false, |a| a.profile().role == Role::Predator)
}

/// Passive food in sight, ranked by (not favorite, distance, size)
fn nearest_passive_food(grid: &Grid, animal: &Animal) -> Option<Position> {
    let diet = animal.profile();
    grid.neighbors(animal.position, animal.sensing_radius())
        .into_iter()
        .filter_map(|(pos, occupant)| {
            let occupant = occupant?;
            let tag = occupant.food_tag()?;
            if tag.is_animal() || !diet.can_eat(tag) {
                return None;
            }
            Some((
                (
                    !diet.is_favorite(tag),
                    animal.position.chebyshev_distance(&pos),
                    occupant.size(),
                ),
                pos,
            ))
        })
        .min_by_key(|(key, _)| *key)
        .map(|(_, pos)| pos)
}

impl Behavior for Forager {
    fn find_food(&self, grid: &Grid, animal: &Animal) -> Option<Position> {
        nearest_passive_food(grid, animal)
    }
}

impl Behavior for Hunter {
    fn find_food(&self, grid: &Grid, animal: &Animal) -> Option<Position> {
        let diet = animal.profile();
        let prey = grid
            .neighbors(animal.position, animal.sensing_radius())
            .into_iter()
            .filter_map(|(pos, occupant)| {
                let target = occupant?.as_animal()?;
                let tag = FoodTag::Animal(target.species);
                if target.profile().role == Role::Predator || !diet.can_eat(tag) {
                    return None;
                }
                Some((
                    (
                        !diet.is_favorite(tag),
                        animal.position.chebyshev_distance(&pos),
                    ),
                    pos,
                ))
            })
            .min_by_key(|(key, _)| *key)
            .map(|(_, pos)| pos);

        prey.or_else(|| nearest_passive_food(grid, animal))
    }
}

impl Behavior for Grazer {
    fn evade(&self, grid: &Grid, animal: &Animal) -> Option<Direction> {
        let here = animal.position;
        let threat = grid
            .neighbors(here, animal.sensing_radius())
            .into_iter()
            .filter(|(_, occupant)| occupant.map_or(false, is_predator))
            .map(|(pos, _)| pos)
            .min_by_key(|pos| here.chebyshev_distance(pos))?;

        let current = here.chebyshev_distance(&threat);
        grid.adjacent(here)
            .into_iter()
            .filter(|(_, target, _)| can_enter(grid, animal.size, *target))
            .map(|(direction, target, _)| (target.chebyshev_distance(&threat), direction))
            .filter(|(distance, _)| *distance > current)
            .max_by_key(|(distance, _)| *distance)
            .map(|(_, direction)| direction)
    }

    fn find_food(&self, grid: &Grid, animal: &Animal) -> Option<Position> {
        nearest_passive_food(grid, animal)
    }
}

impl Behavior for Scavenger {
    fn find_food(&self, grid: &Grid, animal: &Animal) -> Option<Position> {
        grid.neighbors(animal.position, animal.sensing_radius())
            .into_iter()
            .filter(|(_, occupant)| matches!(occupant, Some(Occupant::Corpse(_))))
            .map(|(pos, _)| pos)
            .min_by_key(|pos| animal.position.chebyshev_distance(pos))
    }
}

/// Strategy for an animal's species
pub fn behavior_of(animal: &Animal) -> &'static dyn Behavior {
    behavior_for(profile(animal.species).role)
}
