//! Animal actions and the per-animal turn.

use crate::behavior::{behavior_of, Behavior};
use crate::entity::{Animal, Occupant};
use crate::grid::Grid;
use crate::lifecycle::{PendingTile, TurnOutcome};
use crate::motive::{motivate, Motivation};
use crate::zoo::Zoo;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, warn};
use zoo_core::{CauseOfDeath, Direction, EntityId, FoodTag, Motive, Position};

/// Whether an animal of `mover_size` may step onto `target`.
///
/// Off-grid cells, other animals and anything strictly larger than the mover
/// block the step.
pub fn can_enter(grid: &Grid, mover_size: i32, target: Position) -> bool {
    if !grid.contains(target) {
        return false;
    }
    match grid.get(target) {
        None => true,
        Some(Occupant::Animal(_)) => false,
        Some(other) => other.size() <= mover_size,
    }
}

/// Neighborhood of a sleeping spot
#[derive(Debug, Default)]
struct SleepSurvey {
    unoccupied: usize,
    occupied: usize,
    animals: usize,
    safe_spots: Vec<Position>,
}

impl SleepSurvey {
    fn quality(&self) -> i32 {
        self.unoccupied as i32 + self.safe_spots.len() as i32
            - self.occupied as i32
            - self.animals as i32
    }
}

/// No animal other than `sleeper` in the 3x3 square around `pos`
fn is_safe_spot(grid: &Grid, pos: Position, sleeper: Position) -> bool {
    grid.neighbors(pos, 1)
        .into_iter()
        .chain(std::iter::once((pos, grid.get(pos))))
        .all(|(p, occupant)| p == sleeper || !occupant.map_or(false, Occupant::is_animal))
}

fn survey(grid: &Grid, pos: Position) -> SleepSurvey {
    let mut survey = SleepSurvey::default();
    for (p, occupant) in grid.neighbors(pos, 1) {
        match occupant {
            None | Some(Occupant::Dirt(_)) => {
                survey.unoccupied += 1;
                if is_safe_spot(grid, p, pos) {
                    survey.safe_spots.push(p);
                }
            }
            Some(Occupant::Animal(_)) => survey.animals += 1,
            Some(_) => survey.occupied += 1,
        }
    }
    survey
}

impl Zoo {
    /// Take one step. Returns the new position, or `None` if the step was
    /// refused, in which case nothing changed and nothing was spent.
    pub fn move_animal(&mut self, from: Position, direction: Direction) -> Option<Position> {
        let size = self.grid.animal(from)?.size;
        let target = from.step(direction);
        if !can_enter(&self.grid, size, target) {
            debug!(from = %from, to = %target, ?direction, "Move refused");
            return None;
        }

        let Some(Occupant::Animal(mut animal)) = self.grid.clear(from) else {
            return None;
        };
        animal.position = target;
        animal.spend_movement();

        match self.grid.set(target, Occupant::Animal(animal)) {
            Ok(Some(displaced)) => self.pending.push(PendingTile::new(target, displaced)),
            Ok(None) => {}
            Err(err) => warn!(error = %err, "Animal lost while moving"),
        }
        Some(target)
    }

    fn wander(&mut self, pos: Position) -> Position {
        let direction = Direction::random(&mut self.rng);
        self.move_animal(pos, direction).unwrap_or(pos)
    }

    /// One step towards `target` unless already next to it
    fn approach(&mut self, pos: Position, target: Position) -> Position {
        if pos == target || pos.is_adjacent(&target) {
            return pos;
        }
        match pos.direction_towards(&target) {
            Some(direction) => self.move_animal(pos, direction).unwrap_or(pos),
            None => pos,
        }
    }

    /// Drink from an adjacent puddle.
    ///
    /// A puddle with more than one unit left gives one unit of thirst and
    /// energy. The last sip empties the cell and costs one of each instead.
    pub fn drink(&mut self, pos: Position, water_pos: Position) -> bool {
        if !pos.is_adjacent(&water_pos) || self.grid.animal(pos).is_none() {
            return false;
        }
        let size = match self.grid.get(water_pos) {
            Some(Occupant::Water(water)) => water.size,
            _ => return false,
        };

        if size > 1 {
            if let Some(Occupant::Water(water)) = self.grid.get_mut(water_pos) {
                water.size -= 1;
            }
            if let Some(animal) = self.grid.animal_mut(pos) {
                animal.gain_thirst(1);
                animal.gain_energy(1);
            }
        } else {
            self.grid.clear(water_pos);
            if let Some(animal) = self.grid.animal_mut(pos) {
                animal.thirst = (animal.thirst - 1).max(0);
                animal.energy = (animal.energy - 1).max(0);
            }
            debug!(position = %water_pos, "Puddle drunk dry");
        }
        true
    }

    /// Eat the adjacent food at `food_pos`. Animals are fought first and only
    /// eaten once killed. Returns true if something was eaten.
    pub fn eat(&mut self, pos: Position, food_pos: Position) -> bool {
        if !pos.is_adjacent(&food_pos) {
            return false;
        }
        let Some(diet) = self.grid.animal(pos).map(Animal::profile) else {
            return false;
        };
        let Some(food) = self.grid.get(food_pos) else {
            return false;
        };
        let Some(tag) = food.food_tag() else {
            return false;
        };
        if !diet.can_eat(tag) {
            return false;
        }

        let value = match food {
            Occupant::Plant(plant) => plant.nutrition,
            Occupant::Corpse(corpse) => corpse.nutrients,
            Occupant::Animal(_) => return self.fight(pos, food_pos),
            Occupant::Water(_) | Occupant::Dirt(_) => return false,
        };

        self.grid.clear(food_pos);
        match tag {
            FoodTag::Plant(_) => self.tally.plants_eaten += 1,
            _ => self.tally.corpses_eaten += 1,
        }
        if let Some(animal) = self.grid.animal_mut(pos) {
            animal.gain_hunger(value);
            animal.grow(&mut self.rng);
            debug!(animal_id = %animal.id, species = animal.name(), ?tag, value, "Ate");
        }
        true
    }

    /// Attack roll against defense roll. The winner's margin comes off the
    /// defender's energy; a defender left without energy dies and, if the
    /// attacker can eat carrion, is eaten on the spot.
    fn fight(&mut self, attacker_pos: Position, defender_pos: Position) -> bool {
        let (Some(attacker), Some(defender)) = (
            self.grid.animal(attacker_pos).cloned(),
            self.grid.animal(defender_pos).cloned(),
        ) else {
            return false;
        };

        let attack = self.rng.gen_range(1..=20)
            + attacker.strength
            + i32::from(attacker.profile().is_favorite(defender.food_tag()));
        let defense = self.rng.gen_range(1..=20)
            + defender.speed
            + i32::from(defender.profile().is_favorite(attacker.food_tag()));

        if attack <= defense {
            debug!(
                attacker = attacker.name(),
                defender = defender.name(),
                attack,
                defense,
                "Attack fended off"
            );
            return false;
        }

        let margin = attack - defense;
        let energy_left = match self.grid.animal_mut(defender_pos) {
            Some(target) => {
                target.energy -= margin;
                target.energy
            }
            None => return false,
        };
        debug!(
            attacker = attacker.name(),
            defender = defender.name(),
            margin,
            energy_left,
            "Attack landed"
        );
        if energy_left > 0 {
            return false;
        }

        if let Some(ended) = self.end_life(defender_pos, CauseOfDeath::Predation) {
            self.casualties.push(ended);
        }
        if attacker.profile().can_eat(FoodTag::Corpse)
            && matches!(self.grid.get(defender_pos), Some(Occupant::Corpse(_)))
        {
            return self.eat(attacker_pos, defender_pos);
        }
        false
    }

    /// Rest, first stepping onto a safe spot if the current one isn't.
    ///
    /// Sleep quality counts free neighbors and safe spots against occupied
    /// neighbors and nearby animals. A fresh sleep sets the counter that keeps
    /// the animal asleep on later turns.
    pub fn sleep(&mut self, pos: Position, continuing: bool) -> Position {
        let mut pos = pos;
        if !continuing {
            let here = survey(&self.grid, pos);
            if here.animals > 0 {
                if let Some(spot) = here.safe_spots.first().copied() {
                    if let Some(direction) = pos.direction_towards(&spot) {
                        pos = self.move_animal(pos, direction).unwrap_or(pos);
                    }
                }
            }
        }

        let quality = survey(&self.grid, pos).quality();
        if let Some(animal) = self.grid.animal_mut(pos) {
            animal.gain_energy(quality.max(0));
            if !continuing {
                animal.sleep_counter = (quality / 2).max(0);
            }
        }
        pos
    }

    /// Breed with an adjacent partner. The baby lands on a random free cell
    /// next to the parent; returns its id.
    pub fn mate(&mut self, pos: Position) -> Option<EntityId> {
        if self.check_full() {
            return None;
        }
        let parent = self.grid.animal(pos)?.clone();
        if parent.motive != Motive::Mate || parent.virility <= 0 || !parent.has_mating_energy() {
            return None;
        }

        let partner = self
            .grid
            .neighbors(pos, 1)
            .into_iter()
            .filter_map(|(_, occupant)| occupant.and_then(Occupant::as_animal))
            .find(|other| {
                other.species == parent.species
                    && other.gender != parent.gender
                    && other.motive == Motive::Mate
            })?
            .clone();
        if partner.virility <= 0 || !partner.has_mating_energy() {
            return None;
        }

        let spots = self.grid.free_cells_around(pos, 1);
        let spot = *spots.choose(&mut self.rng)?;
        let baby = Animal::offspring(&parent, &partner, spot, self.elapsed_turns, &mut self.rng);
        let baby_id = baby.id;

        if self.grid.set(spot, Occupant::Animal(baby)).is_err() {
            return None;
        }
        for parent_pos in [pos, partner.position] {
            if let Some(animal) = self.grid.animal_mut(parent_pos) {
                animal.gain_virility(-1);
            }
        }

        self.acted.insert(baby_id);
        self.tally.animal_births += 1;
        self.save_at(spot);
        info!(
            event = "animal_born",
            baby_id = %baby_id,
            species = parent.name(),
            position = %spot,
            turn = self.elapsed_turns,
            "Animal born"
        );
        Some(baby_id)
    }

    /// Every in-sight cell is a puddle deeper than the animal is big
    fn is_drowning(&self, pos: Position) -> bool {
        let Some(animal) = self.grid.animal(pos) else {
            return false;
        };
        let around = self.grid.neighbors(pos, animal.sensing_radius());
        !around.is_empty()
            && around
                .iter()
                .all(|(_, occupant)| matches!(occupant, Some(Occupant::Water(w)) if w.size > animal.size))
    }

    fn seek_water(&mut self, pos: Position) {
        let Some(animal) = self.grid.animal(pos) else {
            return;
        };
        let water = self
            .grid
            .neighbors(pos, animal.sensing_radius())
            .into_iter()
            .filter_map(|(p, occupant)| match occupant {
                Some(Occupant::Water(w)) => Some(((pos.chebyshev_distance(&p), w.size), p)),
                _ => None,
            })
            .min_by_key(|(key, _)| *key)
            .map(|(_, p)| p);

        match water {
            Some(water_pos) => {
                let pos = self.approach(pos, water_pos);
                self.drink(pos, water_pos);
            }
            None => {
                self.wander(pos);
            }
        }
    }

    fn seek_food(&mut self, pos: Position, behavior: &dyn Behavior) {
        let Some(animal) = self.grid.animal(pos) else {
            return;
        };
        match behavior.find_food(&self.grid, animal) {
            Some(food_pos) => {
                let pos = self.approach(pos, food_pos);
                self.eat(pos, food_pos);
            }
            None => {
                self.wander(pos);
            }
        }
    }

    /// Run one animal's turn
    pub(crate) fn animal_turn(&mut self, pos: Position) -> TurnOutcome {
        let Some(animal) = self.grid.animal(pos) else {
            return TurnOutcome::Continued;
        };
        self.acted.insert(animal.id);
        let behavior = behavior_of(animal);
        let mut pos = pos;

        let basal = self.config.metabolism.basal_cost;
        if basal > 0 {
            if let Some(animal) = self.grid.animal_mut(pos) {
                animal.hunger = (animal.hunger - basal).max(0);
                animal.thirst = (animal.thirst - basal).max(0);
            }
        }

        let evasion = self
            .grid
            .animal(pos)
            .and_then(|animal| behavior.evade(&self.grid, animal));
        if let Some(direction) = evasion {
            pos = self.move_animal(pos, direction).unwrap_or(pos);
        }

        if self.is_drowning(pos) {
            return self.die(pos, CauseOfDeath::Drowning);
        }

        let turn = self.elapsed_turns;
        let decision = match self.grid.animal_mut(pos) {
            Some(animal) => motivate(animal, turn, &mut self.rng),
            None => return TurnOutcome::Continued,
        };
        let motivation = match decision {
            Ok(motivation) => motivation,
            Err(cause) => return self.die(pos, cause),
        };

        match motivation.motive() {
            Motive::Drink => self.seek_water(pos),
            Motive::Eat => self.seek_food(pos, behavior),
            Motive::Sleep => {
                self.sleep(pos, motivation == Motivation::StillAsleep);
            }
            Motive::Mate => {
                if self.check_full() {
                    return TurnOutcome::Continued;
                }
                if let Some(baby) = self.mate(pos) {
                    return TurnOutcome::Reproduced(baby);
                }
                self.wander(pos);
            }
        }
        TurnOutcome::Continued
    }

    fn die(&mut self, pos: Position, cause: CauseOfDeath) -> TurnOutcome {
        match self.end_life(pos, cause) {
            Some(ended) => TurnOutcome::Died(ended),
            None => TurnOutcome::Continued,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Corpse, Plant, Water};
    use zoo_core::{Gender, PlantKind, Species};

    fn add(zoo: &mut Zoo, species: Species, pos: Position) {
        let animal = Animal::new(species, pos, &mut zoo.rng);
        zoo.place(pos, Occupant::Animal(animal));
    }

    fn animal(zoo: &Zoo, pos: Position) -> &Animal {
        zoo.grid.animal(pos).expect("animal at position")
    }

    #[test]
    fn test_drink_from_puddle() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        let water_pos = Position::new(1, 2);
        add(&mut zoo, Species::Zebra, pos);
        zoo.grid.animal_mut(pos).unwrap().thirst = 1;
        zoo.place(water_pos, Occupant::Water(Water::new(5)));

        assert!(zoo.drink(pos, water_pos));
        assert_eq!(animal(&zoo, pos).thirst, 2);
        assert!(matches!(zoo.grid.get(water_pos), Some(Occupant::Water(w)) if w.size == 4));
    }

    #[test]
    fn test_last_sip_empties_puddle() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        let water_pos = Position::new(0, 0);
        add(&mut zoo, Species::Zebra, pos);
        zoo.grid.animal_mut(pos).unwrap().thirst = 10;
        zoo.place(water_pos, Occupant::Water(Water::new(1)));

        assert!(zoo.drink(pos, water_pos));
        assert_eq!(animal(&zoo, pos).thirst, 9);
        assert!(zoo.grid.get(water_pos).is_none());
    }

    #[test]
    fn test_eat_grass() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        let grass_pos = Position::new(2, 1);
        add(&mut zoo, Species::Zebra, pos);
        zoo.grid.animal_mut(pos).unwrap().hunger = 1;
        let grass = Plant::new(PlantKind::Grass, grass_pos, &mut zoo.rng);
        zoo.place(grass_pos, Occupant::Plant(grass));

        assert!(zoo.eat(pos, grass_pos));
        assert_eq!(animal(&zoo, pos).hunger, 2);
        assert!(zoo.grid.get(grass_pos).is_none());
        assert_eq!(zoo.tally.plants_eaten, 1);
    }

    #[test]
    fn test_inedible_food_is_left_alone() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        let grass_pos = Position::new(0, 1);
        add(&mut zoo, Species::Lion, pos);
        let grass = Plant::new(PlantKind::Grass, grass_pos, &mut zoo.rng);
        zoo.place(grass_pos, Occupant::Plant(grass));

        assert!(!zoo.eat(pos, grass_pos));
        assert!(zoo.grid.get(grass_pos).is_some());
    }

    #[test]
    fn test_move_blocked_by_larger_animal() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let small = Position::new(1, 1);
        let big = Position::new(1, 2);
        add(&mut zoo, Species::Baboon, small);
        add(&mut zoo, Species::Lion, big);
        zoo.grid.animal_mut(small).unwrap().size = 1;
        let before = animal(&zoo, small).clone();

        assert_eq!(zoo.move_animal(small, Direction::East), None);
        let after = animal(&zoo, small);
        assert_eq!(after.position, small);
        assert_eq!(after.energy, before.energy);
        assert_eq!(after.hunger, before.hunger);
        assert_eq!(after.thirst, before.thirst);
    }

    #[test]
    fn test_move_off_grid_refused() {
        let mut zoo = Zoo::empty(2, 2, 1);
        let pos = Position::new(0, 0);
        add(&mut zoo, Species::Zebra, pos);
        assert_eq!(zoo.move_animal(pos, Direction::North), None);
        assert_eq!(zoo.move_animal(pos, Direction::West), None);
        assert!(zoo.grid.animal(pos).is_some());
    }

    #[test]
    fn test_move_onto_grass_queues_it() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        let grass_pos = Position::new(1, 2);
        add(&mut zoo, Species::Zebra, pos);
        let grass = Plant::new(PlantKind::Grass, grass_pos, &mut zoo.rng);
        let grass_id = grass.id;
        zoo.place(grass_pos, Occupant::Plant(grass));

        assert_eq!(zoo.move_animal(pos, Direction::East), Some(grass_pos));
        assert!(zoo.grid.get(pos).is_none());
        assert_eq!(animal(&zoo, grass_pos).energy, 49);
        assert_eq!(zoo.pending.len(), 1);
        assert_eq!(zoo.pending[0].occupant.id(), Some(grass_id));

        assert_eq!(zoo.move_animal(grass_pos, Direction::West), Some(pos));
        zoo.reconcile_pending();
        assert_eq!(zoo.grid.get(grass_pos).and_then(Occupant::id), Some(grass_id));
        assert!(zoo.pending.is_empty());
    }

    #[test]
    fn test_move_refused_by_big_puddle() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        add(&mut zoo, Species::Zebra, pos);
        zoo.place(Position::new(0, 1), Occupant::Water(Water::new(20)));
        assert_eq!(zoo.move_animal(pos, Direction::North), None);
    }

    fn mating_pair(zoo: &mut Zoo, a: Position, b: Position) {
        add(zoo, Species::Zebra, a);
        add(zoo, Species::Zebra, b);
        for (pos, gender) in [(a, Gender::Male), (b, Gender::Female)] {
            let animal = zoo.grid.animal_mut(pos).unwrap();
            animal.gender = gender;
            animal.energy = 90;
            animal.motive = Motive::Mate;
        }
    }

    #[test]
    fn test_mate_spawns_baby() {
        let mut zoo = Zoo::empty(3, 3, 1);
        mating_pair(&mut zoo, Position::new(1, 1), Position::new(1, 2));

        let baby = zoo.mate(Position::new(1, 1)).expect("baby born");
        assert_eq!(zoo.grid.count_animals(), 3);
        assert!(zoo.acted.contains(&baby));
        assert_eq!(zoo.tally.animal_births, 1);
        assert_eq!(animal(&zoo, Position::new(1, 1)).virility, 49);
        assert_eq!(animal(&zoo, Position::new(1, 2)).virility, 49);
    }

    #[test]
    fn test_mate_needs_energy() {
        let mut zoo = Zoo::empty(3, 3, 1);
        mating_pair(&mut zoo, Position::new(1, 1), Position::new(1, 2));
        zoo.grid.animal_mut(Position::new(1, 2)).unwrap().energy = 79;

        assert!(zoo.mate(Position::new(1, 1)).is_none());
        assert_eq!(zoo.grid.count_animals(), 2);
    }

    #[test]
    fn test_mate_needs_same_species_opposite_gender() {
        let mut zoo = Zoo::empty(3, 3, 1);
        mating_pair(&mut zoo, Position::new(1, 1), Position::new(1, 2));
        zoo.grid.animal_mut(Position::new(1, 2)).unwrap().gender = Gender::Male;
        assert!(zoo.mate(Position::new(1, 1)).is_none());

        zoo.grid.animal_mut(Position::new(1, 2)).unwrap().gender = Gender::Female;
        zoo.grid.animal_mut(Position::new(1, 2)).unwrap().motive = Motive::Eat;
        assert!(zoo.mate(Position::new(1, 1)).is_none());
    }

    #[test]
    fn test_full_grid_blocks_mating() {
        let mut zoo = Zoo::empty(2, 2, 1);
        for pos in zoo.grid.positions() {
            let grass = Plant::new(PlantKind::Grass, pos, &mut zoo.rng);
            zoo.place(pos, Occupant::Plant(grass));
        }
        let pos = Position::new(0, 0);
        zoo.grid.clear(pos);
        add(&mut zoo, Species::Baboon, pos);
        zoo.grid.animal_mut(pos).unwrap().size = 2;
        assert!(zoo.check_full());

        let partner_pos = Position::new(0, 1);
        zoo.grid.clear(partner_pos);
        add(&mut zoo, Species::Baboon, partner_pos);
        for (p, gender) in [(pos, Gender::Male), (partner_pos, Gender::Female)] {
            let a = zoo.grid.animal_mut(p).unwrap();
            a.gender = gender;
            a.energy = 100;
            a.motive = Motive::Mate;
        }

        assert!(zoo.mate(pos).is_none());
        assert_eq!(zoo.grid.count_animals(), 2);
    }

    #[test]
    fn test_sleep_in_open_space() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        add(&mut zoo, Species::Rhino, pos);

        zoo.sleep(pos, false);
        let rhino = animal(&zoo, pos);
        // 8 free neighbors, all safe
        assert_eq!(rhino.energy, 66);
        assert_eq!(rhino.sleep_counter, 8);
    }

    #[test]
    fn test_crowded_sleep_gains_nothing() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        add(&mut zoo, Species::Rhino, pos);
        for p in zoo.grid.positions() {
            if p != pos {
                zoo.place(p, Occupant::Water(Water::new(1)));
            }
        }

        zoo.sleep(pos, false);
        let rhino = animal(&zoo, pos);
        assert_eq!(rhino.energy, 50);
        assert_eq!(rhino.sleep_counter, 0);
    }

    #[test]
    fn test_continued_sleep_keeps_counter() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        add(&mut zoo, Species::Rhino, pos);
        zoo.grid.animal_mut(pos).unwrap().sleep_counter = 3;

        zoo.sleep(pos, true);
        assert_eq!(animal(&zoo, pos).sleep_counter, 3);
    }

    #[test]
    fn test_lethal_attack_leaves_corpse_or_meal() {
        let mut zoo = Zoo::empty(1, 2, 1);
        let lion_pos = Position::new(0, 0);
        let zebra_pos = Position::new(0, 1);
        add(&mut zoo, Species::Lion, lion_pos);
        add(&mut zoo, Species::Zebra, zebra_pos);
        {
            let lion = zoo.grid.animal_mut(lion_pos).unwrap();
            lion.strength = 100;
        }
        zoo.grid.animal_mut(zebra_pos).unwrap().energy = 1;

        assert!(zoo.eat(lion_pos, zebra_pos));
        assert!(zoo.grid.get(zebra_pos).is_none());
        assert_eq!(zoo.tally.deaths[&CauseOfDeath::Predation], 1);
        assert_eq!(zoo.tally.corpses_eaten, 1);
        assert_eq!(zoo.casualties.len(), 1);
        assert_eq!(zoo.casualties[0].cause, CauseOfDeath::Predation);
    }

    #[test]
    fn test_hyena_eats_corpse() {
        let mut zoo = Zoo::empty(1, 2, 1);
        let pos = Position::new(0, 0);
        let corpse_pos = Position::new(0, 1);
        add(&mut zoo, Species::Hyena, pos);
        zoo.grid.animal_mut(pos).unwrap().hunger = 10;
        let dead = Animal::new(Species::Zebra, corpse_pos, &mut zoo.rng);
        let corpse = Corpse::from_animal(&dead, EntityId::from_rng(&mut zoo.rng));
        let nutrients = corpse.nutrients;
        zoo.place(corpse_pos, Occupant::Corpse(corpse));

        assert!(zoo.eat(pos, corpse_pos));
        assert_eq!(animal(&zoo, pos).hunger, 10 + nutrients);
    }

    #[test]
    fn test_drowning_in_deep_water() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        add(&mut zoo, Species::Hyena, pos);
        zoo.grid.animal_mut(pos).unwrap().speed = 1;
        for p in zoo.grid.positions() {
            if p != pos {
                zoo.place(p, Occupant::Water(Water::new(10)));
            }
        }

        match zoo.animal_turn(pos) {
            TurnOutcome::Died(ended) => assert_eq!(ended.cause, CauseOfDeath::Drowning),
            other => panic!("expected drowning, got {other:?}"),
        }
    }

    #[test]
    fn test_starving_animal_dies_on_its_turn() {
        let mut zoo = Zoo::empty(3, 3, 1);
        let pos = Position::new(1, 1);
        add(&mut zoo, Species::Elephant, pos);
        zoo.grid.animal_mut(pos).unwrap().hunger = 0;

        match zoo.animal_turn(pos) {
            TurnOutcome::Died(ended) => {
                assert_eq!(ended.cause, CauseOfDeath::Starvation);
                assert_eq!(ended.position, pos);
            }
            other => panic!("expected death, got {other:?}"),
        }
        assert!(matches!(zoo.grid.get(pos), Some(Occupant::Corpse(_))));
        assert_eq!(zoo.grid.count_animals(), 0);
    }
}
