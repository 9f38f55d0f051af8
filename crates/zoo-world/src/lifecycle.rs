//! Births, deaths, decay and the refresh queue.

use crate::entity::{Corpse, Occupant, Plant};
use crate::zoo::Zoo;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zoo_core::{CauseOfDeath, EntityId, Position};

/// An organism's life ended during its own turn or someone else's
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeEnded {
    pub id: EntityId,
    pub name: String,
    pub cause: CauseOfDeath,
    pub position: Position,
    pub turn: u64,
}

/// What happened to an entity on its turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    Continued,
    Died(LifeEnded),
    /// The entity produced offspring with this id
    Reproduced(EntityId),
    /// A corpse finished decaying and left the grid
    Decomposed,
}

/// Tile content an animal is standing on, waiting to be put back
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTile {
    pub position: Position,
    pub occupant: Occupant,
}

impl PendingTile {
    pub fn new(position: Position, occupant: Occupant) -> Self {
        Self { position, occupant }
    }
}

impl Zoo {
    /// Kill the animal at `pos` and leave its corpse behind.
    ///
    /// Returns `None` if there is no animal at `pos`.
    pub fn end_life(&mut self, pos: Position, cause: CauseOfDeath) -> Option<LifeEnded> {
        self.grid.animal(pos)?;
        let Some(Occupant::Animal(mut animal)) = self.grid.clear(pos) else {
            return None;
        };
        animal.kill(cause);
        let cause = animal.cause_of_death.unwrap_or(cause);

        self.tally.record_death(cause);
        self.save_snapshot(pos, &Occupant::Animal(animal.clone()));
        info!(
            event = "animal_died",
            animal_id = %animal.id,
            species = animal.name(),
            %cause,
            position = %pos,
            age = animal.age,
            turn = self.elapsed_turns,
            "{} died of {}",
            animal.name(),
            cause
        );

        let corpse = Corpse::from_animal(&animal, EntityId::from_rng(&mut self.rng));
        self.place_corpse(corpse);

        Some(LifeEnded {
            id: animal.id,
            name: animal.name().to_string(),
            cause,
            position: pos,
            turn: self.elapsed_turns,
        })
    }

    /// Put a corpse on its cell if the cell is vacant. A corpse whose cell
    /// was taken in the meantime is dropped and its nutrients are lost.
    pub fn place_corpse(&mut self, corpse: Corpse) -> bool {
        let pos = corpse.position;
        if !self.grid.is_free(pos) {
            debug!(
                position = %pos,
                species = %corpse.species,
                "Corpse dropped, cell already taken"
            );
            self.tally.corpses_dropped += 1;
            return false;
        }

        let id = corpse.id;
        if self.grid.set(pos, Occupant::Corpse(corpse)).is_err() {
            self.tally.corpses_dropped += 1;
            return false;
        }
        self.acted.insert(id);
        self.tally.corpses_placed += 1;
        true
    }

    /// One turn of decay
    pub(crate) fn corpse_turn(&mut self, pos: Position) -> TurnOutcome {
        let (id, gone) = match self.grid.get_mut(pos) {
            Some(Occupant::Corpse(corpse)) => (corpse.id, corpse.decompose()),
            _ => return TurnOutcome::Continued,
        };
        self.acted.insert(id);

        if gone {
            self.grid.clear(pos);
            self.tally.corpses_decomposed += 1;
            debug!(corpse_id = %id, position = %pos, "Corpse decomposed");
            return TurnOutcome::Decomposed;
        }
        TurnOutcome::Continued
    }

    /// Age, grow and maybe seed a neighboring cell
    pub(crate) fn plant_turn(&mut self, pos: Position) -> TurnOutcome {
        let turn = self.elapsed_turns;
        let (id, kind, too_old) = match self.grid.get_mut(pos) {
            Some(Occupant::Plant(plant)) => {
                plant.age = turn.saturating_sub(plant.birth_turn);
                (plant.id, plant.kind, plant.is_too_old())
            }
            _ => return TurnOutcome::Continued,
        };
        self.acted.insert(id);

        if too_old {
            self.grid.clear(pos);
            self.tally.plant_deaths += 1;
            debug!(plant_id = %id, %kind, position = %pos, "Plant died of old age");
            return TurnOutcome::Died(LifeEnded {
                id,
                name: kind.name().to_string(),
                cause: CauseOfDeath::NaturalCauses,
                position: pos,
                turn,
            });
        }

        if self.rng.gen_bool(self.config.plants.growth_chance) {
            if let Some(Occupant::Plant(plant)) = self.grid.get_mut(pos) {
                plant.size += 1;
            }
        }

        if self.check_full() || !self.rng.gen_bool(self.config.plants.spread_chance) {
            return TurnOutcome::Continued;
        }
        let spots = self.grid.free_cells_around(pos, 1);
        let Some(spot) = spots.choose(&mut self.rng).copied() else {
            return TurnOutcome::Continued;
        };

        let mut seedling = Plant::new(kind, spot, &mut self.rng);
        seedling.birth_turn = turn;
        let seedling_id = seedling.id;
        if self.grid.set(spot, Occupant::Plant(seedling)).is_err() {
            return TurnOutcome::Continued;
        }
        self.acted.insert(seedling_id);
        self.tally.plant_births += 1;
        self.save_at(spot);
        TurnOutcome::Reproduced(seedling_id)
    }

    /// Put displaced tiles back once their cell is vacant again.
    ///
    /// Entries stay queued while an animal or corpse covers the cell and are
    /// discarded when some other plant or puddle has taken it. A queued
    /// corpse keeps decaying and leaves the queue once it is gone.
    pub(crate) fn reconcile_pending(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        for mut tile in pending {
            match self.grid.get(tile.position) {
                None | Some(Occupant::Dirt(_)) => {
                    if let Err(err) = self.grid.set(tile.position, tile.occupant) {
                        debug!(error = %err, "Refresh entry outside the grid");
                    }
                }
                Some(Occupant::Animal(_)) | Some(Occupant::Corpse(_)) => {
                    if let Occupant::Corpse(corpse) = &mut tile.occupant {
                        if corpse.decompose() {
                            self.tally.corpses_decomposed += 1;
                            debug!(
                                corpse_id = %corpse.id,
                                position = %tile.position,
                                "Covered corpse decomposed"
                            );
                            continue;
                        }
                    }
                    self.pending.push(tile);
                }
                Some(other) => {
                    debug!(
                        position = %tile.position,
                        queued = tile.occupant.name(),
                        found = other.name(),
                        "Refresh entry dropped, cell taken"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Animal, Dirt, Water};
    use zoo_core::{PlantKind, Species};

    #[test]
    fn test_death_leaves_corpse() {
        let mut zoo = Zoo::empty(3, 3, 2);
        let pos = Position::new(1, 1);
        let lion = Animal::new(Species::Lion, pos, &mut zoo.rng);
        let lion_id = lion.id;
        zoo.place(pos, Occupant::Animal(lion));

        let ended = zoo.end_life(pos, CauseOfDeath::Exhaustion).unwrap();
        assert_eq!(ended.id, lion_id);
        assert_eq!(ended.cause, CauseOfDeath::Exhaustion);
        assert_eq!(ended.name, "Lion");

        match zoo.grid.get(pos) {
            Some(Occupant::Corpse(corpse)) => {
                assert_eq!(corpse.former, lion_id);
                assert_ne!(corpse.id, lion_id);
                assert!(zoo.acted.contains(&corpse.id));
            }
            other => panic!("expected corpse, got {other:?}"),
        }
        assert_eq!(zoo.tally.corpses_placed, 1);
    }

    #[test]
    fn test_end_life_without_animal() {
        let mut zoo = Zoo::empty(2, 2, 2);
        zoo.place(Position::new(0, 0), Occupant::Water(Water::new(4)));
        assert!(zoo.end_life(Position::new(0, 0), CauseOfDeath::Starvation).is_none());
        assert!(zoo.end_life(Position::new(1, 1), CauseOfDeath::Starvation).is_none());
        assert!(matches!(zoo.grid.get(Position::new(0, 0)), Some(Occupant::Water(_))));
    }

    #[test]
    fn test_corpse_dropped_on_taken_cell() {
        let mut zoo = Zoo::empty(2, 2, 2);
        let pos = Position::new(0, 1);
        let zebra = Animal::new(Species::Zebra, pos, &mut zoo.rng);
        let corpse = Corpse::from_animal(&zebra, EntityId::from_rng(&mut zoo.rng));
        zoo.place(pos, Occupant::Water(Water::new(2)));

        assert!(!zoo.place_corpse(corpse));
        assert!(matches!(zoo.grid.get(pos), Some(Occupant::Water(_))));
        assert_eq!(zoo.tally.corpses_dropped, 1);
    }

    #[test]
    fn test_corpse_replaces_dirt() {
        let mut zoo = Zoo::empty(2, 2, 2);
        let pos = Position::new(1, 0);
        let zebra = Animal::new(Species::Zebra, pos, &mut zoo.rng);
        let corpse = Corpse::from_animal(&zebra, EntityId::from_rng(&mut zoo.rng));
        zoo.place(pos, Occupant::Dirt(Dirt::default()));

        assert!(zoo.place_corpse(corpse));
        assert!(matches!(zoo.grid.get(pos), Some(Occupant::Corpse(_))));
    }

    #[test]
    fn test_corpse_gone_within_its_size() {
        let mut zoo = Zoo::empty(1, 1, 2);
        let pos = Position::new(0, 0);
        let elephant = Animal::new(Species::Elephant, pos, &mut zoo.rng);
        let corpse = Corpse::from_animal(&elephant, EntityId::from_rng(&mut zoo.rng));
        let size = corpse.size;
        zoo.place(pos, Occupant::Corpse(corpse));

        for _ in 1..size {
            assert_eq!(zoo.corpse_turn(pos), TurnOutcome::Continued);
        }
        assert_eq!(zoo.corpse_turn(pos), TurnOutcome::Decomposed);
        assert!(zoo.grid.get(pos).is_none());
        assert_eq!(zoo.tally.corpses_decomposed, 1);
    }

    #[test]
    fn test_old_plant_dies() {
        let mut zoo = Zoo::empty(1, 1, 2);
        let pos = Position::new(0, 0);
        let mut tree = Plant::new(PlantKind::Tree, pos, &mut zoo.rng);
        tree.max_age = 3;
        zoo.place(pos, Occupant::Plant(tree));
        zoo.elapsed_turns = 3;

        match zoo.plant_turn(pos) {
            TurnOutcome::Died(ended) => assert_eq!(ended.cause, CauseOfDeath::NaturalCauses),
            other => panic!("expected death, got {other:?}"),
        }
        assert!(zoo.grid.get(pos).is_none());
    }

    #[test]
    fn test_plant_spreads_to_free_neighbor() {
        let mut zoo = Zoo::empty(1, 2, 2);
        zoo.config.plants.spread_chance = 1.0;
        let pos = Position::new(0, 0);
        let grass = Plant::new(PlantKind::Grass, pos, &mut zoo.rng);
        zoo.place(pos, Occupant::Plant(grass));

        let TurnOutcome::Reproduced(seedling) = zoo.plant_turn(pos) else {
            panic!("plant should have spread");
        };
        let spot = Position::new(0, 1);
        assert_eq!(zoo.grid.get(spot).and_then(Occupant::id), Some(seedling));
        assert!(zoo.acted.contains(&seedling));

        // no room left
        assert_eq!(zoo.plant_turn(pos), TurnOutcome::Continued);
    }

    #[test]
    fn test_refresh_rules() {
        let mut zoo = Zoo::empty(1, 3, 2);
        let grass_pos = Position::new(0, 0);
        let covered = Position::new(0, 1);
        let taken = Position::new(0, 2);

        let grass = Plant::new(PlantKind::Grass, grass_pos, &mut zoo.rng);
        zoo.pending.push(PendingTile::new(grass_pos, Occupant::Plant(grass)));
        zoo.pending.push(PendingTile::new(covered, Occupant::Dirt(Dirt::default())));
        zoo.pending.push(PendingTile::new(taken, Occupant::Dirt(Dirt::default())));

        let hyena = Animal::new(Species::Hyena, covered, &mut zoo.rng);
        zoo.place(covered, Occupant::Animal(hyena));
        zoo.place(taken, Occupant::Water(Water::new(3)));

        zoo.reconcile_pending();
        assert!(matches!(zoo.grid.get(grass_pos), Some(Occupant::Plant(_))));
        assert!(matches!(zoo.grid.get(taken), Some(Occupant::Water(_))));
        assert_eq!(zoo.pending.len(), 1);
        assert_eq!(zoo.pending[0].position, covered);
    }

    #[test]
    fn test_covered_corpse_keeps_decaying() {
        let mut zoo = Zoo::empty(1, 3, 2);
        let rhino_pos = Position::new(0, 0);
        let corpse_pos = Position::new(0, 1);
        let rhino = Animal::new(Species::Rhino, rhino_pos, &mut zoo.rng);
        zoo.place(rhino_pos, Occupant::Animal(rhino));
        let zebra = Animal::new(Species::Zebra, corpse_pos, &mut zoo.rng);
        let mut corpse = Corpse::from_animal(&zebra, EntityId::from_rng(&mut zoo.rng));
        corpse.size = 2;
        zoo.place(corpse_pos, Occupant::Corpse(corpse));

        assert_eq!(zoo.move_animal(rhino_pos, zoo_core::Direction::East), Some(corpse_pos));
        assert_eq!(zoo.pending.len(), 1);

        zoo.reconcile_pending();
        assert!(matches!(
            zoo.pending[0].occupant,
            Occupant::Corpse(ref c) if c.size == 1
        ));

        zoo.reconcile_pending();
        assert!(zoo.pending.is_empty());
        assert_eq!(zoo.tally.corpses_decomposed, 1);

        // stepping off leaves nothing to restore
        assert_eq!(zoo.move_animal(corpse_pos, zoo_core::Direction::West), Some(rhino_pos));
        zoo.reconcile_pending();
        assert!(zoo.grid.get(corpse_pos).is_none());
    }

    #[test]
    fn test_sleeper_on_corpse_outlasts_it() {
        let mut zoo = Zoo::empty(1, 3, 2);
        zoo.config.weather.rain_chance = 0.0;
        let rhino_pos = Position::new(0, 0);
        let corpse_pos = Position::new(0, 1);
        let mut rhino = Animal::new(Species::Rhino, rhino_pos, &mut zoo.rng);
        rhino.sleep_counter = 50;
        zoo.place(rhino_pos, Occupant::Animal(rhino));
        let zebra = Animal::new(Species::Zebra, corpse_pos, &mut zoo.rng);
        let mut corpse = Corpse::from_animal(&zebra, EntityId::from_rng(&mut zoo.rng));
        corpse.size = 2;
        zoo.place(corpse_pos, Occupant::Corpse(corpse));
        assert_eq!(zoo.move_animal(rhino_pos, zoo_core::Direction::East), Some(corpse_pos));

        for _ in 0..10 {
            zoo.step();
        }
        assert!(zoo.pending.iter().all(|t| !matches!(t.occupant, Occupant::Corpse(_))));
        assert_eq!(zoo.census().corpses, 0);
    }
}
