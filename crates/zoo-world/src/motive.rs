//! Motivation engine: picks the need an animal acts on this turn.

use crate::entity::Animal;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::trace;
use zoo_core::{CauseOfDeath, Motive};

/// Priority-by-scarcity over the four reserves.
///
/// The lowest reserve that is still above zero wins; ties go to the earlier
/// entry of [`Motive::all`]. When no reserve is above zero a motive is drawn
/// uniformly.
pub fn select_motive<R: Rng + ?Sized>(animal: &Animal, rng: &mut R) -> Motive {
    let needs = [
        (Motive::Drink, animal.thirst),
        (Motive::Eat, animal.hunger),
        (Motive::Sleep, animal.energy),
        (Motive::Mate, animal.virility),
    ];

    let mut best: Option<(Motive, i32)> = None;
    for (motive, value) in needs {
        if value <= 0 {
            continue;
        }
        match best {
            Some((_, lowest)) if lowest <= value => {}
            _ => best = Some((motive, value)),
        }
    }

    match best {
        Some((motive, _)) => motive,
        None => *Motive::all().choose(rng).unwrap_or(&Motive::Sleep),
    }
}

/// Result of one motivation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motivation {
    /// A fresh choice this turn
    Chosen(Motive),
    /// Still serving a sleep that started on an earlier turn
    StillAsleep,
}

impl Motivation {
    pub fn motive(&self) -> Motive {
        match self {
            Motivation::Chosen(motive) => *motive,
            Motivation::StillAsleep => Motive::Sleep,
        }
    }
}

/// Age the animal, re-check liveness and pick its motive.
///
/// A failed liveness check marks the animal dead and returns the cause; the
/// caller turns it into a corpse and aborts the rest of the turn.
pub fn motivate<R: Rng + ?Sized>(
    animal: &mut Animal,
    turn: u64,
    rng: &mut R,
) -> Result<Motivation, CauseOfDeath> {
    animal.age = turn.saturating_sub(animal.birth_turn);
    if !animal.liveness_check() {
        return Err(animal.cause_of_death.unwrap_or(CauseOfDeath::NaturalCauses));
    }

    if animal.sleep_counter > 0 {
        animal.sleep_counter -= 1;
        animal.motive = Motive::Sleep;
        return Ok(Motivation::StillAsleep);
    }

    let motive = select_motive(animal, rng);
    animal.motive = motive;

    trace!(
        animal_id = %animal.id,
        species = animal.name(),
        ?motive,
        hunger = animal.hunger,
        thirst = animal.thirst,
        energy = animal.energy,
        virility = animal.virility,
        "Motive selected"
    );

    Ok(Motivation::Chosen(motive))
}
