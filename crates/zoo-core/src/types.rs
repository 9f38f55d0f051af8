//! Core type definitions for the simulation.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for anything that lives on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Draw an id from a seeded generator so seeded runs stay reproducible
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a zoo, used to group persisted snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZooId(pub Uuid);

impl ZooId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl Default for ZooId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ZooId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cell coordinate. Rows grow downwards, columns grow to the right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn offset(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    pub fn step(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.to_delta();
        self.offset(d_row, d_col)
    }

    /// King-move distance; adjacent cells (diagonals included) are 1 apart
    pub fn chebyshev_distance(&self, other: &Position) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    pub fn is_adjacent(&self, other: &Position) -> bool {
        self != other && self.chebyshev_distance(other) == 1
    }

    /// Direction of the single step that brings `self` closest to `target`
    pub fn direction_towards(&self, target: &Position) -> Option<Direction> {
        Direction::from_delta(
            (target.row - self.row).signum(),
            (target.col - self.col).signum(),
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction for movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl Direction {
    /// `(d_row, d_col)` for one step
    pub fn to_delta(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::NorthEast => (-1, 1),
            Direction::NorthWest => (-1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (1, -1),
        }
    }

    pub fn from_delta(d_row: i32, d_col: i32) -> Option<Direction> {
        Direction::all()
            .into_iter()
            .find(|direction| direction.to_delta() == (d_row, d_col))
    }

    pub fn all() -> [Direction; 8] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
            Direction::NorthEast,
            Direction::NorthWest,
            Direction::SouthEast,
            Direction::SouthWest,
        ]
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Direction::all()[rng.gen_range(0..8)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Gender {
        if rng.gen_bool(0.5) {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

/// Terminal animal species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    Lion,
    Zebra,
    Elephant,
    Hyena,
    Giraffe,
    Rhino,
    Baboon,
}

impl Species {
    pub fn all() -> [Species; 7] {
        [
            Species::Lion,
            Species::Zebra,
            Species::Elephant,
            Species::Hyena,
            Species::Giraffe,
            Species::Rhino,
            Species::Baboon,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::Lion => "Lion",
            Species::Zebra => "Zebra",
            Species::Elephant => "Elephant",
            Species::Hyena => "Hyena",
            Species::Giraffe => "Giraffe",
            Species::Rhino => "Rhino",
            Species::Baboon => "Baboon",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlantKind {
    Grass,
    Bush,
    Tree,
}

impl PlantKind {
    pub fn name(&self) -> &'static str {
        match self {
            PlantKind::Grass => "Grass",
            PlantKind::Bush => "Bush",
            PlantKind::Tree => "Tree",
        }
    }
}

impl fmt::Display for PlantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something an animal can eat. Resolved per species once, in the species table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodTag {
    Plant(PlantKind),
    Animal(Species),
    Corpse,
}

impl FoodTag {
    pub fn is_animal(&self) -> bool {
        matches!(self, FoodTag::Animal(_))
    }
}

/// The four needs an animal can be driven by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motive {
    Drink,
    Eat,
    Sleep,
    Mate,
}

impl Motive {
    pub fn all() -> [Motive; 4] {
        [Motive::Drink, Motive::Eat, Motive::Sleep, Motive::Mate]
    }
}

/// Why an organism stopped living
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CauseOfDeath {
    NaturalCauses,
    Starvation,
    Dehydration,
    Exhaustion,
    Predation,
    Drowning,
}

impl fmt::Display for CauseOfDeath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            CauseOfDeath::NaturalCauses => "natural causes",
            CauseOfDeath::Starvation => "starvation",
            CauseOfDeath::Dehydration => "dehydration",
            CauseOfDeath::Exhaustion => "exhaustion",
            CauseOfDeath::Predation => "predation",
            CauseOfDeath::Drowning => "drowning",
        };
        f.write_str(text)
    }
}

/// Rain strength for a single turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RainIntensity {
    Torrential,
    Heavy,
    Moderate,
    Mist,
}

impl RainIntensity {
    pub fn all() -> [RainIntensity; 4] {
        [
            RainIntensity::Torrential,
            RainIntensity::Heavy,
            RainIntensity::Moderate,
            RainIntensity::Mist,
        ]
    }

    /// Selection weights. These do not sum to one and are used as-is.
    pub fn weight(&self) -> f64 {
        match self {
            RainIntensity::Torrential => 0.01,
            RainIntensity::Heavy => 0.05,
            RainIntensity::Moderate => 0.9,
            RainIntensity::Mist => 0.1,
        }
    }

    /// Largest puddle that can form on an empty cell
    pub fn puddle_max(&self) -> i32 {
        match self {
            RainIntensity::Torrential => 25,
            RainIntensity::Heavy => 10,
            RainIntensity::Moderate => 3,
            RainIntensity::Mist => 1,
        }
    }
}
