//! Zoo simulation engine.
//!
//! A bounded grid of animals, plants, corpses, water and dirt. Every turn the
//! zoo reconciles displaced tiles, rolls the weather, fills empty cells and
//! then lets each organism act once in row-major order.

pub mod actions;
pub mod behavior;
pub mod collaborators;
pub mod entity;
pub mod grid;
pub mod lifecycle;
pub mod motive;
pub mod species;
pub mod weather;
pub mod zoo;

pub use collaborators::{
    AssetHandle, AssetProvider, EntitySnapshot, FileStore, GlyphAssets, MemoryStore, Persistence,
    Renderer, TextRenderer,
};
pub use entity::{Animal, Corpse, Dirt, Occupant, Plant, VisualKind, Water};
pub use grid::{Grid, OutOfBounds};
pub use lifecycle::{LifeEnded, PendingTile, TurnOutcome};
pub use weather::Weather;
pub use zoo::{SimulationResult, TurnReport, Zoo, ZooBuilder};
