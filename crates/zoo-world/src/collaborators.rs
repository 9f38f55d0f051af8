//! Narrow contracts the simulation talks to for storage, display and assets.
//!
//! The zoo calls these at fixed points and never lets a failure here stop a
//! turn.

use crate::entity::{Occupant, VisualKind};
use crate::grid::Grid;
use crate::species::{plant_profile, profile};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;
use zoo_core::{EntityId, Error, Position, Result, ZooId};

/// Stored state of one organism at one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub zoo_id: ZooId,
    pub turn: u64,
    pub position: Position,
    pub occupant: Occupant,
    /// Unix timestamp in milliseconds
    pub saved_at: i64,
}

impl EntitySnapshot {
    pub fn new(zoo_id: ZooId, turn: u64, position: Position, occupant: Occupant) -> Option<Self> {
        Some(Self {
            id: occupant.id()?,
            zoo_id,
            turn,
            position,
            occupant,
            saved_at: chrono::Utc::now().timestamp_millis(),
        })
    }
}

pub trait Persistence: Send {
    fn save(&mut self, snapshot: &EntitySnapshot) -> Result<()>;

    fn load(&self, id: EntityId) -> Result<EntitySnapshot>;

    /// Latest snapshot of every entity saved for `zoo_id`
    fn load_all(&self, zoo_id: ZooId) -> Result<Vec<EntitySnapshot>>;
}

/// Keeps the latest snapshot per entity in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshots: HashMap<EntityId, EntitySnapshot>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

impl Persistence for MemoryStore {
    fn save(&mut self, snapshot: &EntitySnapshot) -> Result<()> {
        self.snapshots.insert(snapshot.id, snapshot.clone());
        Ok(())
    }

    fn load(&self, id: EntityId) -> Result<EntitySnapshot> {
        self.snapshots
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("entity {id}")))
    }

    fn load_all(&self, zoo_id: ZooId) -> Result<Vec<EntitySnapshot>> {
        let mut found: Vec<_> = self
            .snapshots
            .values()
            .filter(|s| s.zoo_id == zoo_id)
            .cloned()
            .collect();
        found.sort_by_key(|s| s.id);
        Ok(found)
    }
}

/// One bincode file per entity, `<dir>/<entity id>.bin`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, id: EntityId) -> PathBuf {
        self.dir.join(format!("{id}.bin"))
    }

    fn read(path: &Path) -> Result<EntitySnapshot> {
        let bytes = fs::read(path)?;
        bincode::deserialize(&bytes).map_err(|e| {
            Error::Serialization(format!("Failed to decode {}: {}", path.display(), e))
        })
    }
}

impl Persistence for FileStore {
    fn save(&mut self, snapshot: &EntitySnapshot) -> Result<()> {
        let bytes = bincode::serialize(snapshot)?;
        fs::write(self.path_for(snapshot.id), bytes)?;
        Ok(())
    }

    fn load(&self, id: EntityId) -> Result<EntitySnapshot> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(Error::NotFound(format!("no snapshot for entity {id}")));
        }
        Self::read(&path)
    }

    fn load_all(&self, zoo_id: ZooId) -> Result<Vec<EntitySnapshot>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("bin") {
                continue;
            }
            let snapshot = Self::read(&path)?;
            if snapshot.zoo_id == zoo_id {
                found.push(snapshot);
            }
        }
        found.sort_by_key(|s| s.id);
        debug!(zoo_id = %zoo_id, count = found.len(), "Loaded snapshots");
        Ok(found)
    }
}

/// Handle to whatever depicts a visual kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetHandle {
    Glyph(&'static str),
    File(PathBuf),
}

pub trait AssetProvider {
    fn ensure_visual(&mut self, kind: VisualKind) -> Result<AssetHandle>;
}

/// Emoji for every kind; never fails
#[derive(Debug, Default, Clone, Copy)]
pub struct GlyphAssets;

impl GlyphAssets {
    pub fn glyph(kind: VisualKind) -> &'static str {
        match kind {
            VisualKind::Animal(species) => profile(species).glyph,
            VisualKind::Plant(plant) => plant_profile(plant).glyph,
            VisualKind::Corpse => "💀",
            VisualKind::Water => "💧",
            VisualKind::Dirt => "🟫",
            VisualKind::Empty => "⬛",
        }
    }
}

impl AssetProvider for GlyphAssets {
    fn ensure_visual(&mut self, kind: VisualKind) -> Result<AssetHandle> {
        Ok(AssetHandle::Glyph(Self::glyph(kind)))
    }
}

/// Read-only consumer of the grid after each turn's reconciliation
pub trait Renderer: Send {
    fn render(&mut self, grid: &Grid, turn: u64) -> Result<()>;
}

/// Writes the grid as rows of emoji, one line per row, blank line per frame
pub struct TextRenderer<W: Write + Send, A: AssetProvider + Send = GlyphAssets> {
    out: W,
    assets: A,
}

impl<W: Write + Send> TextRenderer<W, GlyphAssets> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            assets: GlyphAssets,
        }
    }
}

impl<W: Write + Send, A: AssetProvider + Send> TextRenderer<W, A> {
    pub fn with_assets(out: W, assets: A) -> Self {
        Self { out, assets }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn symbol(&mut self, kind: VisualKind) -> &'static str {
        match self.assets.ensure_visual(kind) {
            Ok(AssetHandle::Glyph(glyph)) => glyph,
            // no inline depiction available, fall back to the emoji
            Ok(AssetHandle::File(_)) | Err(_) => GlyphAssets::glyph(kind),
        }
    }
}

impl<W: Write + Send, A: AssetProvider + Send> Renderer for TextRenderer<W, A> {
    fn render(&mut self, grid: &Grid, turn: u64) -> Result<()> {
        let mut frame = format!("turn {turn}\n");
        for row in grid.rows() {
            for cell in row {
                let kind = cell.as_ref().map_or(VisualKind::Empty, Occupant::visual_kind);
                frame.push_str(self.symbol(kind));
            }
            frame.push('\n');
        }
        frame.push('\n');
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
