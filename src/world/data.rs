//! Level data structures and RON loading.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::config::loader::{read_ron, ron_files_in};
use crate::config::DataLoadError;

/// Directory holding one RON file per level.
pub const LEVELS_DIR: &str = "assets/data/levels";

/// Global ambient light settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AmbientDef {
    pub color: (f32, f32, f32),
    pub brightness: f32,
}

impl Default for AmbientDef {
    fn default() -> Self {
        Self {
            color: (1.0, 0.95, 0.85),
            brightness: 400.0,
        }
    }
}

/// A solid box that blocks movement and line of sight.
#[derive(Debug, Clone, Deserialize)]
pub struct ObstacleDef {
    /// Center of the box footprint; the box rests on the ground.
    pub position: (f32, f32),
    /// Full width, height and depth.
    pub size: (f32, f32, f32),
    #[serde(default = "default_obstacle_material")]
    pub material: String,
    /// Rotation around the vertical axis in degrees.
    #[serde(default)]
    pub yaw: f32,
}

fn default_obstacle_material() -> String {
    "plaster".to_string()
}

/// Kind of collectible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum PickupKind {
    /// Restores health.
    OxyCan,
    /// Adds one speed boost charge.
    Toolbox,
}

/// A collectible placed on the ground.
#[derive(Debug, Clone, Deserialize)]
pub struct PickupDef {
    pub kind: PickupKind,
    pub position: (f32, f32),
}

/// Complete level definition loaded from RON.
#[derive(Debug, Clone, Deserialize)]
pub struct LevelDefinition {
    pub name: String,
    /// Ground extent along X and Z.
    pub ground_size: (f32, f32),
    pub player_start: (f32, f32, f32),
    /// Shared waypoint pool for spawning and patrol routes.
    pub waypoints: Vec<(f32, f32, f32)>,
    #[serde(default)]
    pub obstacles: Vec<ObstacleDef>,
    #[serde(default)]
    pub pickups: Vec<PickupDef>,
    #[serde(default)]
    pub ambient: AmbientDef,
}

impl LevelDefinition {
    pub fn player_start(&self) -> Vec3 {
        let (x, y, z) = self.player_start;
        Vec3::new(x, y, z)
    }

    pub fn waypoints(&self) -> Vec<Vec3> {
        self.waypoints
            .iter()
            .map(|&(x, y, z)| Vec3::new(x, y, z))
            .collect()
    }

    /// Check the pieces the round cannot start without.
    pub fn validated(self, path: &Path) -> Result<Self, DataLoadError> {
        if self.ground_size.0 <= 0.0 || self.ground_size.1 <= 0.0 {
            return Err(DataLoadError::InvalidValue {
                path: path.display().to_string(),
                field: "ground_size",
                details: format!("expected a positive size, got {:?}", self.ground_size),
            });
        }
        if let Some(obstacle) = self.obstacles.iter().find(|o| {
            let (w, h, d) = o.size;
            w <= 0.0 || h <= 0.0 || d <= 0.0
        }) {
            return Err(DataLoadError::InvalidValue {
                path: path.display().to_string(),
                field: "obstacles",
                details: format!("obstacle at {:?} has size {:?}", obstacle.position, obstacle.size),
            });
        }
        Ok(self)
    }
}

/// Registry of all loaded levels.
#[derive(Resource, Default)]
pub struct LevelRegistry {
    pub levels: HashMap<String, LevelDefinition>,
}

impl LevelRegistry {
    /// Get a level by name.
    pub fn get(&self, name: &str) -> Option<&LevelDefinition> {
        self.levels.get(name)
    }
}

/// Resource indicating which level to load.
#[derive(Resource)]
pub struct CurrentLevel {
    pub name: String,
}

impl Default for CurrentLevel {
    fn default() -> Self {
        Self {
            name: "town".to_string(),
        }
    }
}

/// Load all level definitions from assets/data/levels/.
pub fn load_level_definitions(mut registry: ResMut<LevelRegistry>) {
    let files = match ron_files_in(Path::new(LEVELS_DIR)) {
        Ok(files) => files,
        Err(e) => {
            error!("Level definitions unavailable: {}", e);
            return;
        }
    };

    for (name, path) in files {
        match read_ron::<LevelDefinition>(&path).and_then(|level| level.validated(&path)) {
            Ok(level) => {
                info!(
                    "Loaded level: {} ({} waypoints, {} obstacles)",
                    level.name,
                    level.waypoints.len(),
                    level.obstacles.len()
                );
                registry.levels.insert(name, level);
            }
            Err(e) => error!("Failed to load level: {}", e),
        }
    }
}
