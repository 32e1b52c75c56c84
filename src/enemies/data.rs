//! Enemy data loading from RON files.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::components::{EnemyArchetype, EnemyGender, EnemyStats};
use crate::config::loader::{read_ron, ron_files_in};

/// Directory holding one RON file per enemy type.
pub const ENEMIES_DIR: &str = "assets/data/enemies";

/// Animation clip indices for an enemy type.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct AnimationIndices {
    pub idle: u32,
    pub walk: u32,
    pub run: u32,
    pub inspect: Option<u32>, // Falls back to idle
    pub kick: u32,
}

/// Animation configuration for an enemy type.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct AnimationConfig {
    pub indices: AnimationIndices,
    /// Locomotion speed above which the walk clip plays.
    #[serde(default = "default_walk_threshold")]
    pub walk_threshold: f32,
}

fn default_walk_threshold() -> f32 {
    0.1
}

/// Collider configuration for an enemy type.
#[derive(Deserialize, Clone, Debug)]
pub struct ColliderConfig {
    pub half_height: f32,
    pub radius: f32,
}

impl Default for ColliderConfig {
    fn default() -> Self {
        Self {
            half_height: 0.6,
            radius: 0.35,
        }
    }
}

/// Enemy definition loaded from RON file.
#[derive(Deserialize, Clone, Debug)]
pub struct EnemyDefinition {
    pub name: String,
    pub gender: EnemyGender,
    pub archetype: EnemyArchetype,
    #[serde(default)]
    pub stats: EnemyStats,
    pub model_path: String,
    pub scale: f32,
    #[serde(default)]
    pub collider: Option<ColliderConfig>,
    #[serde(default)]
    pub animations: Option<AnimationConfig>,
}

/// Resource holding all loaded enemy definitions.
#[derive(Resource, Default)]
pub struct EnemyRegistry {
    pub definitions: HashMap<String, EnemyDefinition>,
}

impl EnemyRegistry {
    /// Get an enemy definition by type name.
    pub fn get(&self, enemy_type: &str) -> Option<&EnemyDefinition> {
        self.definitions.get(enemy_type)
    }

    /// Enemy type names with their archetypes, in a stable order.
    pub fn roster(&self) -> Vec<(String, EnemyArchetype)> {
        let mut roster: Vec<(String, EnemyArchetype)> = self
            .definitions
            .iter()
            .map(|(key, definition)| (key.clone(), definition.archetype))
            .collect();
        roster.sort_by(|a, b| a.0.cmp(&b.0));
        roster
    }
}

/// Load all enemy definitions from the assets/data/enemies/ directory.
pub fn load_enemy_definitions(mut registry: ResMut<EnemyRegistry>) {
    let files = match ron_files_in(Path::new(ENEMIES_DIR)) {
        Ok(files) => files,
        Err(e) => {
            warn!("Enemy definitions unavailable: {}", e);
            return;
        }
    };

    for (enemy_type, path) in files {
        match read_ron::<EnemyDefinition>(&path) {
            Ok(definition) => {
                info!("Loaded enemy definition: {} ({})", definition.name, enemy_type);
                registry.definitions.insert(enemy_type, definition);
            }
            Err(e) => error!("Failed to load enemy definition: {}", e),
        }
    }

    info!("Loaded {} enemy definitions", registry.definitions.len());
}
