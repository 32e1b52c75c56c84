//! Material definitions and registry for level geometry.

use bevy::prelude::*;
use std::collections::HashMap;

/// Material registry mapping material names to handles.
pub struct MaterialRegistry {
    materials: HashMap<String, Handle<StandardMaterial>>,
    fallback: Handle<StandardMaterial>,
    pub ground: Handle<StandardMaterial>,
}

impl MaterialRegistry {
    pub fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        let mut registry = HashMap::new();

        // Whitewashed walls - warm off-white
        let plaster = materials.add(StandardMaterial {
            base_color: Color::srgb(0.86, 0.82, 0.74),
            perceptual_roughness: 0.9,
            ..default()
        });
        registry.insert("plaster".to_string(), plaster.clone());

        // Brick - faded terracotta
        registry.insert(
            "brick".to_string(),
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.62, 0.33, 0.24),
                perceptual_roughness: 0.85,
                ..default()
            }),
        );

        // Wood - sun-bleached brown
        registry.insert(
            "wood".to_string(),
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.52, 0.40, 0.28),
                perceptual_roughness: 0.7,
                ..default()
            }),
        );

        // Stone - cool grey
        registry.insert(
            "stone".to_string(),
            materials.add(StandardMaterial {
                base_color: Color::srgb(0.55, 0.55, 0.53),
                perceptual_roughness: 0.8,
                ..default()
            }),
        );

        // Cobbled ground
        let ground = materials.add(StandardMaterial {
            base_color: Color::srgb(0.45, 0.43, 0.38),
            perceptual_roughness: 0.95,
            ..default()
        });

        Self {
            materials: registry,
            fallback: plaster,
            ground,
        }
    }

    /// Get material by name, falling back to plaster.
    pub fn get(&self, material_name: &str) -> Handle<StandardMaterial> {
        self.materials
            .get(material_name)
            .cloned()
            .unwrap_or_else(|| {
                warn!("Unknown material '{}', using plaster", material_name);
                self.fallback.clone()
            })
    }
}
