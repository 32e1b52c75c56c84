//! Collectibles: oxygen cans heal, toolboxes add a boost charge.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::components::Player;
use super::vitals::PlayerVitals;
use crate::world::{Pickup, PickupKind};

/// Health restored by an oxygen can.
pub const OXY_CAN_HEAL: f32 = 40.0;

/// Apply a pickup to the player. Returns false when it had no use, so it stays in the level.
pub fn apply_pickup(kind: PickupKind, vitals: &mut PlayerVitals) -> bool {
    match kind {
        PickupKind::OxyCan => vitals.heal(OXY_CAN_HEAL),
        PickupKind::Toolbox => vitals.add_boost(),
    }
}

/// Collect pickups the player rolls into.
pub fn collect_pickups(
    mut commands: Commands,
    mut collisions: EventReader<CollisionEvent>,
    pickups: Query<&Pickup>,
    mut players: Query<(Entity, &mut PlayerVitals), With<Player>>,
) {
    let Ok((player, mut vitals)) = players.get_single_mut() else {
        collisions.clear();
        return;
    };

    for event in collisions.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        let other = if *a == player {
            *b
        } else if *b == player {
            *a
        } else {
            continue;
        };
        let Ok(Pickup(kind)) = pickups.get(other) else {
            continue;
        };

        if apply_pickup(*kind, &mut vitals) {
            info!("Collected {:?}", kind);
            commands.entity(other).despawn_recursive();
        }
    }
}
