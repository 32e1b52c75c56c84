//! World module - the town level, its waypoints and the day clock.

mod builder;
mod data;
mod materials;
mod plugin;
mod sun;

pub use builder::{
    actor_collision_groups, Obstacle, Pickup, PlayerStart, RoundEntity, Waypoints, ACTOR_GROUP,
    OBSTACLE_GROUP, PICKUP_GROUP,
};
pub use data::{CurrentLevel, LevelDefinition, LevelRegistry, PickupKind};
pub use plugin::{setup_level, WorldPlugin};
pub use sun::{Sun, SunClock};
