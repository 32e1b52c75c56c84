//! Enemies module - perception, the state machine, kicks and spawning.
//!
//! The brain (`controller` and its parts) is plain Rust and only talks to the
//! game through the traits in `services`. `ai` adapts those traits to the ECS.

mod ai;
pub mod animation;
mod attack;
mod components;
mod controller;
pub mod data;
mod detection;
mod navigation;
mod patrol;
mod plugin;
mod services;
mod sight;
mod spawning;

pub use ai::EnemySpawner;
pub use attack::{AttackSequencer, AttackStage, AttackTiming};
pub use components::*;
pub use controller::{AgentPose, EnemyController, KICK_HEIGHT_LIMIT};
pub use data::EnemyRegistry;
pub use detection::DetectionTimer;
pub use navigation::NavAgent;
pub use patrol::{PatrolController, PatrolRoute};
pub use plugin::EnemyPlugin;
pub use services::{
    AnimFlag, AudioCue, EnemyServices, Navigator, ObstacleQuery, PlayerWorld, Presentation,
};
pub use sight::{ObserverPose, SightSensor};
pub use spawning::{SpawnError, SpawnOrder, SpawnPlan, Spawner};
