//! Service ports the enemy AI talks to.
//!
//! The AI core never touches the ECS directly. Each tick the host hands it a
//! bundle of trait objects for navigation, presentation, the player and the
//! obstacle geometry, which keeps the state machine testable with plain fakes.

use bevy::prelude::*;

use super::components::EnemyGender;

/// One-shot audio cues triggered by enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    PlayerSpotted(EnemyGender),
    SlowMotion,
    KickImpact,
}

/// Boolean animation parameters on the enemy rig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimFlag {
    Running,
    Inspecting,
}

/// Movement service (a navmesh agent in the host).
pub trait Navigator {
    fn request_destination(&mut self, position: Vec3);
    fn remaining_distance(&self) -> f32;
    fn stopping_distance(&self) -> f32;
    fn is_path_pending(&self) -> bool;
    fn velocity_magnitude(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
    fn set_paused(&mut self, paused: bool);
    fn set_avoidance_priority(&mut self, priority: u32);
}

/// Animation, camera, audio and VFX side of the game.
pub trait Presentation {
    fn set_anim_flag(&mut self, flag: AnimFlag, value: bool);
    fn set_locomotion_speed(&mut self, speed: f32);
    fn trigger_kick(&mut self);
    fn show_cinematic_camera(&mut self, show: bool);
    fn screen_shake(&mut self);
    fn play_cue(&mut self, cue: AudioCue);
    fn set_background_music(&mut self, playing: bool);
    fn play_kick_hit_fx(&mut self);
}

/// The player and the global simulation knobs the AI may touch.
pub trait PlayerWorld {
    fn player_position(&self) -> Option<Vec3>;
    /// Disable player control and zero its velocity, or give control back.
    fn freeze_player(&mut self, frozen: bool);
    fn was_recently_kicked(&self) -> bool;
    fn mark_recently_kicked(&mut self);
    fn apply_kick_force(&mut self, impulse: Vec3, torque: Vec3);
    fn report_kick_damage(&mut self);
    /// Scale simulation time; `fixed_step` is the matching physics step.
    fn set_time_scale(&mut self, scale: f32, fixed_step: f32);
}

/// Line-of-sight blocker lookup against obstacle-classified geometry.
pub trait ObstacleQuery {
    /// Whether an obstacle lies on the ray within `max_distance`.
    fn blocks(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> bool;
}

/// Services handed to an enemy for one tick.
pub struct EnemyServices<'a> {
    pub nav: &'a mut dyn Navigator,
    pub presentation: &'a mut dyn Presentation,
    pub world: &'a mut dyn PlayerWorld,
    pub obstacles: &'a dyn ObstacleQuery,
}

/// Recording fakes shared by the AI unit tests.
#[cfg(test)]
pub(crate) mod fakes {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Everything the fakes observed, in call order.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Effect {
        Destination(Vec3),
        Speed(f32),
        Paused(bool),
        Priority(u32),
        Flag(AnimFlag, bool),
        Kick,
        Cinematic(bool),
        Shake,
        Cue(AudioCue),
        Music(bool),
        HitFx,
        Freeze(bool),
        MarkKicked,
        Force(Vec3, Vec3),
        Damage,
        TimeScale(f32, f32),
    }

    pub type Log = Rc<RefCell<Vec<Effect>>>;

    pub fn log() -> Log {
        Rc::new(RefCell::new(Vec::new()))
    }

    pub struct FakeNav {
        pub log: Log,
        pub remaining: f32,
        pub stopping: f32,
        pub pending: bool,
        pub paused: bool,
        pub velocity: f32,
    }

    impl FakeNav {
        pub fn new(log: &Log) -> Self {
            Self {
                log: log.clone(),
                remaining: 0.0,
                stopping: 0.5,
                pending: false,
                paused: false,
                velocity: 0.0,
            }
        }
    }

    impl Navigator for FakeNav {
        fn request_destination(&mut self, position: Vec3) {
            self.log.borrow_mut().push(Effect::Destination(position));
        }
        fn remaining_distance(&self) -> f32 {
            self.remaining
        }
        fn stopping_distance(&self) -> f32 {
            self.stopping
        }
        fn is_path_pending(&self) -> bool {
            self.pending
        }
        fn velocity_magnitude(&self) -> f32 {
            self.velocity
        }
        fn set_speed(&mut self, speed: f32) {
            self.log.borrow_mut().push(Effect::Speed(speed));
        }
        fn set_paused(&mut self, paused: bool) {
            self.paused = paused;
            self.log.borrow_mut().push(Effect::Paused(paused));
        }
        fn set_avoidance_priority(&mut self, priority: u32) {
            self.log.borrow_mut().push(Effect::Priority(priority));
        }
    }

    pub struct FakePresentation {
        pub log: Log,
        pub running: bool,
        pub inspecting: bool,
    }

    impl FakePresentation {
        pub fn new(log: &Log) -> Self {
            Self {
                log: log.clone(),
                running: false,
                inspecting: false,
            }
        }
    }

    impl Presentation for FakePresentation {
        fn set_anim_flag(&mut self, flag: AnimFlag, value: bool) {
            match flag {
                AnimFlag::Running => self.running = value,
                AnimFlag::Inspecting => self.inspecting = value,
            }
            self.log.borrow_mut().push(Effect::Flag(flag, value));
        }
        fn set_locomotion_speed(&mut self, _speed: f32) {}
        fn trigger_kick(&mut self) {
            self.log.borrow_mut().push(Effect::Kick);
        }
        fn show_cinematic_camera(&mut self, show: bool) {
            self.log.borrow_mut().push(Effect::Cinematic(show));
        }
        fn screen_shake(&mut self) {
            self.log.borrow_mut().push(Effect::Shake);
        }
        fn play_cue(&mut self, cue: AudioCue) {
            self.log.borrow_mut().push(Effect::Cue(cue));
        }
        fn set_background_music(&mut self, playing: bool) {
            self.log.borrow_mut().push(Effect::Music(playing));
        }
        fn play_kick_hit_fx(&mut self) {
            self.log.borrow_mut().push(Effect::HitFx);
        }
    }

    pub struct FakeWorld {
        pub log: Log,
        pub player: Option<Vec3>,
        pub frozen: bool,
        pub recently_kicked: bool,
    }

    impl FakeWorld {
        pub fn new(log: &Log, player: Option<Vec3>) -> Self {
            Self {
                log: log.clone(),
                player,
                frozen: false,
                recently_kicked: false,
            }
        }
    }

    impl PlayerWorld for FakeWorld {
        fn player_position(&self) -> Option<Vec3> {
            self.player
        }
        fn freeze_player(&mut self, frozen: bool) {
            self.frozen = frozen;
            self.log.borrow_mut().push(Effect::Freeze(frozen));
        }
        fn was_recently_kicked(&self) -> bool {
            self.recently_kicked
        }
        fn mark_recently_kicked(&mut self) {
            self.recently_kicked = true;
            self.log.borrow_mut().push(Effect::MarkKicked);
        }
        fn apply_kick_force(&mut self, impulse: Vec3, torque: Vec3) {
            self.log.borrow_mut().push(Effect::Force(impulse, torque));
        }
        fn report_kick_damage(&mut self) {
            self.log.borrow_mut().push(Effect::Damage);
        }
        fn set_time_scale(&mut self, scale: f32, fixed_step: f32) {
            self.log.borrow_mut().push(Effect::TimeScale(scale, fixed_step));
        }
    }

    /// Blocks every ray when `blocked` is set.
    pub struct Wall {
        pub blocked: bool,
    }

    impl ObstacleQuery for Wall {
        fn blocks(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> bool {
            self.blocked
        }
    }

    /// Open ground with nothing to hide behind.
    pub struct NoObstacles;

    impl ObstacleQuery for NoObstacles {
        fn blocks(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> bool {
            false
        }
    }
}
