//! Enemy state machine.
//!
//! Standing-duty guards: Idle -> Chasing -> back to their post -> Idle.
//! Patrolling guards: Patrol -> player detected -> Chasing -> sight lost for a
//! while -> inspecting for a while -> Patrol.

use bevy::prelude::*;

use super::attack::{AttackSequencer, AttackStage, AttackTiming, AttackerPose};
use super::components::{EnemyArchetype, EnemyGender, EnemyState, EnemyStats};
use super::detection::DetectionTimer;
use super::patrol::{PatrolController, PatrolRoute};
use super::services::{AnimFlag, AudioCue, EnemyServices, Navigator};
use super::sight::{ObserverPose, SightSensor};

/// Players above this height are out of kicking reach.
pub const KICK_HEIGHT_LIMIT: f32 = 1.5;

/// How far a standing guard may drift from its post before walking back.
const POST_TOLERANCE: f32 = 0.05;

/// Where an enemy stands this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentPose {
    pub position: Vec3,
    pub forward: Vec3,
    pub right: Vec3,
}

impl AgentPose {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            forward: transform.forward().as_vec3(),
            right: transform.right().as_vec3(),
        }
    }
}

/// Per-enemy brain: owns its sensor, hysteresis, patrol and kick sequencer.
#[derive(Component, Debug, Clone)]
pub struct EnemyController {
    gender: EnemyGender,
    archetype: EnemyArchetype,
    state: EnemyState,
    stats: EnemyStats,
    sensor: SightSensor,
    detection: DetectionTimer,
    patrol: PatrolController,
    attack: AttackSequencer,
    lose_player_timer: f32,
    inspection_timer: f32,
    starting_position: Vec3,
    enabled: bool,
}

impl EnemyController {
    pub fn new(
        gender: EnemyGender,
        archetype: EnemyArchetype,
        stats: EnemyStats,
        starting_position: Vec3,
    ) -> Self {
        Self {
            gender,
            archetype,
            state: archetype.resting_state(),
            sensor: SightSensor::new(stats.view_radius, stats.view_angle),
            detection: DetectionTimer::new(stats.detection_time),
            patrol: PatrolController::new(stats.wait_at_waypoint),
            attack: AttackSequencer::new(AttackTiming::default()),
            lose_player_timer: stats.lose_player_time,
            inspection_timer: stats.inspection_time,
            stats,
            starting_position,
            enabled: true,
        }
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn archetype(&self) -> EnemyArchetype {
        self.archetype
    }

    pub fn gender(&self) -> EnemyGender {
        self.gender
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn detection(&self) -> &DetectionTimer {
        &self.detection
    }

    pub fn patrol(&self) -> &PatrolController {
        &self.patrol
    }

    pub fn attack_stage(&self) -> AttackStage {
        self.attack.stage()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Give a patrolling enemy its route. Standing guards ignore routes.
    pub fn assign_route(&mut self, route: PatrolRoute, nav: &mut dyn Navigator) {
        if self.archetype == EnemyArchetype::StandingDuty {
            return;
        }
        self.patrol.assign_route(route, nav);
    }

    /// Stop all behavior for the rest of the session.
    ///
    /// A kick already in progress still plays out so the player is released.
    pub fn disable(&mut self) {
        if self.enabled {
            info!("Enemy AI disabled");
        }
        self.enabled = false;
        self.patrol.set_enabled(false);
    }

    /// Start chasing right away, e.g. after the player bumped into us.
    pub fn alert(&mut self, services: &mut EnemyServices) {
        if !self.enabled {
            return;
        }
        let Some(player) = services.world.player_position() else {
            return;
        };

        self.enter_chase();
        services.nav.request_destination(player);
    }

    /// Advance one frame.
    ///
    /// `delta` is scaled simulation time, `real_delta` wall-clock time.
    pub fn tick(
        &mut self,
        delta: f32,
        real_delta: f32,
        pose: &AgentPose,
        services: &mut EnemyServices,
    ) {
        services
            .presentation
            .set_locomotion_speed(services.nav.velocity_magnitude());

        let attacker = AttackerPose {
            position: pose.position,
            right: pose.right,
        };
        self.attack
            .tick(real_delta, &attacker, services.presentation, services.world);

        if !self.enabled {
            return;
        }

        self.patrol.set_enabled(self.state == EnemyState::Patrol);

        match self.state {
            EnemyState::Idle => self.idle_behaviour(delta, pose, services),
            EnemyState::Patrol => self.patrol_behaviour(delta, pose, services),
            EnemyState::Chasing => self.chasing_behaviour(delta, pose, services),
        }

        if self.state == EnemyState::Patrol {
            self.patrol.tick(delta, services.nav);
        }
    }

    fn idle_behaviour(&mut self, delta: f32, pose: &AgentPose, services: &mut EnemyServices) {
        if pose.position.distance(self.starting_position) > POST_TOLERANCE {
            services.nav.request_destination(self.starting_position);
        }
        self.patrol_behaviour(delta, pose, services);
    }

    fn patrol_behaviour(&mut self, delta: f32, pose: &AgentPose, services: &mut EnemyServices) {
        let Some(player) = services.world.player_position() else {
            return;
        };

        services.nav.set_speed(self.stats.walk_speed);

        let visible = self.can_see(player, pose, services);
        if self.detection.update(visible, delta) {
            services
                .presentation
                .play_cue(AudioCue::PlayerSpotted(self.gender));

            self.enter_chase();
            services.nav.request_destination(player);

            info!("Player detected, chasing");
        }
    }

    fn chasing_behaviour(&mut self, delta: f32, pose: &AgentPose, services: &mut EnemyServices) {
        if self.attack.is_active() {
            return;
        }
        let Some(player) = services.world.player_position() else {
            return;
        };

        services.nav.set_speed(self.stats.chase_speed);
        services.nav.request_destination(player);
        services.presentation.set_anim_flag(AnimFlag::Running, true);
        services.presentation.set_background_music(false);

        if self.can_see(player, pose, services) {
            let distance = pose.position.distance(player);

            if distance <= self.stats.attack_range
                && player.y < KICK_HEIGHT_LIMIT
                && !services.world.was_recently_kicked()
            {
                services.presentation.play_cue(AudioCue::SlowMotion);

                services.nav.set_paused(true);
                self.attack.trigger(services.presentation, services.world);
                services.world.mark_recently_kicked();

                info!("Kicking player");
            } else {
                services.nav.set_paused(false);
            }

            self.lose_player_timer = self.stats.lose_player_time;
            self.inspection_timer = self.stats.inspection_time;
        } else {
            self.lose_player_timer -= delta;

            if self.lose_player_timer < 0.0 {
                services.nav.set_paused(true);
                services.presentation.set_anim_flag(AnimFlag::Running, false);
                services.presentation.set_anim_flag(AnimFlag::Inspecting, true);
                debug!("Inspecting the area");

                self.inspection_timer -= delta;

                if self.inspection_timer <= 0.0 {
                    services.presentation.set_background_music(true);

                    services.nav.set_paused(false);
                    self.state = self.archetype.resting_state();
                    services.presentation.set_anim_flag(AnimFlag::Inspecting, false);

                    info!("Lost the player, returning to {:?}", self.state);
                }
            }
        }
    }

    fn can_see(&self, player: Vec3, pose: &AgentPose, services: &EnemyServices) -> bool {
        let observer = ObserverPose {
            eye: pose.position + Vec3::Y * self.stats.eye_height,
            forward: pose.forward,
        };
        self.sensor.is_visible(&observer, player, services.obstacles)
    }

    fn enter_chase(&mut self) {
        self.state = EnemyState::Chasing;
        self.lose_player_timer = self.stats.lose_player_time;
        self.inspection_timer = self.stats.inspection_time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::services::fakes::{
        log, Effect, FakeNav, FakePresentation, FakeWorld, Log, Wall,
    };

    struct Rig {
        log: Log,
        nav: FakeNav,
        presentation: FakePresentation,
        world: FakeWorld,
        wall: Wall,
    }

    impl Rig {
        fn new(player: Vec3) -> Self {
            let log = log();
            Self {
                nav: FakeNav::new(&log),
                presentation: FakePresentation::new(&log),
                world: FakeWorld::new(&log, Some(player)),
                wall: Wall { blocked: false },
                log,
            }
        }

        fn tick(&mut self, enemy: &mut EnemyController, delta: f32, pose: &AgentPose) {
            let mut services = EnemyServices {
                nav: &mut self.nav,
                presentation: &mut self.presentation,
                world: &mut self.world,
                obstacles: &self.wall,
            };
            enemy.tick(delta, delta, pose, &mut services);
        }
    }

    fn pose_at_origin() -> AgentPose {
        AgentPose {
            position: Vec3::ZERO,
            forward: Vec3::Z,
            right: Vec3::X,
        }
    }

    fn patroller() -> EnemyController {
        EnemyController::new(
            EnemyGender::Female,
            EnemyArchetype::Patrollable,
            EnemyStats::default(),
            Vec3::ZERO,
        )
    }

    fn guard() -> EnemyController {
        EnemyController::new(
            EnemyGender::Male,
            EnemyArchetype::StandingDuty,
            EnemyStats::default(),
            Vec3::ZERO,
        )
    }

    /// Player far enough ahead to be seen but out of kicking range.
    const SEEN_NOT_KICKABLE: Vec3 = Vec3::new(0.0, 1.5, 9.0);

    fn detect(enemy: &mut EnemyController, rig: &mut Rig) {
        for _ in 0..4 {
            rig.tick(enemy, 0.5, &pose_at_origin());
        }
        assert_eq!(enemy.state(), EnemyState::Chasing);
    }

    #[test]
    fn archetype_picks_initial_state() {
        assert_eq!(patroller().state(), EnemyState::Patrol);
        assert_eq!(guard().state(), EnemyState::Idle);
    }

    #[test]
    fn sustained_sight_starts_chase_with_spotted_cue() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        let mut enemy = patroller();

        rig.tick(&mut enemy, 1.0, &pose_at_origin());
        assert_eq!(enemy.state(), EnemyState::Patrol);

        rig.tick(&mut enemy, 1.0, &pose_at_origin());
        assert_eq!(enemy.state(), EnemyState::Chasing);

        let log = rig.log.borrow();
        assert!(log.contains(&Effect::Cue(AudioCue::PlayerSpotted(EnemyGender::Female))));
        assert_eq!(log.last(), Some(&Effect::Destination(SEEN_NOT_KICKABLE)));
    }

    #[test]
    fn hidden_player_is_never_detected() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        rig.wall.blocked = true;
        let mut enemy = patroller();

        for _ in 0..20 {
            rig.tick(&mut enemy, 0.5, &pose_at_origin());
        }
        assert_eq!(enemy.state(), EnemyState::Patrol);
        assert_eq!(enemy.detection().elapsed(), 0.0);
    }

    #[test]
    fn chasing_follows_player_at_chase_speed() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        let mut enemy = patroller();
        detect(&mut enemy, &mut rig);
        rig.log.borrow_mut().clear();

        rig.tick(&mut enemy, 0.1, &pose_at_origin());

        let log = rig.log.borrow();
        assert!(log.contains(&Effect::Speed(5.0)));
        assert!(log.contains(&Effect::Destination(SEEN_NOT_KICKABLE)));
        assert!(log.contains(&Effect::Flag(AnimFlag::Running, true)));
        assert!(log.contains(&Effect::Music(false)));
        assert!(log.contains(&Effect::Paused(false)));
        assert!(rig.presentation.running);
    }

    #[test]
    fn kicks_player_in_range() {
        let player = Vec3::new(0.0, 0.5, 4.0);
        let mut rig = Rig::new(player);
        let mut enemy = patroller();
        detect(&mut enemy, &mut rig);
        rig.log.borrow_mut().clear();

        rig.tick(&mut enemy, 0.1, &pose_at_origin());

        assert_eq!(enemy.attack_stage(), AttackStage::WindUp);
        assert!(rig.world.recently_kicked);
        assert!(rig.world.frozen);
        let log = rig.log.borrow();
        assert!(log.contains(&Effect::Cue(AudioCue::SlowMotion)));
        assert!(log.contains(&Effect::Paused(true)));
        assert_eq!(log.last(), Some(&Effect::MarkKicked));
    }

    #[test]
    fn recently_kicked_player_is_spared() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.5, 4.0));
        rig.world.recently_kicked = true;
        let mut enemy = patroller();
        detect(&mut enemy, &mut rig);

        rig.tick(&mut enemy, 0.1, &pose_at_origin());
        assert_eq!(enemy.attack_stage(), AttackStage::Idle);
    }

    #[test]
    fn airborne_player_is_out_of_reach() {
        let mut rig = Rig::new(Vec3::new(0.0, 2.0, 4.0));
        let mut enemy = patroller();
        detect(&mut enemy, &mut rig);

        rig.tick(&mut enemy, 0.1, &pose_at_origin());
        assert_eq!(enemy.attack_stage(), AttackStage::Idle);
    }

    #[test]
    fn chase_is_frozen_during_kick() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.5, 4.0));
        let mut enemy = patroller();
        detect(&mut enemy, &mut rig);
        rig.tick(&mut enemy, 0.1, &pose_at_origin());
        rig.log.borrow_mut().clear();

        // Player gone from sight, but no chase logic runs mid-kick
        rig.wall.blocked = true;
        rig.tick(&mut enemy, 0.1, &pose_at_origin());

        let log = rig.log.borrow();
        assert!(!log.iter().any(|e| matches!(e, Effect::Destination(_))));
        assert_eq!(enemy.state(), EnemyState::Chasing);
    }

    #[test]
    fn losing_sight_leads_to_inspection_then_patrol() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        let mut enemy = patroller();
        detect(&mut enemy, &mut rig);
        rig.tick(&mut enemy, 0.1, &pose_at_origin());

        rig.wall.blocked = true;

        // Lose-player timer runs down (3s) before inspecting starts
        for _ in 0..6 {
            rig.tick(&mut enemy, 0.5, &pose_at_origin());
        }
        assert!(!rig.presentation.inspecting);

        rig.tick(&mut enemy, 0.5, &pose_at_origin());
        assert!(rig.presentation.inspecting);
        assert!(!rig.presentation.running);
        assert!(rig.nav.paused);
        assert_eq!(enemy.state(), EnemyState::Chasing);

        // Inspection (3s) expires
        for _ in 0..4 {
            rig.tick(&mut enemy, 0.5, &pose_at_origin());
        }
        assert_eq!(enemy.state(), EnemyState::Chasing);
        rig.log.borrow_mut().clear();

        rig.tick(&mut enemy, 0.5, &pose_at_origin());
        assert_eq!(enemy.state(), EnemyState::Patrol);
        assert!(!rig.presentation.inspecting);
        assert!(!rig.nav.paused);
        assert!(rig.log.borrow().contains(&Effect::Music(true)));
    }

    #[test]
    fn standing_guard_returns_to_idle() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        let mut enemy = guard();
        detect(&mut enemy, &mut rig);

        rig.wall.blocked = true;
        for _ in 0..30 {
            rig.tick(&mut enemy, 0.5, &pose_at_origin());
        }
        assert_eq!(enemy.state(), EnemyState::Idle);
        assert!(!rig.presentation.inspecting);
    }

    #[test]
    fn standing_guard_walks_back_to_post() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        rig.wall.blocked = true;
        let mut enemy = guard();
        let displaced = AgentPose {
            position: Vec3::new(3.0, 0.0, 0.0),
            ..pose_at_origin()
        };

        rig.tick(&mut enemy, 0.1, &displaced);
        assert_eq!(rig.log.borrow().first(), Some(&Effect::Destination(Vec3::ZERO)));

        rig.log.borrow_mut().clear();
        rig.tick(&mut enemy, 0.1, &pose_at_origin());
        assert!(!rig
            .log
            .borrow()
            .iter()
            .any(|e| matches!(e, Effect::Destination(_))));
    }

    #[test]
    fn standing_guard_never_patrols() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        let mut enemy = guard();
        enemy.assign_route(PatrolRoute::new(vec![Vec3::X, Vec3::Z]), &mut rig.nav);

        assert!(enemy.patrol().route().is_empty());
        assert_ne!(enemy.state(), EnemyState::Patrol);
    }

    #[test]
    fn patrol_only_runs_while_patrolling() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        let mut enemy = patroller();
        enemy.assign_route(PatrolRoute::new(vec![Vec3::X, Vec3::Z]), &mut rig.nav);
        assert!(enemy.patrol().is_enabled());

        detect(&mut enemy, &mut rig);
        rig.tick(&mut enemy, 0.1, &pose_at_origin());
        assert!(!enemy.patrol().is_enabled());
        assert_eq!(enemy.patrol().route().len(), 2);
    }

    #[test]
    fn disabled_enemy_stays_inert() {
        let mut rig = Rig::new(SEEN_NOT_KICKABLE);
        let mut enemy = patroller();
        enemy.disable();

        for _ in 0..10 {
            rig.tick(&mut enemy, 0.5, &pose_at_origin());
        }
        assert_eq!(enemy.state(), EnemyState::Patrol);
        assert!(rig.log.borrow().is_empty());

        let mut services = EnemyServices {
            nav: &mut rig.nav,
            presentation: &mut rig.presentation,
            world: &mut rig.world,
            obstacles: &rig.wall,
        };
        enemy.alert(&mut services);
        assert_eq!(enemy.state(), EnemyState::Patrol);
    }

    #[test]
    fn disabling_mid_kick_still_releases_player() {
        let mut rig = Rig::new(Vec3::new(0.0, 0.5, 4.0));
        let mut enemy = patroller();
        detect(&mut enemy, &mut rig);
        rig.tick(&mut enemy, 0.1, &pose_at_origin());
        assert!(rig.world.frozen);

        enemy.disable();
        for _ in 0..10 {
            rig.tick(&mut enemy, 0.5, &pose_at_origin());
        }
        assert!(!rig.world.frozen);
        assert_eq!(enemy.attack_stage(), AttackStage::Idle);
    }

    #[test]
    fn alert_starts_chase_immediately() {
        let mut rig = Rig::new(Vec3::new(5.0, 0.5, -5.0));
        let mut enemy = patroller();
        let mut services = EnemyServices {
            nav: &mut rig.nav,
            presentation: &mut rig.presentation,
            world: &mut rig.world,
            obstacles: &rig.wall,
        };

        enemy.alert(&mut services);

        assert_eq!(enemy.state(), EnemyState::Chasing);
        assert_eq!(
            rig.log.borrow().last(),
            Some(&Effect::Destination(Vec3::new(5.0, 0.5, -5.0)))
        );
    }

    #[test]
    fn missing_player_is_ignored() {
        let log = log();
        let mut nav = FakeNav::new(&log);
        let mut presentation = FakePresentation::new(&log);
        let mut world = FakeWorld::new(&log, None);
        let wall = Wall { blocked: false };
        let mut services = EnemyServices {
            nav: &mut nav,
            presentation: &mut presentation,
            world: &mut world,
            obstacles: &wall,
        };
        let mut enemy = patroller();

        enemy.tick(1.0, 1.0, &pose_at_origin(), &mut services);
        enemy.alert(&mut services);

        assert_eq!(enemy.state(), EnemyState::Patrol);
        assert!(log.borrow().is_empty());
    }
}
