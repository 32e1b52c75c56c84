//! Day clock: the sun sinks over the round and its setting wins the game.

use bevy::prelude::*;

use crate::config::CurrentDifficulty;
use crate::core::Sunset;

/// Sun elevation at the start of the round, in degrees below the light's horizon.
pub const SUN_START_ANGLE: f32 = 20.0;
/// Sun elevation at sunset.
pub const SUN_END_ANGLE: f32 = -50.0;
/// Illuminance of the afternoon sun.
pub const SUN_ILLUMINANCE: f32 = 12_000.0;

const DEFAULT_DAY_DURATION: f32 = 300.0;

/// Marker for the directional light driven by the clock.
#[derive(Component)]
pub struct Sun;

/// Seconds into the day and whether the sun has set.
#[derive(Resource, Debug, Clone)]
pub struct SunClock {
    day_duration: f32,
    elapsed: f32,
    set: bool,
}

impl Default for SunClock {
    fn default() -> Self {
        Self::new(DEFAULT_DAY_DURATION)
    }
}

impl SunClock {
    pub fn new(day_duration: f32) -> Self {
        Self {
            day_duration,
            elapsed: 0.0,
            set: false,
        }
    }

    /// Fraction of the day that has passed, 0 to 1.
    pub fn progress(&self) -> f32 {
        if self.day_duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed / self.day_duration).clamp(0.0, 1.0)
    }

    /// Seconds left until sunset.
    pub fn remaining(&self) -> f32 {
        (self.day_duration - self.elapsed).max(0.0)
    }

    /// Current sun angle in degrees.
    pub fn sun_angle(&self) -> f32 {
        SUN_START_ANGLE + (SUN_END_ANGLE - SUN_START_ANGLE) * self.progress()
    }

    pub fn has_set(&self) -> bool {
        self.set
    }

    /// Advance the clock. Returns true exactly once, when the sun sets.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.set {
            return false;
        }

        self.elapsed += delta;
        if self.progress() >= 1.0 {
            self.set = true;
            return true;
        }
        false
    }
}

/// Start a new day using the difficulty's duration.
pub fn start_sun_clock(mut commands: Commands, difficulty: Res<CurrentDifficulty>) {
    let clock = difficulty
        .settings()
        .map(|settings| SunClock::new(settings.day_duration))
        .unwrap_or_default();
    info!("Sunset in {:.0}s", clock.remaining());
    commands.insert_resource(clock);
}

/// Move the sun and announce sunset.
pub fn advance_sun(
    time: Res<Time>,
    mut clock: ResMut<SunClock>,
    mut suns: Query<(&mut Transform, &mut DirectionalLight), With<Sun>>,
    mut sunsets: EventWriter<Sunset>,
) {
    if clock.tick(time.delta_secs()) {
        info!("The sun has set");
        sunsets.send(Sunset);
    }

    let angle = clock.sun_angle();
    // Fade out over the last third of the day
    let intensity = ((1.0 - clock.progress()) * 3.0).clamp(0.05, 1.0);

    for (mut transform, mut light) in suns.iter_mut() {
        transform.rotation = Quat::from_rotation_x(-angle.to_radians());
        light.illuminance = SUN_ILLUMINANCE * intensity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_sinks_linearly() {
        let mut clock = SunClock::new(100.0);
        assert_eq!(clock.sun_angle(), SUN_START_ANGLE);

        clock.tick(50.0);
        assert!((clock.progress() - 0.5).abs() < 1e-6);
        assert!((clock.sun_angle() - (-15.0)).abs() < 1e-4);
        assert!((clock.remaining() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn sunset_fires_once() {
        let mut clock = SunClock::new(10.0);
        assert!(!clock.tick(9.0));
        assert!(clock.tick(1.5));
        assert!(clock.has_set());
        assert!(!clock.tick(1.0));
        assert_eq!(clock.progress(), 1.0);
        assert_eq!(clock.remaining(), 0.0);
        assert_eq!(clock.sun_angle(), SUN_END_ANGLE);
    }

    #[test]
    fn missing_preset_uses_five_minute_day() {
        let mut app = App::new();
        app.init_resource::<CurrentDifficulty>()
            .add_systems(Update, start_sun_clock);
        app.update();

        assert_eq!(app.world().resource::<SunClock>().remaining(), 300.0);
    }
}
