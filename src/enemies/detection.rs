//! Detection hysteresis: suspicion builds while the player is seen and decays otherwise.

/// Accumulate-on-visible / decay-on-hidden timer, clamped to `[0, detection_time]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionTimer {
    elapsed: f32,
    detection_time: f32,
}

impl DetectionTimer {
    pub fn new(detection_time: f32) -> Self {
        Self {
            elapsed: 0.0,
            detection_time: detection_time.max(0.0),
        }
    }

    /// Feed one tick of the visibility signal.
    ///
    /// Returns `true` when the timer has reached the detection threshold.
    pub fn update(&mut self, visible: bool, delta: f32) -> bool {
        let step = if visible { delta } else { -delta };
        self.elapsed = (self.elapsed + step).clamp(0.0, self.detection_time);
        visible && self.elapsed >= self.detection_time
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn detection_time(&self) -> f32 {
        self.detection_time
    }
}
