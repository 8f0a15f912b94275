use crate::config::MotionConfig;

/// Turns a speed setting (km/h) and frame time into walked distance and steps.
#[derive(Debug, Clone)]
pub struct MotionSimulator {
    config: MotionConfig,
    speed: f64,
    distance_km: f64,
    steps: f64,
    elapsed_secs: f64,
    last_frame_ms: Option<f64>,
}

impl MotionSimulator {
    pub fn new(config: MotionConfig) -> Self {
        Self {
            config,
            speed: 0.0,
            distance_km: 0.0,
            steps: 0.0,
            elapsed_secs: 0.0,
            last_frame_ms: None,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Negative and non-finite input means standing still.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        self.speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        self.speed
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_moving(&self) -> bool {
        self.speed > 0.0
    }

    /// Video rate for the current speed; 1.0 at the reference speed.
    pub fn playback_rate(&self) -> f64 {
        self.speed / self.config.reference_speed
    }

    /// Advances by the time since the previous frame. The first frame after a
    /// reset only records its timestamp.
    pub fn tick(&mut self, timestamp_ms: f64, media_started: bool) -> bool {
        let delta_secs = match self.last_frame_ms {
            Some(last) => (timestamp_ms - last) / 1000.0,
            None => 0.0,
        };
        self.last_frame_ms = Some(timestamp_ms);

        self.advance(delta_secs, media_started)
    }

    /// Accumulates one frame. Returns whether anything moved.
    pub fn advance(&mut self, delta_secs: f64, media_started: bool) -> bool {
        if !self.is_moving() || !media_started {
            return false;
        }

        let delta_secs = if delta_secs.is_finite() {
            delta_secs.clamp(0.0, self.config.max_frame_delta_secs)
        } else {
            0.0
        };
        if delta_secs == 0.0 {
            return false;
        }

        let km_this_frame = (self.speed / 3600.0) * delta_secs;
        self.elapsed_secs += delta_secs;
        self.distance_km += km_this_frame;
        self.steps += km_this_frame / self.config.step_length_km;

        true
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_km
    }

    /// Whole steps taken.
    pub fn steps(&self) -> u64 {
        self.steps.floor() as u64
    }

    pub fn exact_steps(&self) -> f64 {
        self.steps
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    pub fn last_frame_ms(&self) -> Option<f64> {
        self.last_frame_ms
    }
}
