use std::time::{Duration, Instant};

use log::{info, warn};

/// One gyroscope-style reading
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TiltSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl TiltSample {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SensorError {
    #[error("Tilt sensor is not available on this device")]
    Unavailable,

    #[error("Tilt sensor failed to start: {0}")]
    Start(String),
}

/// A source of tilt samples, polled by the frame loop
pub trait TiltSensor {
    fn is_available(&self) -> bool;

    /// Begin delivering samples no more often than `interval`
    fn start(&mut self, interval: Duration) -> Result<(), SensorError>;

    /// Next sample, if one is due at `now`
    fn poll(&mut self, now: Instant) -> Option<TiltSample>;

    fn stop(&mut self);
}

/// Horizontal steering direction for keyboard tilt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

/// Emulates a gyroscope from the arrow keys.
///
/// Terminals without key-release reporting only send repeated presses, so in
/// that mode a held key is considered released once `hold_timeout` passes
/// without a repeat.
#[derive(Debug)]
pub struct KeyboardTilt {
    tilt: f32,
    left_pressed: Option<Instant>,
    right_pressed: Option<Instant>,
    release_events: bool,
    hold_timeout: Duration,
    interval: Duration,
    last_sample: Option<Instant>,
    running: bool,
}

/// Longer than common terminal key-repeat delays
pub const DEFAULT_HOLD_TIMEOUT: Duration = Duration::from_millis(500);

impl KeyboardTilt {
    pub fn new(tilt: f32, release_events: bool) -> Self {
        Self {
            tilt,
            left_pressed: None,
            right_pressed: None,
            release_events,
            hold_timeout: DEFAULT_HOLD_TIMEOUT,
            interval: Duration::ZERO,
            last_sample: None,
            running: false,
        }
    }

    pub fn with_hold_timeout(mut self, hold_timeout: Duration) -> Self {
        self.hold_timeout = hold_timeout;
        self
    }

    /// A steering key went down, or repeated
    pub fn press(&mut self, direction: Steer, now: Instant) {
        match direction {
            Steer::Left => self.left_pressed = Some(now),
            Steer::Right => self.right_pressed = Some(now),
        }
    }

    pub fn release(&mut self, direction: Steer) {
        match direction {
            Steer::Left => self.left_pressed = None,
            Steer::Right => self.right_pressed = None,
        }
    }

    fn held(&self, pressed: Option<Instant>, now: Instant) -> bool {
        match pressed {
            None => false,
            Some(_) if self.release_events => true,
            Some(at) => now.saturating_duration_since(at) <= self.hold_timeout,
        }
    }

    /// Current tilt on the y axis: negative steers left, positive steers right
    pub fn axis(&self, now: Instant) -> f32 {
        let left = self.held(self.left_pressed, now);
        let right = self.held(self.right_pressed, now);
        match (left, right) {
            (true, false) => -self.tilt,
            (false, true) => self.tilt,
            _ => 0.0,
        }
    }
}

impl TiltSensor for KeyboardTilt {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, interval: Duration) -> Result<(), SensorError> {
        self.interval = interval;
        self.last_sample = None;
        self.running = true;
        Ok(())
    }

    fn poll(&mut self, now: Instant) -> Option<TiltSample> {
        if !self.running {
            return None;
        }
        if let Some(last) = self.last_sample
            && now.duration_since(last) < self.interval
        {
            return None;
        }

        let y = self.axis(now);
        if y == 0.0 {
            return None;
        }
        self.last_sample = Some(now);
        Some(TiltSample::new(0.0, y, 0.0))
    }

    fn stop(&mut self) {
        self.running = false;
        self.left_pressed = None;
        self.right_pressed = None;
    }
}

/// Owns the sensor subscription for the lifetime of the app
pub struct SensorFeed<S: TiltSensor> {
    sensor: Option<S>,
}

impl<S: TiltSensor> SensorFeed<S> {
    /// Start the sensor, degrading to "no tilt" when it cannot be used
    pub fn connect(mut sensor: S, interval: Duration) -> Self {
        if !sensor.is_available() {
            warn!("{}; tilt steering disabled", SensorError::Unavailable);
            return Self { sensor: None };
        }

        match sensor.start(interval) {
            Ok(()) => {
                info!("Tilt sensor started ({} ms interval)", interval.as_millis());
                Self {
                    sensor: Some(sensor),
                }
            }
            Err(err) => {
                warn!("{}; tilt steering disabled", err);
                Self { sensor: None }
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.sensor.is_some()
    }

    pub fn sensor_mut(&mut self) -> Option<&mut S> {
        self.sensor.as_mut()
    }

    pub fn poll(&mut self, now: Instant) -> Option<TiltSample> {
        self.sensor.as_mut().and_then(|sensor| sensor.poll(now))
    }

    /// Stop the subscription. Later polls yield nothing.
    pub fn release(&mut self) {
        if let Some(mut sensor) = self.sensor.take() {
            sensor.stop();
            info!("Tilt sensor released");
        }
    }
}

impl<S: TiltSensor> Drop for SensorFeed<S> {
    fn drop(&mut self) {
        self.release();
    }
}
