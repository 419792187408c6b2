//! Idle sway applied to the garment group while nobody is dragging it.

use crate::studio::config::IdleConfig;

#[derive(Debug, Clone)]
pub struct IdleRotation {
    speed: f32,
    amplitude: f32,
    elapsed: f32,
}

impl IdleRotation {
    pub fn new(config: &IdleConfig) -> Self {
        Self {
            speed: config.speed,
            amplitude: config.amplitude,
            elapsed: 0.0,
        }
    }

    /// Advance the sway clock. Frozen while the user manipulates the view.
    pub fn advance(&mut self, dt: f32, manipulating: bool) {
        if !manipulating && dt.is_finite() && dt > 0.0 {
            self.elapsed += dt;
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Current yaw in radians, bounded by the amplitude.
    pub fn yaw(&self) -> f32 {
        (self.elapsed * self.speed).sin() * self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sway_stays_within_amplitude() {
        let mut idle = IdleRotation::new(&IdleConfig::default());
        for _ in 0..2000 {
            idle.advance(0.05, false);
            assert!(idle.yaw().abs() <= 0.15 + 1e-6);
        }
    }

    #[test]
    fn frozen_while_manipulating() {
        let mut idle = IdleRotation::new(&IdleConfig::default());
        idle.advance(1.0, false);
        let yaw = idle.yaw();
        idle.advance(3.0, true);
        assert_eq!(idle.yaw(), yaw);
        assert_eq!(idle.elapsed(), 1.0);
    }

    #[test]
    fn ignores_bad_deltas() {
        let mut idle = IdleRotation::new(&IdleConfig::default());
        idle.advance(f32::NAN, false);
        idle.advance(-1.0, false);
        assert_eq!(idle.elapsed(), 0.0);
    }
}
