//! Design Generation Seam
//!
//! "Generate AI Design" talks to a `DesignGenerator`. No real service exists:
//! the shipped `UnavailableGenerator` answers every request, after a short
//! delay, with a limit-exceeded error. The app polls the pending request from
//! its frame loop.

use image::RgbaImage;

use super::error::{StudioError, StudioResult};

/// A service that turns a prompt into artwork.
pub trait DesignGenerator {
    /// Start a request at session time `now` (seconds).
    fn request(&mut self, prompt: &str, now: f64);

    /// Poll the pending request. `None` while nothing has resolved.
    fn poll(&mut self, now: f64) -> Option<StudioResult<RgbaImage>>;

    fn is_pending(&self) -> bool;
}

/// Placeholder that always fails with [`StudioError::GenerationLimit`].
#[derive(Debug)]
pub struct UnavailableGenerator {
    delay: f64,
    pending_since: Option<f64>,
}

impl UnavailableGenerator {
    pub fn new(delay_secs: f32) -> Self {
        Self {
            delay: delay_secs as f64,
            pending_since: None,
        }
    }
}

impl DesignGenerator for UnavailableGenerator {
    fn request(&mut self, prompt: &str, now: f64) {
        if self.pending_since.is_some() {
            tracing::debug!("generation request superseded");
        }
        tracing::info!(prompt_len = prompt.len(), "generation requested");
        self.pending_since = Some(now);
    }

    fn poll(&mut self, now: f64) -> Option<StudioResult<RgbaImage>> {
        let started = self.pending_since?;
        if now - started < self.delay {
            return None;
        }
        self.pending_since = None;
        Some(Err(StudioError::GenerationLimit))
    }

    fn is_pending(&self) -> bool {
        self.pending_since.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_generator_yields_nothing() {
        let mut generator = UnavailableGenerator::new(1.5);
        assert!(generator.poll(100.0).is_none());
        assert!(!generator.is_pending());
    }

    #[test]
    fn request_fails_after_delay() {
        let mut generator = UnavailableGenerator::new(1.5);
        generator.request("a cat in sunglasses", 2.0);
        assert!(generator.poll(3.0).is_none());
        assert!(generator.is_pending());
        let result = generator.poll(3.5).unwrap();
        assert!(matches!(result, Err(StudioError::GenerationLimit)));
        assert!(!generator.is_pending());
        assert!(generator.poll(10.0).is_none());
    }

    #[test]
    fn new_request_restarts_the_delay() {
        let mut generator = UnavailableGenerator::new(1.0);
        generator.request("first", 0.0);
        generator.request("second", 0.8);
        assert!(generator.poll(1.2).is_none());
        assert!(generator.poll(1.8).is_some());
    }
}
