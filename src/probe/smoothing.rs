//! Exponential smoothing for jittery motion readings

use super::MotionVector;

/// Default smoothing factor for motion readings
pub const DEFAULT_MOTION_ALPHA: f32 = 0.2;

/// Exponential moving average over motion vectors.
///
/// `alpha` is the weight of the newest sample, clamped to `(0, 1]`.
#[derive(Debug, Clone)]
pub struct MotionSmoother {
    alpha: f32,
    current: Option<MotionVector>,
}

impl MotionSmoother {
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(f32::EPSILON, 1.0),
            current: None,
        }
    }

    /// Feed a raw sample, returning the smoothed value
    pub fn push(&mut self, sample: MotionVector) -> MotionVector {
        let next = match self.current {
            None => sample,
            Some(prev) => MotionVector {
                x: prev.x + self.alpha * (sample.x - prev.x),
                y: prev.y + self.alpha * (sample.y - prev.y),
                z: prev.z + self.alpha * (sample.z - prev.z),
            },
        };
        self.current = Some(next);
        next
    }

    pub fn current(&self) -> Option<MotionVector> {
        self.current
    }

    pub fn reset(&mut self) {
        self.current = None;
    }
}

impl Default for MotionSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_MOTION_ALPHA)
    }
}
