use serde::{Deserialize, Serialize};

/// Easing curve for a tween's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    #[default]
    OutQuad,
}

impl Ease {
    /// Map linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// A relative animation: moves a value by `delta` over `duration` seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub delta: f32,
    pub duration: f32,
    pub ease: Ease,
    elapsed: f32,
    applied: f32,
}

impl Tween {
    pub fn new(delta: f32, duration: f32, ease: Ease) -> Self {
        Self {
            delta,
            duration,
            ease,
            elapsed: 0.0,
            applied: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            self.ease.apply(self.elapsed / self.duration)
        }
    }

    /// Step by `dt` and return the increment to add to the animated value.
    fn step(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration.max(0.0));
        let progress = self.progress();
        let increment = (progress - self.applied) * self.delta;
        self.applied = progress;
        increment
    }
}

/// Independent additive tweens on one value.
///
/// Every queued tween contributes its own increment; overlapping tweens sum.
#[derive(Debug, Clone, Default)]
pub struct TweenQueue {
    active: Vec<Tween>,
}

impl TweenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tween: Tween) {
        tracing::debug!(delta = tween.delta, duration = tween.duration, "tween queued");
        self.active.push(tween);
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Total increment produced over the next `dt` seconds. Finished tweens are dropped.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let total = self.active.iter_mut().map(|t| t.step(dt)).sum();
        self.active.retain(|t| !t.is_finished());
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::TAU;

    #[test]
    fn ease_out_starts_fast() {
        assert_eq!(Ease::OutQuad.apply(0.0), 0.0);
        assert_eq!(Ease::OutQuad.apply(1.0), 1.0);
        assert!(Ease::OutQuad.apply(0.5) > 0.5);
    }

    #[test]
    fn single_tween_reaches_delta() {
        let mut q = TweenQueue::new();
        q.push(Tween::new(TAU, 1.0, Ease::OutQuad));
        let mut total = 0.0;
        for _ in 0..20 {
            total += q.advance(0.1);
        }
        assert!((total - TAU).abs() < 1e-4);
        assert!(q.is_empty());
    }

    #[test]
    fn overlapping_tweens_sum() {
        let mut q = TweenQueue::new();
        q.push(Tween::new(TAU, 1.0, Ease::OutQuad));
        let mut total = q.advance(0.5);
        q.push(Tween::new(TAU, 1.0, Ease::OutQuad));
        assert_eq!(q.len(), 2);
        for _ in 0..30 {
            total += q.advance(0.05);
        }
        assert!((total - 2.0 * TAU).abs() < 1e-4);
    }

    #[test]
    fn zero_duration_applies_immediately() {
        let mut q = TweenQueue::new();
        q.push(Tween::new(1.0, 0.0, Ease::Linear));
        assert!((q.advance(0.016) - 1.0).abs() < 1e-6);
        assert!(q.is_empty());
    }
}
