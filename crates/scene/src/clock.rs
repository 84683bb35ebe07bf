/// Elapsed-time clock driven by frame deltas.
///
/// Time only advances through [`Clock::advance`], so tests and the render
/// loop see the same deterministic sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Clock {
    elapsed: f64,
    delta: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt` seconds. Negative deltas are ignored.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.delta = dt.max(0.0);
        self.elapsed += self.delta as f64;
        self.delta
    }

    /// Seconds since the clock started.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Delta of the last advance.
    pub fn delta(&self) -> f32 {
        self.delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates() {
        let mut c = Clock::new();
        c.advance(0.5);
        c.advance(0.25);
        assert!((c.elapsed() - 0.75).abs() < 1e-9);
        assert_eq!(c.delta(), 0.25);
        c.advance(-1.0);
        assert!((c.elapsed() - 0.75).abs() < 1e-9);
    }
}
