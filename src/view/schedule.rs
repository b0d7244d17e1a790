//! Fixed-cadence polling timer driven by explicit time deltas.

/// Fires once whenever the accumulated time reaches the period.
///
/// On firing the accumulator restarts from zero rather than carrying the
/// remainder, so a long tick never produces more than one firing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalTimer {
    period: f64,
    elapsed: f64,
}

impl IntervalTimer {
    /// Create a timer with the given period in seconds (negative is treated as 0).
    pub fn new(period: f64) -> Self {
        Self {
            period: period.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advance by `delta` seconds. Returns true if the period elapsed.
    pub fn tick(&mut self, delta: f64) -> bool {
        self.elapsed += delta.max(0.0);
        if self.elapsed >= self.period {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    /// Restart the accumulator.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn set_period(&mut self, period: f64) {
        self.period = period.max(0.0);
    }

    #[inline]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Seconds accumulated since the last firing or reset.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_at_period() {
        let mut timer = IntervalTimer::new(0.5);
        assert!(!timer.tick(0.2));
        assert!(!timer.tick(0.2));
        assert!(timer.tick(0.2));
        assert_eq!(timer.elapsed(), 0.0);
    }

    #[test]
    fn test_large_delta_fires_once() {
        let mut timer = IntervalTimer::new(0.1);
        assert!(timer.tick(10.0));
        assert!(!timer.tick(0.05));
    }

    #[test]
    fn test_reset() {
        let mut timer = IntervalTimer::new(1.0);
        timer.tick(0.9);
        timer.reset();
        assert!(!timer.tick(0.5));
    }

    #[test]
    fn test_zero_period_fires_every_tick() {
        let mut timer = IntervalTimer::new(0.0);
        assert!(timer.tick(0.0));
        assert!(timer.tick(0.016));
    }
}
