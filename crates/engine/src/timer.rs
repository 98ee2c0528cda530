//! Gravity timer
//!
//! Wall-clock stand-in for a repeating interval: the host feeds it elapsed time and it
//! reports how many gravity ticks fell due. Rearming discards any partial period.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GravityTimer {
    interval_ms: u32,
    elapsed_ms: u32,
    armed: bool,
}

impl GravityTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending period and start a fresh one. A zero interval counts as 1ms.
    pub fn arm(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.elapsed_ms = 0;
        self.armed = true;
    }

    pub fn disarm(&mut self) {
        self.elapsed_ms = 0;
        self.armed = false;
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Period of the last `arm` call (0 if never armed)
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Feed elapsed time; returns the number of ticks now due. The remainder carries over.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.armed {
            return 0;
        }

        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        let due = self.elapsed_ms / self.interval_ms;
        self.elapsed_ms %= self.interval_ms;
        due
    }

    /// Time until the next tick, or `None` while disarmed
    pub fn until_next_ms(&self) -> Option<u32> {
        if !self.armed {
            return None;
        }
        Some(self.interval_ms - self.elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disarmed_timer_never_fires() {
        let mut timer = GravityTimer::new();
        assert!(!timer.is_armed());
        assert_eq!(timer.advance(10_000), 0);
        assert_eq!(timer.until_next_ms(), None);
    }

    #[test]
    fn test_advance_carries_remainder() {
        let mut timer = GravityTimer::new();
        timer.arm(1000);

        assert_eq!(timer.advance(400), 0);
        assert_eq!(timer.until_next_ms(), Some(600));
        assert_eq!(timer.advance(700), 1);
        assert_eq!(timer.until_next_ms(), Some(900));
        assert_eq!(timer.advance(2900), 3);
        assert_eq!(timer.until_next_ms(), Some(1000));
    }

    #[test]
    fn test_rearm_discards_partial_period() {
        let mut timer = GravityTimer::new();
        timer.arm(1000);
        timer.advance(900);

        timer.arm(500);
        assert_eq!(timer.interval_ms(), 500);
        assert_eq!(timer.until_next_ms(), Some(500));
        assert_eq!(timer.advance(499), 0);
        assert_eq!(timer.advance(1), 1);
    }

    #[test]
    fn test_disarm_stops_ticks() {
        let mut timer = GravityTimer::new();
        timer.arm(100);
        timer.advance(50);
        timer.disarm();
        assert_eq!(timer.advance(1000), 0);

        timer.arm(100);
        assert_eq!(timer.advance(100), 1);
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut timer = GravityTimer::new();
        timer.arm(0);
        assert_eq!(timer.interval_ms(), 1);
        assert_eq!(timer.advance(5), 5);
    }
}
