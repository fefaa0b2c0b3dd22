//! Frame-counted timers.  Everything in the game runs at a fixed frame rate, so
//! durations are plain frame counts.

/// Counts frames upward toward a threshold.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameTimer {
    count: u32,
    threshold: u32,
}

impl FrameTimer {
    pub fn new(threshold: u32) -> Self {
        Self { count: 0, threshold }
    }

    /// A timer that is already at its threshold (e.g. a loaded weapon).
    pub fn ready(threshold: u32) -> Self {
        Self { count: threshold, threshold }
    }

    pub fn tick(&mut self) {
        self.count = self.count.saturating_add(1);
    }

    pub fn is_ready(&self) -> bool {
        self.count >= self.threshold
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    /// Tick once; if the threshold is reached, reset and report it.
    pub fn cycle(&mut self) -> bool {
        self.tick();
        if self.is_ready() {
            self.reset();
            true
        } else {
            false
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// Counts frames down to zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn start(&mut self, frames: u32) {
        self.remaining = frames;
    }

    /// Decrement once.  Returns `true` on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_timer_cycles_on_threshold() {
        let mut t = FrameTimer::new(3);
        assert!(!t.cycle());
        assert!(!t.cycle());
        assert!(t.cycle());
        assert_eq!(t.count(), 0);
        assert!(!t.cycle());
    }

    #[test]
    fn ready_timer_starts_at_threshold() {
        let mut t = FrameTimer::ready(60);
        assert!(t.is_ready());
        t.reset();
        assert!(!t.is_ready());
        for _ in 0..60 {
            t.tick();
        }
        assert!(t.is_ready());
    }

    #[test]
    fn countdown_fires_once_at_zero() {
        let mut c = Countdown::default();
        c.start(2);
        assert!(!c.tick());
        assert!(c.tick());
        assert!(!c.is_running());
        assert!(!c.tick());
    }
}
