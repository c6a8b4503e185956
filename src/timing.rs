//! Fixed-rate scheduling of the independent update and draw ticks.

use std::time::Duration;

/// What should run this loop iteration.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Game logic must be updated.
    pub update: bool,
    /// Window must be drawn.
    pub draw: bool,
}

/// Decides when the update and the draw tick are due.
///
/// All times are milliseconds since the window started.
/// A rate of `0` means the tick runs on every loop iteration.
///
/// # Example
///
/// ```
/// use spritewin::timing::{Scheduler, Tick};
///
/// // Draw every 16ms, update every 10ms
/// let mut scheduler = Scheduler::new(16, 10);
///
/// assert_eq!(scheduler.poll(0), Tick { update: true, draw: true });
/// assert_eq!(scheduler.poll(5), Tick { update: false, draw: false });
/// assert_eq!(scheduler.next_wakeup(5), Some(10));
/// assert_eq!(scheduler.poll(10), Tick { update: true, draw: false });
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Milliseconds between draw ticks.
    draw_rate: u64,
    /// Milliseconds between update ticks.
    update_rate: u64,
    /// Time at which the next draw is due.
    next_draw: u64,
    /// Time at which the next update is due.
    next_update: u64,
}

impl Scheduler {
    /// Create a scheduler where both ticks are due immediately.
    #[inline]
    #[must_use]
    pub const fn new(draw_rate: u64, update_rate: u64) -> Self {
        Self {
            draw_rate,
            update_rate,
            next_draw: 0,
            next_update: 0,
        }
    }

    /// Determine which ticks are due and schedule the next ones.
    ///
    /// Update is evaluated before draw.
    ///
    /// A tick is due once `now` reaches its deadline, so a rate of `n` fires exactly every `n` milliseconds
    /// and the first ticks fire at `0`. Waiting until the deadline has passed would add a millisecond to every period.
    pub fn poll(&mut self, now: u64) -> Tick {
        let update = self.update_rate == 0 || now >= self.next_update;
        if update {
            self.next_update = now + self.update_rate;
        }

        let draw = self.draw_rate == 0 || now >= self.next_draw;
        if draw {
            self.next_draw = now + self.draw_rate;
        }

        Tick { update, draw }
    }

    /// Time at which the loop must wake up again.
    ///
    /// `None` when both rates are `0`, the loop shouldn't wait at all then.
    #[inline]
    #[must_use]
    pub fn next_wakeup(&self, now: u64) -> Option<u64> {
        if self.is_continuous() {
            return None;
        }

        // A continuous tick is always due right now
        let next_update = if self.update_rate == 0 {
            now
        } else {
            self.next_update
        };
        let next_draw = if self.draw_rate == 0 {
            now
        } else {
            self.next_draw
        };

        Some(next_update.min(next_draw))
    }

    /// How long the loop can sleep before the next tick is due.
    ///
    /// `None` when there's nothing to wait for.
    #[inline]
    #[must_use]
    pub fn sleep_duration(&self, now: u64) -> Option<Duration> {
        self.next_wakeup(now)
            .and_then(|wakeup| wakeup.checked_sub(now))
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis)
    }

    /// Whether both ticks run on every loop iteration.
    #[inline]
    #[must_use]
    pub const fn is_continuous(&self) -> bool {
        self.draw_rate == 0 && self.update_rate == 0
    }

    /// Force a draw on the next poll.
    #[inline]
    pub fn request_draw(&mut self) {
        self.next_draw = 0;
    }

    /// Milliseconds between draw ticks.
    #[inline]
    #[must_use]
    pub const fn draw_rate(&self) -> u64 {
        self.draw_rate
    }

    /// Set the milliseconds between draw ticks, `0` draws continuously.
    ///
    /// Takes effect after the currently scheduled draw.
    #[inline]
    pub fn set_draw_rate(&mut self, draw_rate: u64) {
        self.draw_rate = draw_rate;
    }

    /// Milliseconds between update ticks.
    #[inline]
    #[must_use]
    pub const fn update_rate(&self) -> u64 {
        self.update_rate
    }

    /// Set the milliseconds between update ticks, `0` updates continuously.
    ///
    /// Takes effect after the currently scheduled update.
    #[inline]
    pub fn set_update_rate(&mut self, update_rate: u64) {
        self.update_rate = update_rate;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Scheduler, Tick};

    const BOTH: Tick = Tick {
        update: true,
        draw: true,
    };
    const NONE: Tick = Tick {
        update: false,
        draw: false,
    };

    #[test]
    fn continuous_always_fires() {
        let mut scheduler = Scheduler::new(0, 0);

        for now in [0, 0, 1, 1, 100] {
            assert_eq!(scheduler.poll(now), BOTH);
        }

        assert!(scheduler.is_continuous());
        assert_eq!(scheduler.next_wakeup(100), None);
        assert_eq!(scheduler.sleep_duration(100), None);
    }

    #[test]
    fn independent_rates() {
        let mut scheduler = Scheduler::new(30, 10);

        let mut updates = 0;
        let mut draws = 0;
        for now in 0..=60 {
            let tick = scheduler.poll(now);
            updates += u32::from(tick.update);
            draws += u32::from(tick.draw);
        }

        // 0, 10, .., 60
        assert_eq!(updates, 7);
        // 0, 30, 60
        assert_eq!(draws, 3);
    }

    #[test]
    fn late_poll_fires_once_and_reschedules_from_now() {
        let mut scheduler = Scheduler::new(10, 10);
        assert_eq!(scheduler.poll(0), BOTH);

        // Way too late, but only a single tick is executed
        assert_eq!(scheduler.poll(55), BOTH);
        assert_eq!(scheduler.poll(56), NONE);
        assert_eq!(scheduler.next_wakeup(56), Some(65));
    }

    #[test]
    fn wakeup_is_earliest_deadline() {
        let mut scheduler = Scheduler::new(16, 50);
        scheduler.poll(0);

        assert_eq!(scheduler.next_wakeup(1), Some(16));
        assert_eq!(scheduler.sleep_duration(1), Some(Duration::from_millis(15)));

        // Overdue means no sleeping
        assert_eq!(scheduler.sleep_duration(20), None);
    }

    #[test]
    fn one_continuous_rate_never_sleeps() {
        let mut scheduler = Scheduler::new(0, 100);
        scheduler.poll(0);

        assert_eq!(scheduler.poll(1), Tick {
            update: false,
            draw: true
        });
        assert_eq!(scheduler.next_wakeup(1), Some(1));
        assert_eq!(scheduler.sleep_duration(1), None);
    }

    #[test]
    fn request_draw() {
        let mut scheduler = Scheduler::new(1000, 1000);
        scheduler.poll(0);
        assert_eq!(scheduler.poll(1), NONE);

        scheduler.request_draw();
        assert_eq!(scheduler.poll(2), Tick {
            update: false,
            draw: true
        });
        assert_eq!(scheduler.poll(3), NONE);
    }

    #[test]
    fn changing_rates() {
        let mut scheduler = Scheduler::new(10, 10);
        scheduler.poll(0);

        scheduler.set_update_rate(0);
        assert_eq!(scheduler.update_rate(), 0);
        assert!(scheduler.poll(1).update);

        scheduler.set_draw_rate(0);
        assert!(scheduler.is_continuous());
        assert!(scheduler.poll(2).draw);
    }
}
