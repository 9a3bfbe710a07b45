//! Blink schedule - random 3-5 s intervals, eyes shut for 150 ms

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

pub const BLINK_DURATION_MS: f64 = 150.0;

const MIN_INTERVAL_MS: f64 = 3000.0;
const MAX_INTERVAL_MS: f64 = 5000.0;

#[derive(Clone, Debug)]
pub struct BlinkSchedule {
    rng: SmallRng,
    /// When the current blink started; 0 means never
    blink_timer: f64,
    next_blink: Option<f64>,
}

impl BlinkSchedule {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            blink_timer: 0.0,
            next_blink: None,
        }
    }

    fn interval(&mut self) -> f64 {
        self.rng.gen_range(MIN_INTERVAL_MS..MAX_INTERVAL_MS)
    }

    /// Advance to `now_ms`. Returns true when a blink starts on this tick.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        match self.next_blink {
            None => {
                // First tick only arms the timer
                let next = now_ms + self.interval();
                self.next_blink = Some(next);
                false
            }
            Some(next) if now_ms >= next => {
                self.blink_timer = now_ms;
                let next = now_ms + self.interval();
                self.next_blink = Some(next);
                true
            }
            Some(_) => false,
        }
    }

    pub fn blink_timer(&self) -> f64 {
        self.blink_timer
    }

    pub fn next_blink(&self) -> Option<f64> {
        self.next_blink
    }

    pub fn is_blinking(&self, now_ms: f64) -> bool {
        self.blink_timer > 0.0 && now_ms - self.blink_timer < BLINK_DURATION_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_tick_only_schedules() {
        let mut blink = BlinkSchedule::new(7);
        assert!(!blink.tick(1_000.0));
        assert!(!blink.is_blinking(1_000.0));
        let next = blink.next_blink().unwrap();
        assert!((4_000.0..6_000.0).contains(&next));
    }

    #[test]
    fn blinks_when_due_and_reschedules() {
        let mut blink = BlinkSchedule::new(7);
        blink.tick(0.0);
        let due = blink.next_blink().unwrap();

        assert!(!blink.tick(due - 1.0));
        assert!(blink.tick(due));
        assert_eq!(blink.blink_timer(), due);

        let next = blink.next_blink().unwrap();
        assert!(next - due >= 3_000.0 && next - due < 5_000.0);
    }

    proptest! {
        #[test]
        fn eyes_shut_only_inside_window(offset in 0.0f64..1_000.0) {
            let mut blink = BlinkSchedule::new(1);
            blink.tick(0.0);
            let t = blink.next_blink().unwrap();
            blink.tick(t);
            prop_assert_eq!(blink.is_blinking(t + offset), offset < BLINK_DURATION_MS);
        }
    }
}
