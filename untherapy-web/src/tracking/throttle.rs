//! Frame throttle - analyze one frame out of N
//!
//! At a 60 Hz render loop, N = 3 gives ~20 analyses per second.

#[derive(Clone, Debug)]
pub struct FrameThrottle {
    every: u32,
    count: u64,
}

impl FrameThrottle {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            count: 0,
        }
    }

    /// Count a frame; true when this one should be analyzed
    pub fn admit(&mut self) -> bool {
        self.count += 1;
        self.count % self.every as u64 == 0
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

impl Default for FrameThrottle {
    fn default() -> Self {
        Self::new(3)
    }
}
