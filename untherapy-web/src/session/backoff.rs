//! Reconnect policy - linear backoff with a hard attempt cap

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 2000,
        }
    }
}

impl ReconnectPolicy {
    /// Delay before retry number `attempt` (1-based), `None` once exhausted
    pub fn delay_for(&self, attempt: u32) -> Option<u32> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        Some(self.base_delay_ms.saturating_mul(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_grow_linearly_then_stop() {
        let policy = ReconnectPolicy::default();
        let delays: Vec<Option<u32>> = (1..=6).map(|n| policy.delay_for(n)).collect();
        assert_eq!(
            delays,
            [Some(2000), Some(4000), Some(6000), Some(8000), Some(10000), None]
        );
    }

    #[test]
    fn zero_attempts_disables_retry() {
        let policy = ReconnectPolicy {
            max_attempts: 0,
            base_delay_ms: 2000,
        };
        assert_eq!(policy.delay_for(1), None);
    }
}
