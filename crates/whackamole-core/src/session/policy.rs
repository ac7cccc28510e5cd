/// When to spawn a target and when an unaddressed one counts as missed,
/// given the published elapsed time and the current difficulty threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPolicy {
    /// Reaction grace period before the threshold.
    pub grace_ms: u64,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self { grace_ms: 50 }
    }
}

impl SpawnPolicy {
    pub fn new(grace_ms: u64) -> Self {
        Self { grace_ms }
    }

    pub fn should_spawn(&self, elapsed_ms: u64, threshold_ms: u64) -> bool {
        elapsed_ms.checked_rem(threshold_ms) == Some(0)
    }

    pub fn miss_due(&self, elapsed_ms: u64, threshold_ms: u64) -> bool {
        elapsed_ms > threshold_ms.saturating_sub(self.grace_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_on_multiples() {
        let policy = SpawnPolicy::default();
        assert!(policy.should_spawn(0, 1800));
        assert!(policy.should_spawn(1800, 1800));
        assert!(!policy.should_spawn(1750, 1800));
        assert!(!policy.should_spawn(100, 0));
    }

    #[test]
    fn miss_window_opens_after_grace() {
        let policy = SpawnPolicy::default();
        assert!(!policy.miss_due(1750, 1800));
        assert!(policy.miss_due(1760, 1800));
        assert!(policy.miss_due(1800, 1800));
        // Threshold inside the grace period: any non-zero elapsed is late.
        assert!(!policy.miss_due(0, 30));
        assert!(policy.miss_due(1, 30));
    }
}
