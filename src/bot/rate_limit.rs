use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Sliding-window command budget per Discord user.
pub(super) struct RateLimiter {
    commands: Mutex<HashMap<u64, Vec<Instant>>>,
    max_commands: usize,
    window: Duration,
}

impl RateLimiter {
    pub(super) fn new(max_commands: usize, window_secs: u64) -> Self {
        Self {
            commands: Mutex::new(HashMap::new()),
            max_commands,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Records a command for `user_id`; false once the window is full.
    /// A budget of zero disables limiting.
    pub(super) fn check(&self, user_id: u64) -> bool {
        if self.max_commands == 0 {
            return true;
        }
        let mut map = self.commands.lock().unwrap();
        let now = Instant::now();

        let timestamps = map.entry(user_id).or_default();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_commands {
            false
        } else {
            timestamps.push(now);
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_budget() {
        let limiter = RateLimiter::new(2, 60);
        assert!(limiter.check(1));
        assert!(limiter.check(1));
        assert!(!limiter.check(1));
    }

    #[test]
    fn test_users_are_independent() {
        let limiter = RateLimiter::new(1, 60);
        assert!(limiter.check(1));
        assert!(!limiter.check(1));
        assert!(limiter.check(2));
    }

    #[test]
    fn test_zero_budget_is_unlimited() {
        let limiter = RateLimiter::new(0, 60);
        for _ in 0..100 {
            assert!(limiter.check(1));
        }
    }

    #[test]
    fn test_window_expiry_frees_budget() {
        let limiter = RateLimiter::new(1, 0);
        assert!(limiter.check(1));
        // A zero-length window never retains earlier timestamps.
        assert!(limiter.check(1));
    }
}
