use std::time::{Duration, Instant};

/// Enforces a minimum interval between consecutive probes of one seed scan
pub struct RateLimiter {
    interval: Duration,
    last_request: Option<Instant>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: None,
        }
    }

    pub async fn wait(&mut self) {
        if self.interval.is_zero() {
            return;
        }

        if let Some(previous) = self.last_request {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                tokio::time::sleep(self.interval - elapsed).await;
            }
        }

        self.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_first_wait_is_immediate() {
        let mut limiter = RateLimiter::new(Duration::from_millis(200));
        let start = Instant::now();
        limiter.wait().await;
        assert!(start.elapsed() < Duration::from_millis(150));
    }

    #[tokio::test]
    async fn test_second_wait_honours_interval() {
        let mut limiter = RateLimiter::new(Duration::from_millis(100));
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_zero_interval_never_sleeps() {
        let mut limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..3 {
            limiter.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
        assert!(limiter.last_request.is_none());
    }
}
