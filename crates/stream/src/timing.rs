use std::collections::VecDeque;
use std::time::Duration;

/// Rolling window of tick durations for instrumentation.
#[derive(Debug, Clone)]
pub struct TickTimer {
    samples: VecDeque<Duration>,
    capacity: usize,
}

impl TickTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record one sample, dropping the oldest once the window is full.
    pub fn record(&mut self, dt: Duration) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(dt);
    }

    pub fn count(&self) -> usize {
        self.samples.len()
    }

    pub fn average(&self) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        self.samples.iter().sum::<Duration>() / self.samples.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.samples.iter().copied().max().unwrap_or_default()
    }

    pub fn min(&self) -> Duration {
        self.samples.iter().copied().min().unwrap_or_default()
    }

    /// Nearest-rank percentile, `p` in `[0, 100]`.
    pub fn percentile(&self, p: f64) -> Duration {
        if self.samples.is_empty() {
            return Duration::ZERO;
        }
        let mut sorted: Vec<Duration> = self.samples.iter().copied().collect();
        sorted.sort_unstable();
        let rank = ((p.clamp(0.0, 100.0) / 100.0) * sorted.len() as f64).ceil() as usize;
        sorted[rank.saturating_sub(1).min(sorted.len() - 1)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = TickTimer::new(8);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.percentile(99.0), Duration::ZERO);
    }

    #[test]
    fn tracks_window_statistics() {
        let mut timer = TickTimer::new(4);
        for v in [10, 20, 30, 40] {
            timer.record(ms(v));
        }
        assert_eq!(timer.average(), ms(25));
        assert_eq!(timer.min(), ms(10));
        assert_eq!(timer.max(), ms(40));
        assert_eq!(timer.percentile(50.0), ms(20));
        assert_eq!(timer.percentile(100.0), ms(40));
    }

    #[test]
    fn oldest_sample_falls_out() {
        let mut timer = TickTimer::new(2);
        timer.record(ms(100));
        timer.record(ms(2));
        timer.record(ms(4));
        assert_eq!(timer.count(), 2);
        assert_eq!(timer.max(), ms(4));
        assert_eq!(timer.average(), ms(3));
    }
}
