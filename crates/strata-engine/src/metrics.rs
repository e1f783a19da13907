//! Run-level statistics reported by the coordinator.

use std::fmt;
use std::time::Duration;

/// Timing and bookkeeping for one coordinator run.
///
/// Durations are wall-clock. `dispatch_time` covers extracting and sending
/// every block, `collect_time` covers receiving and merging the results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunReport {
    /// Timesteps requested by the configuration.
    pub timesteps: u64,
    /// Worker processes taking part.
    pub workers: usize,
    /// Rounds completed.
    pub rounds: u64,
    /// Total wall-clock time of the run.
    pub elapsed: Duration,
    /// Time spent in the dispatch phase, summed over rounds.
    pub dispatch_time: Duration,
    /// Time spent in the collect phase, summed over rounds.
    pub collect_time: Duration,
    /// Snapshots handed to the sink successfully.
    pub snapshots_written: u64,
    /// Snapshots the sink failed to persist.
    pub snapshot_failures: u64,
    /// Sum over rounds of workers sent the no-work sentinel.
    pub idle_worker_rounds: u64,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} rounds on {} workers in {} ms (dispatch {} ms, collect {} ms), \
             {} snapshots written, {} failed, {} idle worker-rounds",
            self.rounds,
            self.timesteps,
            self.workers,
            self.elapsed.as_millis(),
            self.dispatch_time.as_millis(),
            self.collect_time.as_millis(),
            self.snapshots_written,
            self.snapshot_failures,
            self.idle_worker_rounds,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_report_is_zero() {
        let r = RunReport::default();
        assert_eq!(r.rounds, 0);
        assert_eq!(r.elapsed, Duration::ZERO);
        assert_eq!(r.snapshot_failures, 0);
    }

    #[test]
    fn display_summarises_counts() {
        let r = RunReport {
            timesteps: 10,
            workers: 3,
            rounds: 10,
            elapsed: Duration::from_millis(42),
            snapshots_written: 12,
            ..RunReport::default()
        };
        let s = r.to_string();
        assert!(s.starts_with("10/10 rounds on 3 workers in 42 ms"));
        assert!(s.contains("12 snapshots written, 0 failed"));
    }
}
