//! Staggered spawn scheduling
//!
//! The schedule is a plain value owned by the particle system. Rebuilding
//! the system replaces the schedule wholesale, so a stale timer can never
//! keep incrementing the bound for a pool that no longer exists.

/// Decides how many leading pool slots are eligible for simulation.
///
/// The bound is monotonically non-decreasing within a generation and
/// never exceeds the pool size.
#[derive(Clone, Debug)]
pub struct SpawnSchedule {
    pool_size: usize,
    bound: usize,
    timer: Option<StaggerTimer>,
}

#[derive(Clone, Debug)]
struct StaggerTimer {
    /// Timestamp (ms) of the next admission
    next_due: f64,
    /// Interval between admissions (ms)
    interval_ms: f64,
}

impl SpawnSchedule {
    /// All slots active from the start.
    pub fn immediate(pool_size: usize) -> Self {
        Self {
            pool_size,
            bound: pool_size,
            timer: None,
        }
    }

    /// No slots active yet; one admitted per interval as time advances.
    pub fn staggered(pool_size: usize, interval_ms: f64, now: f64) -> Self {
        Self {
            pool_size,
            bound: 0,
            timer: Some(StaggerTimer {
                next_due: now + interval_ms,
                interval_ms,
            }),
        }
    }

    pub fn bound(&self) -> usize {
        self.bound
    }

    pub fn pool_size(&self) -> usize {
        self.pool_size
    }

    /// Admit any particles whose due time has passed, catching up if
    /// several intervals elapsed since the last call. Once the pool is
    /// full the timer state is dropped.
    pub fn advance(&mut self, now: f64) {
        let Some(timer) = &mut self.timer else {
            return;
        };

        while self.bound < self.pool_size && now >= timer.next_due {
            self.bound += 1;
            timer.next_due += timer.interval_ms;
        }

        if self.bound >= self.pool_size {
            self.timer = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn immediate_fills_instantly() {
        let schedule = SpawnSchedule::immediate(40);
        assert_eq!(schedule.bound(), 40);
    }

    #[test]
    fn staggered_starts_empty() {
        let schedule = SpawnSchedule::staggered(40, 200.0, 0.0);
        assert_eq!(schedule.bound(), 0);
    }

    #[test]
    fn staggered_admits_one_per_interval() {
        let mut schedule = SpawnSchedule::staggered(5, 100.0, 0.0);

        schedule.advance(50.0);
        assert_eq!(schedule.bound(), 0);
        schedule.advance(100.0);
        assert_eq!(schedule.bound(), 1);
        schedule.advance(250.0);
        assert_eq!(schedule.bound(), 2);
        schedule.advance(300.0);
        assert_eq!(schedule.bound(), 3);
    }

    #[test]
    fn staggered_catches_up_after_long_gap() {
        let mut schedule = SpawnSchedule::staggered(10, 100.0, 0.0);
        schedule.advance(350.0);
        assert_eq!(schedule.bound(), 3);
    }

    #[test]
    fn bound_is_monotonic_and_fills_within_n_intervals() {
        let pool = 8;
        let interval = 100.0;
        let mut schedule = SpawnSchedule::staggered(pool, interval, 0.0);

        let mut last = 0;
        let mut t = 0.0;
        while t <= pool as f64 * interval {
            schedule.advance(t);
            assert!(schedule.bound() >= last);
            assert!(schedule.bound() <= pool);
            last = schedule.bound();
            t += 30.0;
        }
        assert_eq!(schedule.bound(), pool);
    }

    #[test]
    fn full_schedule_stops_advancing() {
        let mut schedule = SpawnSchedule::staggered(2, 100.0, 0.0);
        schedule.advance(10_000.0);
        assert_eq!(schedule.bound(), 2);
        // Further time never pushes the bound past the pool size
        schedule.advance(1_000_000.0);
        assert_eq!(schedule.bound(), 2);
    }

    #[test]
    fn replacement_discards_old_progress() {
        let mut old = SpawnSchedule::staggered(10, 100.0, 0.0);
        old.advance(500.0);
        assert_eq!(old.bound(), 5);

        // A refresh builds a new schedule; the old one's timer is gone
        // with it and the new generation starts from zero.
        let fresh = SpawnSchedule::staggered(10, 100.0, 500.0);
        assert_eq!(fresh.bound(), 0);
    }
}
