//! Workforce sizing.
//!
//! Chooses a crew size and a project length in days from the total work
//! hours and the daily capacity.
//!
//! # Staffing Rule
//!
//! | Project days | Crew size |
//! |--------------|-----------|
//! | 1..=4 | 1 |
//! | 5..=9 | 2 |
//! | 10..=14 | 3 |
//! | ... | `days / 5 + 1` |
//!
//! The inverse band of a crew of `W` workers is `[(W-1)*5, W*5-1]` days,
//! except for the solo crew whose band is `[1, 4]`.

use tracing::debug;

use crate::policy::{DAYS_PER_EXTRA_WORKER, MAX_CREW_SIZE, SOLO_MAX_DAYS};

/// Tolerance for floating-point noise before rounding days up.
const DAY_EPSILON: f64 = 1e-9;

/// Recommended crew size for a project of `days` days.
pub fn staffing_rule(days: i64) -> usize {
    if days <= SOLO_MAX_DAYS {
        1
    } else {
        (days / DAYS_PER_EXTRA_WORKER) as usize + 1
    }
}

/// Inclusive range of project days a crew of `workers` is meant for.
pub fn staffing_band(workers: usize) -> (i64, i64) {
    let w = workers.max(1) as i64;
    if w == 1 {
        (1, SOLO_MAX_DAYS)
    } else {
        ((w - 1) * DAYS_PER_EXTRA_WORKER, w * DAYS_PER_EXTRA_WORKER - 1)
    }
}

/// Days needed to cover `total_hours` with a crew of `workers`.
pub fn required_days(total_hours: f64, workers: usize, daily_hours: f64) -> i64 {
    if total_hours <= 0.0 {
        return 0;
    }
    let capacity = workers.max(1) as f64 * daily_hours;
    ((total_hours / capacity) - DAY_EPSILON).ceil().max(1.0) as i64
}

/// A proposed crew and project length.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkforcePlan {
    pub workers: usize,
    pub days: i64,
    /// Average work hours each crew member receives.
    pub hours_per_worker: f64,
    /// Human-readable decision trace.
    pub reasoning: Vec<String>,
}

/// Crew-size search.
///
/// # Example
/// ```
/// use u_crewplan::staffing::WorkforceSolver;
///
/// let solver = WorkforceSolver::new(8.0, 8.0);
/// let plan = solver.solve_parallel(16.0, 2);
/// assert_eq!((plan.workers, plan.days), (1, 2));
/// ```
#[derive(Debug, Clone)]
pub struct WorkforceSolver {
    daily_hours: f64,
    min_hours_per_worker: f64,
    max_crew: usize,
}

impl WorkforceSolver {
    pub fn new(daily_hours: f64, min_hours_per_worker: f64) -> Self {
        Self {
            daily_hours,
            min_hours_per_worker,
            max_crew: MAX_CREW_SIZE,
        }
    }

    /// Caps the crew size considered by the search.
    pub fn with_max_crew(mut self, max_crew: usize) -> Self {
        self.max_crew = max_crew.max(1);
        self
    }

    /// Solves for sequential mode (`parallel_rooms = None`) or for
    /// parallel mode over the given number of rooms.
    pub fn solve(&self, total_hours: f64, parallel_rooms: Option<usize>) -> WorkforcePlan {
        match parallel_rooms {
            Some(rooms) => self.solve_parallel(total_hours, rooms),
            None => self.solve_sequential(total_hours),
        }
    }

    /// Sequential mode: one worker active at a time, crew rotates.
    pub fn solve_sequential(&self, total_hours: f64) -> WorkforcePlan {
        let days = required_days(total_hours, 1, self.daily_hours);
        let mut reasoning = vec![format!(
            "{total_hours:.1} h at {:.1} h/day → {days} day(s)",
            self.daily_hours
        )];

        let mut workers = staffing_rule(days).min(self.max_crew);
        reasoning.push(format!("Staffing rule for {days} day(s): {workers} worker(s)"));

        while workers > 1 && total_hours / (workers as f64) < self.min_hours_per_worker {
            reasoning.push(format!(
                "{workers} worker(s) would get {:.1} h each (< {:.1} h minimum)",
                total_hours / workers as f64,
                self.min_hours_per_worker
            ));
            workers -= 1;
        }

        debug!(total_hours, days, workers, "sequential workforce plan");
        WorkforcePlan {
            workers,
            days,
            hours_per_worker: total_hours / workers as f64,
            reasoning,
        }
    }

    /// Parallel mode: workers occupy distinct rooms concurrently.
    pub fn solve_parallel(&self, total_hours: f64, rooms: usize) -> WorkforcePlan {
        let limit = self.max_crew.min(rooms).max(1);
        let mut reasoning = vec![format!(
            "{total_hours:.1} h over {rooms} room(s); trying up to {limit} worker(s)"
        )];
        let mut fallback: Option<(usize, i64)> = None;

        for workers in 1..=limit {
            let days = required_days(total_hours, workers, self.daily_hours);
            let hours_per_worker = total_hours / workers as f64;
            if workers > 1 && hours_per_worker < self.min_hours_per_worker {
                reasoning.push(format!(
                    "{workers} worker(s): {hours_per_worker:.1} h each is below the {:.1} h minimum",
                    self.min_hours_per_worker
                ));
                break;
            }

            let (lo, hi) = staffing_band(workers);
            if (lo..=hi).contains(&days) {
                reasoning.push(format!(
                    "{workers} worker(s): {days} day(s) within band [{lo}, {hi}]"
                ));
                debug!(total_hours, days, workers, "parallel workforce plan");
                return WorkforcePlan {
                    workers,
                    days,
                    hours_per_worker,
                    reasoning,
                };
            }

            reasoning.push(format!(
                "{workers} worker(s): {days} day(s) outside band [{lo}, {hi}]"
            ));
            if days >= lo {
                fallback = Some((workers, days));
            }
        }

        let (workers, days) =
            fallback.unwrap_or_else(|| (1, required_days(total_hours, 1, self.daily_hours)));
        reasoning.push(format!(
            "No crew fits its band; falling back to {workers} worker(s) for {days} day(s)"
        ));
        debug!(total_hours, days, workers, "parallel workforce fallback");
        WorkforcePlan {
            workers,
            days,
            hours_per_worker: total_hours / workers as f64,
            reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staffing_rule() {
        assert_eq!(staffing_rule(1), 1);
        assert_eq!(staffing_rule(4), 1);
        assert_eq!(staffing_rule(5), 2);
        assert_eq!(staffing_rule(9), 2);
        assert_eq!(staffing_rule(10), 3);
        assert_eq!(staffing_rule(23), 5);
    }

    #[test]
    fn test_band_inverts_rule() {
        assert_eq!(staffing_band(1), (1, 4));
        assert_eq!(staffing_band(2), (5, 9));
        assert_eq!(staffing_band(3), (10, 14));
        for w in 1..=6 {
            let (lo, hi) = staffing_band(w);
            assert_eq!(staffing_rule(lo), w);
            assert_eq!(staffing_rule(hi), w);
        }
    }

    #[test]
    fn test_required_days_ceil() {
        assert_eq!(required_days(16.0, 1, 8.0), 2);
        assert_eq!(required_days(16.5, 1, 8.0), 3);
        assert_eq!(required_days(16.0, 2, 8.0), 1);
        // 0.1 * 3 * 8 style float noise must not add a day.
        assert_eq!(required_days(2.4000000000000004, 1, 0.8), 3);
        assert_eq!(required_days(0.0, 1, 8.0), 0);
    }

    #[test]
    fn test_sequential_rule() {
        let solver = WorkforceSolver::new(8.0, 8.0);
        let plan = solver.solve_sequential(40.0);
        assert_eq!(plan.days, 5);
        assert_eq!(plan.workers, 2);
        assert!((plan.hours_per_worker - 20.0).abs() < 1e-9);
        assert!(!plan.reasoning.is_empty());
    }

    #[test]
    fn test_sequential_min_hours_clamp() {
        let solver = WorkforceSolver::new(8.0, 25.0);
        let plan = solver.solve_sequential(40.0);
        assert_eq!(plan.days, 5);
        assert_eq!(plan.workers, 1);

        let solver = WorkforceSolver::new(8.0, 6.0);
        assert_eq!(solver.solve_sequential(10.0).workers, 1);
    }

    #[test]
    fn test_sequential_max_crew() {
        let solver = WorkforceSolver::new(8.0, 0.0).with_max_crew(2);
        let plan = solver.solve_sequential(200.0);
        assert_eq!(plan.days, 25);
        assert_eq!(plan.workers, 2);
    }

    #[test]
    fn test_parallel_small_job_stays_solo() {
        let solver = WorkforceSolver::new(8.0, 8.0);
        let plan = solver.solve_parallel(16.0, 2);
        assert_eq!((plan.workers, plan.days), (1, 2));
    }

    #[test]
    fn test_parallel_accepts_band() {
        let solver = WorkforceSolver::new(8.0, 8.0);
        let plan = solver.solve_parallel(80.0, 2);
        assert_eq!((plan.workers, plan.days), (2, 5));
        assert_eq!(solver.solve(80.0, Some(2)), plan);
    }

    #[test]
    fn test_parallel_fallback() {
        // w=1 needs 5 days (outside [1,4]); w=2 needs 3 days (below [5,9]).
        let solver = WorkforceSolver::new(8.0, 8.0);
        let plan = solver.solve_parallel(40.0, 2);
        assert_eq!((plan.workers, plan.days), (1, 5));
        assert!(plan.reasoning.last().unwrap().contains("falling back"));
    }

    #[test]
    fn test_parallel_bounded_by_rooms() {
        let solver = WorkforceSolver::new(8.0, 8.0);
        // 3 workers would fit [10,14] with 120 h, but there is one room.
        let plan = solver.solve_parallel(120.0, 1);
        assert_eq!(plan.workers, 1);
        assert_eq!(plan.days, 15);
    }

    #[test]
    fn test_parallel_min_hours_stops_search() {
        let solver = WorkforceSolver::new(8.0, 50.0);
        let plan = solver.solve_parallel(80.0, 4);
        assert_eq!(plan.workers, 1);
        assert_eq!(plan.days, 10);
    }
}
