//! Work plan quality metrics (KPIs).
//!
//! Computes summary indicators from a finished [`WorkPlan`].
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total days | Days in the plan, including pure curing days |
//! | Worked minutes | Sum of work segment durations |
//! | Site minutes | Sum of setup/teardown durations |
//! | Overtime minutes | Minutes booked past the regular boundary |
//! | Avg Utilization | Mean utilization over worker-days with any booking |
//! | Split tasks | Tasks realized by more than one segment |
//! | Drying days | Days on which some curing lock was active |

use std::collections::{BTreeMap, BTreeSet};

use crate::config::DayCapacity;
use crate::models::WorkPlan;

/// Plan performance indicators. All times in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanKpi {
    pub total_days: usize,
    pub worked_minutes: i64,
    pub site_minutes: i64,
    pub overtime_minutes: i64,
    /// Booked minutes (work and site) per worker id.
    pub minutes_by_worker: BTreeMap<String, i64>,
    /// Mean utilization in percent of the regular day.
    pub avg_utilization_percent: f64,
    pub split_task_count: usize,
    pub drying_days: usize,
    /// Days without any segment.
    pub idle_days: usize,
}

impl PlanKpi {
    /// Computes KPIs for a plan under the given daily capacity.
    pub fn calculate(plan: &WorkPlan, capacity: DayCapacity) -> Self {
        let mut worked_minutes = 0;
        let mut site_minutes = 0;
        let mut overtime_minutes = 0;
        let mut minutes_by_worker: BTreeMap<String, i64> = BTreeMap::new();
        let mut segments_per_task: BTreeMap<&str, usize> = BTreeMap::new();

        for (_, segment) in plan.segments() {
            if segment.is_work() {
                worked_minutes += segment.duration_minutes;
                *segments_per_task.entry(segment.task_id.as_str()).or_default() += 1;
            } else {
                site_minutes += segment.duration_minutes;
            }
            overtime_minutes += segment.overtime_minutes(capacity.regular);
            *minutes_by_worker.entry(segment.worker_id.clone()).or_default() +=
                segment.duration_minutes;
        }

        let busy: Vec<f64> = plan
            .days
            .iter()
            .flat_map(|d| d.worker_stats.iter())
            .filter(|s| s.minutes_worked > 0)
            .map(|s| s.utilization_percent)
            .collect();
        let avg_utilization_percent = if busy.is_empty() {
            0.0
        } else {
            busy.iter().sum::<f64>() / busy.len() as f64
        };

        let drying_days = plan
            .days
            .iter()
            .filter(|d| !d.drying_snapshots.is_empty())
            .map(|d| d.day_number)
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            total_days: plan.days.len(),
            worked_minutes,
            site_minutes,
            overtime_minutes,
            minutes_by_worker,
            avg_utilization_percent,
            split_task_count: segments_per_task.values().filter(|&&n| n > 1).count(),
            drying_days,
            idle_days: plan.days.iter().filter(|d| d.is_idle()).count(),
        }
    }

    /// Whether the plan meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_days: usize, min_utilization_percent: f64) -> bool {
        self.total_days <= max_days && self.avg_utilization_percent >= min_utilization_percent
    }
}
