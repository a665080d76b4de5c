//! Planner settings.
//!
//! Company settings consumed by the planner. All fields have defaults from
//! the [`policy`](crate::policy) table, so a partial TOML file (or none)
//! is valid:
//!
//! ```
//! use u_crewplan::config::PlannerSettings;
//!
//! let settings = PlannerSettings::from_toml_str(
//!     "daily_hours = 7.5\nallow_parallel_rooms = true\n",
//! ).unwrap();
//! assert_eq!(settings.capacity().regular, 450);
//! assert!(settings.allow_parallel_rooms);
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PlanningError;
use crate::policy::{
    DEFAULT_DAILY_HOURS, DEFAULT_MAX_OVERTIME_PERCENT, DEFAULT_MIN_HOURS_PER_WORKER,
    DEFAULT_MIN_SPLIT_MINUTES, DEFAULT_SITE_SETUP_MINUTES, DEFAULT_SITE_TEARDOWN_MINUTES,
    MAX_CREW_SIZE, MAX_OVERNIGHT_DRYING_MINUTES, MAX_OVERTIME_PERCENT, MAX_SCHEDULER_ITERATIONS,
    OVERNIGHT_DRYING_MINUTES,
};

/// Settings for one planning run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Regular working hours per worker and day.
    pub daily_hours: f64,
    /// Overtime budget as a percentage of the regular day.
    pub max_overtime_percent: f64,
    /// Minimum hours of work each crew member must get.
    pub min_hours_per_worker: f64,
    pub site_setup_minutes: i64,
    pub site_teardown_minutes: i64,
    /// Client approved several workers in different rooms at once.
    pub allow_parallel_rooms: bool,
    /// Curing time credited per night.
    pub overnight_drying_minutes: i64,
    /// Shortest split segment started mid-day.
    pub min_split_minutes: i64,
    /// Upper bound for the crew-size search.
    pub max_crew_size: usize,
    /// Scheduler loop safety cap.
    pub max_iterations: usize,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            daily_hours: DEFAULT_DAILY_HOURS,
            max_overtime_percent: DEFAULT_MAX_OVERTIME_PERCENT,
            min_hours_per_worker: DEFAULT_MIN_HOURS_PER_WORKER,
            site_setup_minutes: DEFAULT_SITE_SETUP_MINUTES,
            site_teardown_minutes: DEFAULT_SITE_TEARDOWN_MINUTES,
            allow_parallel_rooms: false,
            overnight_drying_minutes: OVERNIGHT_DRYING_MINUTES,
            min_split_minutes: DEFAULT_MIN_SPLIT_MINUTES,
            max_crew_size: MAX_CREW_SIZE,
            max_iterations: MAX_SCHEDULER_ITERATIONS,
        }
    }
}

impl PlannerSettings {
    /// Parses and validates settings from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, PlanningError> {
        let settings: Self = toml::from_str(source)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reads, parses and validates a TOML settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PlanningError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| PlanningError::SettingsRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Range-checks every field.
    pub fn validate(&self) -> Result<(), PlanningError> {
        let invalid = |msg: String| Err(PlanningError::InvalidSettings(msg));
        if !(self.daily_hours.is_finite() && self.daily_hours > 0.0 && self.daily_hours <= 24.0) {
            return invalid(format!("daily_hours must be in (0, 24], got {}", self.daily_hours));
        }
        if !(self.max_overtime_percent.is_finite()
            && (0.0..=MAX_OVERTIME_PERCENT).contains(&self.max_overtime_percent))
        {
            return invalid(format!(
                "max_overtime_percent must be in [0, {MAX_OVERTIME_PERCENT}], got {}",
                self.max_overtime_percent
            ));
        }
        if !(self.min_hours_per_worker.is_finite() && self.min_hours_per_worker >= 0.0) {
            return invalid(format!(
                "min_hours_per_worker must be >= 0, got {}",
                self.min_hours_per_worker
            ));
        }
        let capacity = self.capacity();
        if capacity.regular < 1 {
            return invalid(format!(
                "daily_hours {} rounds to less than one minute",
                self.daily_hours
            ));
        }
        if self.site_setup_minutes < 0 || self.site_teardown_minutes < 0 {
            return invalid("site setup/teardown minutes must be >= 0".to_string());
        }
        if self.site_setup_minutes > capacity.with_overtime
            || self.site_teardown_minutes > capacity.with_overtime
        {
            return invalid(format!(
                "site setup/teardown must fit into one day ({} min)",
                capacity.with_overtime
            ));
        }
        if !(0..=MAX_OVERNIGHT_DRYING_MINUTES).contains(&self.overnight_drying_minutes) {
            return invalid(format!(
                "overnight_drying_minutes must be in [0, {MAX_OVERNIGHT_DRYING_MINUTES}], got {}",
                self.overnight_drying_minutes
            ));
        }
        if self.min_split_minutes < 0 {
            return invalid("min_split_minutes must be >= 0".to_string());
        }
        if self.max_crew_size == 0 {
            return invalid("max_crew_size must be at least 1".to_string());
        }
        if self.max_iterations == 0 {
            return invalid("max_iterations must be at least 1".to_string());
        }
        Ok(())
    }

    /// Daily capacity boundaries derived from these settings.
    pub fn capacity(&self) -> DayCapacity {
        DayCapacity::new(
            (self.daily_hours * 60.0).round() as i64,
            self.max_overtime_percent,
        )
    }

    pub fn with_daily_hours(mut self, hours: f64) -> Self {
        self.daily_hours = hours;
        self
    }

    pub fn with_overtime_percent(mut self, percent: f64) -> Self {
        self.max_overtime_percent = percent;
        self
    }

    pub fn with_min_hours_per_worker(mut self, hours: f64) -> Self {
        self.min_hours_per_worker = hours;
        self
    }

    /// Sets site setup and teardown durations.
    pub fn with_site_minutes(mut self, setup: i64, teardown: i64) -> Self {
        self.site_setup_minutes = setup;
        self.site_teardown_minutes = teardown;
        self
    }

    pub fn with_parallel_rooms(mut self, allow: bool) -> Self {
        self.allow_parallel_rooms = allow;
        self
    }

    pub fn with_min_split_minutes(mut self, minutes: i64) -> Self {
        self.min_split_minutes = minutes;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }
}

/// Capacity boundaries of one worker-day (minutes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCapacity {
    /// Regular working minutes.
    pub regular: i64,
    /// Regular minutes plus the overtime budget.
    pub with_overtime: i64,
}

impl DayCapacity {
    pub fn new(regular: i64, overtime_percent: f64) -> Self {
        let budget = (regular as f64 * overtime_percent / 100.0).floor() as i64;
        Self {
            regular,
            with_overtime: regular.saturating_add(budget.max(0)),
        }
    }

    /// Overtime minutes available beyond the regular day.
    pub fn overtime_budget(&self) -> i64 {
        self.with_overtime - self.regular
    }
}
