#![forbid(unsafe_code)]

pub mod checks;
pub mod hierarchy;
pub mod milestones;
pub mod model;
pub mod orphans;
pub mod query;
pub mod validate;

#[cfg(test)]
pub(crate) mod fixtures;

pub mod progress {
    /// Completion percentage rounded to one decimal place.
    ///
    /// Returns `0.0` when there is no effort to complete.
    pub fn percent(completed: f64, total: f64) -> f64 {
        if total > 0.0 {
            round1(completed / total * 100.0)
        } else {
            0.0
        }
    }

    /// Rounds the stored binary value to one decimal, ties to even.
    pub fn round1(value: f64) -> f64 {
        format!("{value:.1}").parse().unwrap_or(value)
    }

}
