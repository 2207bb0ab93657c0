#![forbid(unsafe_code)]

//! Markdown-ish text for tool results.

mod hierarchy;
mod records;
mod reports;
mod review;
mod update;

pub(crate) use hierarchy::render_hierarchy;
pub(crate) use records::{render_detail, render_list};
pub(crate) use reports::{render_milestones, render_orphans, render_validation};
pub(crate) use review::{render_reply, render_resolve, render_threads};
pub(crate) use update::{SyncOutcome, UpdateOutcome, render_update};

/// Day counts and percentages always show a fractional digit: `5.0`, `62.5`.
pub(crate) fn number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}


#[cfg(test)]
mod tests {
    use super::number;

    #[test]
    fn numbers_keep_one_decimal_for_whole_values() {
        assert_eq!(number(5.0), "5.0");
        assert_eq!(number(0.0), "0.0");
        assert_eq!(number(62.5), "62.5");
        assert_eq!(number(2.25), "2.25");
        assert_eq!(number(100.0), "100.0");
    }
}
