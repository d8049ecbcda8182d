//! Completion percentage arithmetic
//!
//! Two formulas exist side by side. [`rounded_percentage`] is what gets
//! stored on an enrollment whenever a completion flag changes;
//! [`truncated_percentage`] is the integer figure reported for an
//! enrollment against its course's assignment count. They can disagree
//! (1 of 3 reads 33.33 versus 33).

/// `completed / total * 100` rounded to two decimals, halves to even.
/// Returns 0 when there is nothing to complete.
pub fn rounded_percentage(completed: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = f64::from(completed) * 100.0 / f64::from(total);
    (raw * 100.0).round_ties_even() / 100.0
}

/// `completed * 100 / total` with integer division, 0 when `total` is 0
pub fn truncated_percentage(completed: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    // u64 keeps completed * 100 from overflowing
    (u64::from(completed) * 100 / u64::from(total)) as u32
}
