//! Derived metrics computed from raw broker counters.
//!
//! Everything here is pure: snapshot fields in, numbers out.

/// `load / total * 100` rounded to three decimals, `0` when `total` is zero.
pub fn percentage(load: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let pct = load as f64 / total as f64 * 100.0;
    // decimal rounding of the exact binary value, same as printing with {:.3}
    format!("{pct:.3}").parse().unwrap_or(pct)
}

/// `1` only for the exact aliveness status `"ok"`.
pub fn liveness_code(status: &str) -> i64 {
    match status {
        "ok" => 1,
        _ => 0,
    }
}

/// `1` when the lower-cased queue state contains any of the configured
/// (already lower-cased) healthy indicators.
pub fn queue_health_code(status: &str, healthy_states: &[String]) -> i64 {
    let status = status.to_lowercase();
    if healthy_states
        .iter()
        .any(|indicator| status.contains(indicator.as_str()))
    {
        1
    } else {
        0
    }
}

/// `1` when the node reports no network partitions.
///
/// NOTE: polarity is the reverse of what the `isPartition` metric name
/// suggests; kept as-is pending confirmation from dashboard owners.
pub fn partition_code(partitions: &[String]) -> i64 {
    match partitions.len() {
        0 => 1,
        _ => 0,
    }
}
