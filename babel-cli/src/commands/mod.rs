//! CLI command implementations.

pub mod account;
pub mod history;
pub mod session;
pub mod translate;

use chrono::{DateTime, Utc};

/// Render a Unix timestamp with how far away it is.
pub(crate) fn describe_expiry(access_exp: i64, now: i64) -> String {
    let when = DateTime::<Utc>::from_timestamp(access_exp, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| access_exp.to_string());

    let delta = access_exp - now;
    if delta >= 0 {
        format!("{} (in {})", when, human_duration(delta))
    } else {
        format!("{} ({} ago)", when, human_duration(-delta))
    }
}

fn human_duration(secs: i64) -> String {
    match secs {
        s if s < 60 => format!("{}s", s),
        s if s < 3600 => format!("{}m {}s", s / 60, s % 60),
        s => format!("{}h {}m", s / 3600, (s % 3600) / 60),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_expiry() {
        assert_eq!(describe_expiry(3_600, 3_000), "1970-01-01 01:00:00 UTC (in 10m 0s)");
        assert_eq!(describe_expiry(0, 30), "1970-01-01 00:00:00 UTC (30s ago)");
        assert!(describe_expiry(7_200 + 3_660, 0).ends_with("(in 3h 1m)"));
    }
}
