//! When to renew the access token.

/// Rule deciding whether a stored expiry is close enough to renew.
///
/// `now`, `expiry` and `leeway` are all whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReauthThreshold {
    /// Renew once `now >= expiry - leeway / divisor`.
    LeewayFraction { divisor: u32 },
    /// Renew once `now >= expiry + margin + leeway`, i.e.
    /// `expiry <= now - margin - leeway`.
    FixedMargin { margin_secs: u64 },
}

impl Default for ReauthThreshold {
    fn default() -> Self {
        Self::LeewayFraction { divisor: 3 }
    }
}

impl ReauthThreshold {
    pub fn fraction(divisor: u32) -> Self {
        Self::LeewayFraction { divisor }
    }

    pub fn margin(margin_secs: u64) -> Self {
        Self::FixedMargin { margin_secs }
    }

    pub fn should_renew(&self, now: i64, expiry: i64, leeway: i64) -> bool {
        match *self {
            Self::LeewayFraction { divisor } => {
                // expiry <= now + leeway / d, kept exact for leeways not divisible by d
                let d = i128::from(divisor.max(1));
                (i128::from(expiry) - i128::from(now)) * d <= i128::from(leeway)
            }
            Self::FixedMargin { margin_secs } => {
                i128::from(expiry) <= i128::from(now) - i128::from(margin_secs) - i128::from(leeway)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_boundary() {
        let t = ReauthThreshold::default();
        // now + 30/3 = now + 10
        assert!(t.should_renew(1_000, 1_009, 30));
        assert!(t.should_renew(1_000, 1_010, 30), "now == expiry - leeway/3 renews");
        assert!(!t.should_renew(1_000, 1_011, 30));
        assert!(!t.should_renew(1_000, 1_500, 30));
    }

    #[test]
    fn test_fraction_uses_exact_division() {
        let t = ReauthThreshold::fraction(3);
        // now + 10/3 = now + 3.33..
        assert!(t.should_renew(0, 3, 10));
        assert!(!t.should_renew(0, 4, 10));
    }

    #[test]
    fn test_fraction_zero_leeway_renews_at_expiry() {
        let t = ReauthThreshold::default();
        assert!(t.should_renew(1_000, 1_000, 0), "now == expiry renews");
        assert!(t.should_renew(1_000, 999, 0));
        assert!(!t.should_renew(1_000, 1_001, 0));
    }

    #[test]
    fn test_zero_divisor_behaves_like_one() {
        let t = ReauthThreshold::fraction(0);
        assert!(t.should_renew(0, 30, 30));
        assert!(!t.should_renew(0, 31, 30));
    }

    #[test]
    fn test_fixed_margin() {
        let t = ReauthThreshold::margin(120);
        // renew once expiry <= now - 120 - 30 = 850
        assert!(t.should_renew(1_000, 849, 30));
        assert!(t.should_renew(1_000, 850, 30));
        assert!(!t.should_renew(1_000, 851, 30));
        assert!(!t.should_renew(1_000, 2_000, 30));
    }

    #[test]
    fn test_extreme_values_do_not_overflow() {
        let t = ReauthThreshold::fraction(u32::MAX);
        assert!(!t.should_renew(i64::MIN, i64::MAX, i64::MAX));
        assert!(!ReauthThreshold::margin(u64::MAX).should_renew(0, i64::MIN, i64::MAX));
    }
}
