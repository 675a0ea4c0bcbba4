//! Parsing of the expiry returned by login, register and reissue.

use chrono::DateTime;
use serde_json::Value;

/// Expiry and leeway handed out by the auth service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryGrant {
    /// Access-token expiry, Unix seconds.
    pub access_exp: i64,
    /// Renewal leeway in seconds, `0` when the server sent none.
    pub leeway: i64,
}

impl ExpiryGrant {
    /// Read `access_exp` and `leeway` from a response body.
    ///
    /// Returns `None` when `access_exp` is missing or unreadable.
    pub fn from_body(body: &Value) -> Option<Self> {
        let access_exp = body.get("access_exp").and_then(parse_access_exp)?;
        let leeway = body.get("leeway").map(parse_leeway).unwrap_or(0);
        Some(Self { access_exp, leeway })
    }
}

/// Normalise an `access_exp` value to Unix seconds.
///
/// Accepts an integer, a float, a numeric string, an HTTP date
/// (`"Sat, 18 Oct 2026 12:00:00 GMT"`) or an RFC 3339 timestamp.
pub fn parse_access_exp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(secs) = s.parse::<i64>() {
                return Some(secs);
            }
            if let Ok(secs) = s.parse::<f64>() {
                return secs.is_finite().then(|| secs.trunc() as i64);
            }
            DateTime::parse_from_rfc2822(s)
                .or_else(|_| DateTime::parse_from_rfc3339(s))
                .map(|dt| dt.timestamp())
                .ok()
        }
        _ => None,
    }
}

/// Normalise a `leeway` value to whole seconds; anything unreadable is `0`.
pub fn parse_leeway(value: &Value) -> i64 {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.is_finite())
                        .map(|f| f.trunc() as i64)
                })
                .unwrap_or(0)
        }
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_expiry() {
        let grant = ExpiryGrant::from_body(&json!({"access_exp": 1760000000, "leeway": 30})).unwrap();
        assert_eq!(grant, ExpiryGrant { access_exp: 1_760_000_000, leeway: 30 });
    }

    #[test]
    fn test_missing_leeway_is_zero() {
        let grant = ExpiryGrant::from_body(&json!({"access_exp": "1760000000"})).unwrap();
        assert_eq!(grant.leeway, 0);
        assert_eq!(grant.access_exp, 1_760_000_000);
    }

    #[test]
    fn test_http_date_expiry() {
        let value = json!("Thu, 01 Jan 1970 00:01:00 GMT");
        assert_eq!(parse_access_exp(&value), Some(60));
    }

    #[test]
    fn test_rfc3339_expiry() {
        let value = json!("1970-01-01T00:02:00Z");
        assert_eq!(parse_access_exp(&value), Some(120));
    }

    #[test]
    fn test_float_leeway_truncates() {
        assert_eq!(parse_leeway(&json!(300.0)), 300);
        assert_eq!(parse_leeway(&json!(45.9)), 45);
        assert_eq!(parse_leeway(&json!("12.5")), 12);
        assert_eq!(parse_leeway(&json!(null)), 0);
        assert_eq!(parse_leeway(&json!("later")), 0);
    }

    #[test]
    fn test_unreadable_expiry() {
        assert!(ExpiryGrant::from_body(&json!({"message": "ok"})).is_none());
        assert!(ExpiryGrant::from_body(&json!({"access_exp": "soon"})).is_none());
        assert!(ExpiryGrant::from_body(&json!({"access_exp": null})).is_none());
        assert!(ExpiryGrant::from_body(&json!([1, 2])).is_none());
    }
}
